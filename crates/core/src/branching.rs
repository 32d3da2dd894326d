//! Service-specific branching over the wizard accumulator.
//!
//! The accumulator holds every field the wizard collected, untyped. At
//! submit time the base fields and the selected service's payload are
//! decoded from it into a [`OnboardingSubmissionCreateRequest`]. The
//! service type always comes from the store's `selected_service`, never
//! from the accumulator.

use crate::contracts::OnboardingSubmissionCreateRequest;
use crate::error::CoreError;
use crate::onboarding_state::{FormData, OnboardingState};
use crate::service_data::{self, ServiceSpecificData};
use crate::submission::ServiceType;

/// Accumulator keys that are never decoded as base fields.
const RESERVED_KEYS: &[&str] = &["serviceType", "serviceSpecificData"];

/// Accumulator keys belonging to `service`'s payload shape.
pub fn service_field_keys(service: ServiceType) -> &'static [&'static str] {
    service_data::field_keys(service)
}

/// Build `service`'s payload from the matching keys of the accumulator.
pub fn extract_service_data(
    service: ServiceType,
    form_data: &FormData,
) -> Result<ServiceSpecificData, CoreError> {
    let fields: FormData = service_field_keys(service)
        .iter()
        .filter_map(|key| form_data.get(*key).map(|v| ((*key).to_string(), v.clone())))
        .collect();
    ServiceSpecificData::for_service(service, fields)
}

/// Keys in the accumulator that only belong to some other service's shape.
///
/// These linger when a client writes another service's fields into the
/// accumulator; they are never sent upstream.
pub fn stale_service_keys(service: ServiceType, form_data: &FormData) -> Vec<String> {
    ServiceType::ALL
        .into_iter()
        .filter(|other| *other != service)
        .flat_map(|other| service_field_keys(other).iter())
        .filter(|key| form_data.contains_key(**key))
        .map(|key| (*key).to_string())
        .collect()
}

/// Assemble and validate the create request for a wizard session.
pub fn build_create_request(
    state: &OnboardingState,
) -> Result<OnboardingSubmissionCreateRequest, CoreError> {
    if !state.is_modal_open {
        return Err(CoreError::Conflict(
            "The onboarding wizard is not open".to_string(),
        ));
    }
    let service = ServiceType::from_str_db(&state.selected_service)?;

    let mut base: FormData = state
        .form_data
        .iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .filter(|(key, _)| {
            !ServiceType::ALL
                .into_iter()
                .any(|s| service_field_keys(s).contains(&key.as_str()))
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    base.insert(
        "serviceType".to_string(),
        serde_json::Value::String(service.as_str().to_string()),
    );

    let mut request: OnboardingSubmissionCreateRequest =
        serde_json::from_value(serde_json::Value::Object(base))
            .map_err(|e| CoreError::Validation(format!("Invalid onboarding form data: {e}")))?;
    request.service_specific_data = Some(extract_service_data(service, &state.form_data)?);

    request.validate()?;
    Ok(request)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
