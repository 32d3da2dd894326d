//! Service-specific payloads attached to a submission.
//!
//! Each service collects its own set of optional fields during the
//! "service details" step. The field names of the three shapes are
//! disjoint so that the wizard accumulator can hold any of them without
//! ambiguity.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::submission::ServiceType;

/// Extra details collected for a landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingPageData {
    pub page_count: Option<u32>,
    pub has_existing_branding: Option<bool>,
    pub needs_copywriting: Option<bool>,
    pub conversion_goal: Option<String>,
    pub marketing_integrations: Option<Vec<String>>,
}

impl LandingPageData {
    /// Wire names of every field, in declaration order.
    pub const FIELD_KEYS: &'static [&'static str] = &[
        "pageCount",
        "hasExistingBranding",
        "needsCopywriting",
        "conversionGoal",
        "marketingIntegrations",
    ];
}

/// Extra details collected for a web application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebAppData {
    pub app_type: Option<String>,
    pub core_features: Option<Vec<String>>,
    pub user_roles: Option<Vec<String>>,
    pub needs_authentication: Option<bool>,
    pub needs_payments: Option<bool>,
    pub third_party_integrations: Option<Vec<String>>,
}

impl WebAppData {
    pub const FIELD_KEYS: &'static [&'static str] = &[
        "appType",
        "coreFeatures",
        "userRoles",
        "needsAuthentication",
        "needsPayments",
        "thirdPartyIntegrations",
    ];
}

/// Extra details collected for a mobile application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileAppData {
    pub platforms: Option<Vec<String>>,
    pub app_features: Option<Vec<String>>,
    pub needs_offline_mode: Option<bool>,
    pub needs_push_notifications: Option<bool>,
    pub has_existing_backend: Option<bool>,
}

impl MobileAppData {
    pub const FIELD_KEYS: &'static [&'static str] = &[
        "platforms",
        "appFeatures",
        "needsOfflineMode",
        "needsPushNotifications",
        "hasExistingBackend",
    ];
}

/// Service payload, discriminated by the service it belongs to.
///
/// Serialized as `{ "serviceType": "...", "data": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "serviceType", content = "data", rename_all = "snake_case")]
pub enum ServiceSpecificData {
    LandingPage(LandingPageData),
    WebApp(WebAppData),
    MobileApp(MobileAppData),
}

impl ServiceSpecificData {
    /// Build the payload shape that belongs to `service` from raw fields.
    ///
    /// Keys that are not part of the shape are ignored. A key that is part
    /// of the shape but carries a value of the wrong type is rejected.
    pub fn for_service(
        service: ServiceType,
        fields: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, CoreError> {
        let value = serde_json::Value::Object(fields);
        let decoded = match service {
            ServiceType::LandingPage => serde_json::from_value(value).map(Self::LandingPage),
            ServiceType::WebApp => serde_json::from_value(value).map(Self::WebApp),
            ServiceType::MobileApp => serde_json::from_value(value).map(Self::MobileApp),
        };
        decoded.map_err(|e| {
            CoreError::Validation(format!(
                "Invalid {} details: {e}",
                service.label().to_lowercase()
            ))
        })
    }

    /// Empty payload of the shape that belongs to `service`.
    pub fn empty(service: ServiceType) -> Self {
        match service {
            ServiceType::LandingPage => Self::LandingPage(LandingPageData::default()),
            ServiceType::WebApp => Self::WebApp(WebAppData::default()),
            ServiceType::MobileApp => Self::MobileApp(MobileAppData::default()),
        }
    }

    /// The service this payload belongs to.
    pub fn service_type(&self) -> ServiceType {
        match self {
            Self::LandingPage(_) => ServiceType::LandingPage,
            Self::WebApp(_) => ServiceType::WebApp,
            Self::MobileApp(_) => ServiceType::MobileApp,
        }
    }

    /// Reject a payload whose variant disagrees with the declared service.
    pub fn ensure_matches(&self, declared: ServiceType) -> Result<(), CoreError> {
        let actual = self.service_type();
        if actual != declared {
            return Err(CoreError::Validation(format!(
                "Service details are for '{}' but the submission is for '{}'",
                actual.as_str(),
                declared.as_str()
            )));
        }
        Ok(())
    }
}

/// Wire names of the fields belonging to `service`'s payload shape.
pub fn field_keys(service: ServiceType) -> &'static [&'static str] {
    match service {
        ServiceType::LandingPage => LandingPageData::FIELD_KEYS,
        ServiceType::WebApp => WebAppData::FIELD_KEYS,
        ServiceType::MobileApp => MobileAppData::FIELD_KEYS,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn object(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn field_keys_match_serialized_names() {
        for service in ServiceType::ALL {
            let serialized = match ServiceSpecificData::empty(service) {
                ServiceSpecificData::LandingPage(d) => serde_json::to_value(d).unwrap(),
                ServiceSpecificData::WebApp(d) => serde_json::to_value(d).unwrap(),
                ServiceSpecificData::MobileApp(d) => serde_json::to_value(d).unwrap(),
            };
            let actual: BTreeSet<&str> = serialized
                .as_object()
                .unwrap()
                .keys()
                .map(String::as_str)
                .collect();
            let expected: BTreeSet<&str> = field_keys(service).iter().copied().collect();
            assert_eq!(actual, expected, "field keys drifted for {service:?}");
        }
    }

    #[test]
    fn decodes_each_shape_from_its_wire_names() {
        let landing: LandingPageData = serde_json::from_value(json!({
            "pageCount": 3,
            "marketingIntegrations": ["mailchimp"]
        }))
        .unwrap();
        assert_eq!(landing.marketing_integrations, Some(vec!["mailchimp".to_string()]));

        let web: WebAppData = serde_json::from_value(json!({
            "thirdPartyIntegrations": ["stripe"]
        }))
        .unwrap();
        assert_eq!(web.third_party_integrations, Some(vec!["stripe".to_string()]));

        let mobile: MobileAppData = serde_json::from_value(json!({
            "appFeatures": ["chat"],
            "hasExistingBackend": true
        }))
        .unwrap();
        assert_eq!(mobile.app_features, Some(vec!["chat".to_string()]));
        assert_eq!(mobile.has_existing_backend, Some(true));
    }

    #[test]
    fn field_keys_are_disjoint_across_services() {
        let mut seen = BTreeSet::new();
        for service in ServiceType::ALL {
            for key in field_keys(service) {
                assert!(seen.insert(*key), "key '{key}' is shared between services");
            }
        }
    }

    #[test]
    fn for_service_builds_matching_variant() {
        let data = ServiceSpecificData::for_service(
            ServiceType::WebApp,
            object(json!({ "appType": "SaaS", "coreFeatures": ["auth"] })),
        )
        .unwrap();
        assert_eq!(
            data,
            ServiceSpecificData::WebApp(WebAppData {
                app_type: Some("SaaS".to_string()),
                core_features: Some(vec!["auth".to_string()]),
                ..Default::default()
            })
        );
        assert_eq!(data.service_type(), ServiceType::WebApp);
    }

    #[test]
    fn for_service_ignores_foreign_keys() {
        let data = ServiceSpecificData::for_service(
            ServiceType::LandingPage,
            object(json!({ "pageCount": 3, "appType": "SaaS" })),
        )
        .unwrap();
        assert_eq!(
            data,
            ServiceSpecificData::LandingPage(LandingPageData {
                page_count: Some(3),
                ..Default::default()
            })
        );
    }

    #[test]
    fn for_service_rejects_wrong_value_type() {
        let result = ServiceSpecificData::for_service(
            ServiceType::MobileApp,
            object(json!({ "platforms": "ios" })),
        );
        assert!(result.is_err());
    }

    #[test]
    fn ensure_matches_rejects_mismatched_tag() {
        let data = ServiceSpecificData::empty(ServiceType::LandingPage);
        assert!(data.ensure_matches(ServiceType::LandingPage).is_ok());
        assert!(data.ensure_matches(ServiceType::MobileApp).is_err());
    }

    #[test]
    fn serializes_with_service_tag() {
        let data = ServiceSpecificData::MobileApp(MobileAppData {
            platforms: Some(vec!["ios".to_string(), "android".to_string()]),
            ..Default::default()
        });
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["serviceType"], "mobile_app");
        assert_eq!(value["data"]["platforms"], json!(["ios", "android"]));

        let decoded: ServiceSpecificData = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, data);
    }
}
