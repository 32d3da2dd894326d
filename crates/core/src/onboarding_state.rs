//! Onboarding wizard state and its store.
//!
//! [`OnboardingStore`] is the only mutation surface for a wizard session.
//! The raw operations (`open_modal`, `close_modal`, `set_form_data`,
//! `set_current_step`, `reset`) are total and perform no validation; the
//! checked navigation helpers (`advance`, `go_back`) sit on top of them.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Untyped key/value accumulator collected across wizard steps.
pub type FormData = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Wizard steps
// ---------------------------------------------------------------------------

/// The steps every service's wizard walks through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    ProjectBasics,
    Contact,
    ServiceDetails,
    TimelineBudget,
    Review,
}

/// Total number of steps in the wizard.
pub const TOTAL_STEPS: i32 = 5;

/// Minimum step number (1-based).
pub const MIN_STEP: i32 = 1;

/// Maximum step number (1-based).
pub const MAX_STEP: i32 = TOTAL_STEPS;

impl WizardStep {
    /// Convert a 1-based step number to a `WizardStep`.
    pub fn from_number(n: i32) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::ProjectBasics),
            2 => Ok(Self::Contact),
            3 => Ok(Self::ServiceDetails),
            4 => Ok(Self::TimelineBudget),
            5 => Ok(Self::Review),
            _ => Err(CoreError::Validation(format!(
                "Invalid step number {n}. Must be between {MIN_STEP} and {MAX_STEP}"
            ))),
        }
    }

    pub fn to_number(self) -> i32 {
        match self {
            Self::ProjectBasics => 1,
            Self::Contact => 2,
            Self::ServiceDetails => 3,
            Self::TimelineBudget => 4,
            Self::Review => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ProjectBasics => "Project Basics",
            Self::Contact => "Contact Details",
            Self::ServiceDetails => "Service Details",
            Self::TimelineBudget => "Timeline & Budget",
            Self::Review => "Review",
        }
    }
}

/// Validate that a step number is within the wizard's range.
pub fn validate_step_number(step: i32) -> Result<(), CoreError> {
    if !(MIN_STEP..=MAX_STEP).contains(&step) {
        return Err(CoreError::Validation(format!(
            "Step {step} is out of range ({MIN_STEP}..{MAX_STEP})"
        )));
    }
    Ok(())
}

/// Validate a step transition.
///
/// Both ends must be in range and the move must be exactly one step
/// forward or backward.
pub fn validate_step_transition(current: i32, next: i32) -> Result<(), CoreError> {
    if !(MIN_STEP..=MAX_STEP).contains(&current) {
        return Err(CoreError::Validation(format!(
            "Current step {current} is out of range ({MIN_STEP}..{MAX_STEP})"
        )));
    }
    if !(MIN_STEP..=MAX_STEP).contains(&next) {
        return Err(CoreError::Validation(format!(
            "Next step {next} is out of range ({MIN_STEP}..{MAX_STEP})"
        )));
    }

    let diff = i64::from(next) - i64::from(current);
    if diff != 1 && diff != -1 {
        return Err(CoreError::Validation(format!(
            "Cannot transition from step {current} to step {next}. \
             Must advance or go back exactly one step."
        )));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Ephemeral UI state of one wizard session. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingState {
    pub is_modal_open: bool,
    /// Empty while the wizard is closed.
    pub selected_service: String,
    pub form_data: FormData,
    pub current_step: i32,
}

impl Default for OnboardingState {
    fn default() -> Self {
        Self {
            is_modal_open: false,
            selected_service: String::new(),
            form_data: FormData::new(),
            current_step: MIN_STEP,
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Owner of one session's [`OnboardingState`].
#[derive(Debug, Clone, Default)]
pub struct OnboardingStore {
    state: OnboardingState,
}

impl OnboardingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &OnboardingState {
        &self.state
    }

    /// Open the wizard for `service`, discarding any in-progress data.
    pub fn open_modal(&mut self, service: impl Into<String>) {
        self.state = OnboardingState {
            is_modal_open: true,
            selected_service: service.into(),
            form_data: FormData::new(),
            current_step: MIN_STEP,
        };
    }

    /// Close the wizard and drop everything collected so far.
    pub fn close_modal(&mut self) {
        self.state = OnboardingState::default();
    }

    /// Shallow-merge `partial` into the accumulator. Later writes win per key.
    pub fn set_form_data(&mut self, partial: FormData) {
        self.state.form_data.extend(partial);
    }

    /// Overwrite the current step. No range check.
    pub fn set_current_step(&mut self, step: i32) {
        self.state.current_step = step;
    }

    pub fn reset(&mut self) {
        self.close_modal();
    }

    /// Move one step forward, returning the new step.
    pub fn advance(&mut self) -> Result<i32, CoreError> {
        let current = self.state.current_step;
        let next = current.saturating_add(1);
        validate_step_transition(current, next)?;
        self.set_current_step(next);
        Ok(next)
    }

    /// Move one step back, returning the new step.
    pub fn go_back(&mut self) -> Result<i32, CoreError> {
        let current = self.state.current_step;
        if current <= MIN_STEP {
            return Err(CoreError::Validation(
                "Already on the first step; cannot go back".to_string(),
            ));
        }
        let prev = current - 1;
        validate_step_transition(current, prev)?;
        self.set_current_step(prev);
        Ok(prev)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn partial(value: serde_json::Value) -> FormData {
        value.as_object().cloned().unwrap()
    }

    // -- WizardStep --

    #[test]
    fn step_to_number_roundtrip() {
        for n in MIN_STEP..=MAX_STEP {
            let step = WizardStep::from_number(n).unwrap();
            assert_eq!(step.to_number(), n);
            assert!(!step.label().is_empty());
        }
    }

    #[test]
    fn step_from_number_invalid() {
        assert!(WizardStep::from_number(0).is_err());
        assert!(WizardStep::from_number(6).is_err());
        assert!(WizardStep::from_number(-1).is_err());
    }

    #[test]
    fn transition_rules() {
        assert!(validate_step_transition(1, 2).is_ok());
        assert!(validate_step_transition(5, 4).is_ok());
        assert!(validate_step_transition(2, 2).is_err());
        assert!(validate_step_transition(1, 3).is_err());
        assert!(validate_step_transition(5, 6).is_err());
        assert!(validate_step_transition(0, 1).is_err());
    }

    #[test]
    fn step_number_range() {
        assert!(validate_step_number(1).is_ok());
        assert!(validate_step_number(5).is_ok());
        assert!(validate_step_number(0).is_err());
        assert!(validate_step_number(6).is_err());
    }

    // -- Store: raw operations --

    #[test]
    fn new_store_has_default_state() {
        let store = OnboardingStore::new();
        assert_eq!(
            serde_json::to_value(store.state()).unwrap(),
            json!({
                "isModalOpen": false,
                "selectedService": "",
                "formData": {},
                "currentStep": 1
            })
        );
    }

    #[test]
    fn open_modal_discards_previous_session() {
        let mut store = OnboardingStore::new();
        store.open_modal("landing_page");
        store.set_form_data(partial(json!({ "pageCount": 4 })));
        store.set_current_step(3);

        store.open_modal("mobile_app");
        let state = store.state();
        assert!(state.is_modal_open);
        assert_eq!(state.selected_service, "mobile_app");
        assert_eq!(state.current_step, 1);
        assert!(state.form_data.is_empty());
    }

    #[test]
    fn set_form_data_is_last_write_wins_shallow_merge() {
        let partials = [
            json!({ "projectName": "Alpha", "budget": "5k" }),
            json!({ "budget": "10k", "timeline": "Q3" }),
            json!({ "coreFeatures": ["auth"], "projectName": "Beta" }),
            json!({ "meta": { "nested": true } }),
            json!({ "meta": { "other": 1 } }),
        ];

        let mut store = OnboardingStore::new();
        store.open_modal("web_app");
        let mut expected = FormData::new();
        for p in &partials {
            store.set_form_data(partial(p.clone()));
            for (k, v) in p.as_object().unwrap() {
                expected.insert(k.clone(), v.clone());
            }
        }

        assert_eq!(store.state().form_data, expected);
        assert_eq!(store.state().form_data["projectName"], json!("Beta"));
        assert_eq!(store.state().form_data["budget"], json!("10k"));
        // Nested objects are replaced, not merged.
        assert_eq!(store.state().form_data["meta"], json!({ "other": 1 }));
    }

    #[test]
    fn open_then_close_restores_default_for_any_service() {
        for service in ["landing_page", "web_app", "mobile_app", "", "unknown"] {
            let mut store = OnboardingStore::new();
            store.open_modal(service);
            store.close_modal();
            assert_eq!(store.state(), &OnboardingState::default());
        }
    }

    #[test]
    fn reset_is_idempotent() {
        let mut store = OnboardingStore::new();
        store.open_modal("web_app");
        store.set_form_data(partial(json!({ "appType": "SaaS" })));
        store.set_current_step(4);

        store.reset();
        let once = store.state().clone();
        store.reset();
        assert_eq!(store.state(), &once);
        assert_eq!(once, OnboardingState::default());
    }

    #[test]
    fn set_current_step_is_unchecked() {
        let mut store = OnboardingStore::new();
        store.set_current_step(42);
        assert_eq!(store.state().current_step, 42);
        store.set_current_step(-3);
        assert_eq!(store.state().current_step, -3);
    }

    #[test]
    fn web_app_walkthrough() {
        let mut store = OnboardingStore::new();

        store.open_modal("web_app");
        assert_eq!(
            serde_json::to_value(store.state()).unwrap(),
            json!({
                "isModalOpen": true,
                "selectedService": "web_app",
                "formData": {},
                "currentStep": 1
            })
        );

        store.set_form_data(partial(json!({ "appType": "SaaS" })));
        assert_eq!(store.state().form_data, partial(json!({ "appType": "SaaS" })));

        store.set_form_data(partial(json!({ "coreFeatures": ["auth"] })));
        assert_eq!(
            store.state().form_data,
            partial(json!({ "appType": "SaaS", "coreFeatures": ["auth"] }))
        );

        store.set_current_step(2);
        assert_eq!(store.state().current_step, 2);
        assert!(store.state().is_modal_open);
        assert_eq!(store.state().selected_service, "web_app");
        assert_eq!(store.state().form_data.len(), 2);

        store.close_modal();
        assert_eq!(
            serde_json::to_value(store.state()).unwrap(),
            json!({
                "isModalOpen": false,
                "selectedService": "",
                "formData": {},
                "currentStep": 1
            })
        );
    }

    // -- Store: checked navigation --

    #[test]
    fn advance_walks_to_last_step_and_stops() {
        let mut store = OnboardingStore::new();
        store.open_modal("landing_page");
        for expected in 2..=MAX_STEP {
            assert_eq!(store.advance().unwrap(), expected);
        }
        assert!(store.advance().is_err());
        assert_eq!(store.state().current_step, MAX_STEP);
    }

    #[test]
    fn go_back_refuses_first_step() {
        let mut store = OnboardingStore::new();
        store.open_modal("landing_page");
        assert!(store.go_back().is_err());
        store.advance().unwrap();
        assert_eq!(store.go_back().unwrap(), 1);
    }

    #[test]
    fn checked_navigation_rejects_out_of_range_current_step() {
        let mut store = OnboardingStore::new();
        store.set_current_step(9);
        assert!(store.advance().is_err());
        assert!(store.go_back().is_err());
        assert_eq!(store.state().current_step, 9);

        store.set_current_step(i32::MAX);
        assert!(store.advance().is_err());
    }
}
