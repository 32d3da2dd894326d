use std::sync::Arc;

use crate::sessions::WizardSessions;
use crate::upstream::SubmissionBackend;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Live onboarding wizard sessions.
    pub sessions: Arc<WizardSessions>,
    /// Where submissions are created, listed and managed.
    pub backend: Arc<dyn SubmissionBackend>,
}
