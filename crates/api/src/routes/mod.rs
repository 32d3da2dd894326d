pub mod health;
pub mod onboarding_wizard;
pub mod submissions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /onboarding-sessions                         open
/// /onboarding-sessions/{id}                    get, delete
/// /onboarding-sessions/{id}/form-data          merge form data (PUT)
/// /onboarding-sessions/{id}/step               set step (PUT)
/// /onboarding-sessions/{id}/advance            next step (POST)
/// /onboarding-sessions/{id}/go-back            previous step (POST)
/// /onboarding-sessions/{id}/close              close wizard (POST)
/// /onboarding-sessions/{id}/reset              reset wizard (POST)
/// /onboarding-sessions/{id}/submit             create submission (POST)
///
/// /onboarding-submissions                      list, create
/// /onboarding-submissions/{id}                 get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/onboarding-sessions", onboarding_wizard::router())
        .nest("/onboarding-submissions", submissions::router())
}
