//! Route definitions for onboarding wizard sessions.
//!
//! Mounted at `/onboarding-sessions` by `api_routes()`.
//!
//! ```text
//! POST   /                   open_session
//! GET    /{id}               get_session
//! DELETE /{id}               delete_session
//! PUT    /{id}/form-data     set_form_data
//! PUT    /{id}/step          set_current_step
//! POST   /{id}/advance       advance_step
//! POST   /{id}/go-back       go_back
//! POST   /{id}/close         close_session
//! POST   /{id}/reset         reset_session
//! POST   /{id}/submit        submit_session
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::onboarding_wizard;
use crate::state::AppState;

/// Onboarding wizard routes, mounted at `/onboarding-sessions`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(onboarding_wizard::open_session))
        .route(
            "/{id}",
            get(onboarding_wizard::get_session).delete(onboarding_wizard::delete_session),
        )
        .route("/{id}/form-data", put(onboarding_wizard::set_form_data))
        .route("/{id}/step", put(onboarding_wizard::set_current_step))
        .route("/{id}/advance", post(onboarding_wizard::advance_step))
        .route("/{id}/go-back", post(onboarding_wizard::go_back))
        .route("/{id}/close", post(onboarding_wizard::close_session))
        .route("/{id}/reset", post(onboarding_wizard::reset_session))
        .route("/{id}/submit", post(onboarding_wizard::submit_session))
}
