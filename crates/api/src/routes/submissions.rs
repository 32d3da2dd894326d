//! Route definitions for the admin submission CRUD proxy.
//!
//! Mounted at `/onboarding-submissions` by `api_routes()`.
//!
//! ```text
//! GET    /        list_submissions (?serviceType, status, priority, assignedTo,
//!                                    dateFrom, dateTo, search, page, limit)
//! POST   /        create_submission
//! GET    /{id}    get_submission
//! PUT    /{id}    update_submission
//! DELETE /{id}    delete_submission
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::submissions;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(submissions::list_submissions).post(submissions::create_submission),
        )
        .route(
            "/{id}",
            get(submissions::get_submission)
                .put(submissions::update_submission)
                .delete(submissions::delete_submission),
        )
}
