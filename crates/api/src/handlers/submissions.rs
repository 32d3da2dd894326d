//! Handlers for the admin submission CRUD surface.
//!
//! Thin proxies over the [`SubmissionBackend`](crate::upstream::SubmissionBackend):
//! payloads are validated here, then forwarded unchanged.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use intake_core::contracts::{
    OnboardingSubmissionCreateRequest, OnboardingSubmissionFilters,
    OnboardingSubmissionUpdateRequest,
};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /onboarding-submissions
// ---------------------------------------------------------------------------

/// List submissions matching every supplied filter, one page at a time.
pub async fn list_submissions(
    State(state): State<AppState>,
    Query(mut filters): Query<OnboardingSubmissionFilters>,
) -> AppResult<impl IntoResponse> {
    filters.validate()?;
    filters.page = Some(filters.effective_page());
    filters.limit = Some(filters.effective_limit());

    let page = state.backend.list(&filters).await?;

    tracing::debug!(
        count = page.submissions.len(),
        total = page.total,
        page = page.page,
        "Listed onboarding submissions"
    );

    Ok(Json(DataResponse { data: page }))
}

// ---------------------------------------------------------------------------
// POST /onboarding-submissions
// ---------------------------------------------------------------------------

pub async fn create_submission(
    State(state): State<AppState>,
    Json(body): Json<OnboardingSubmissionCreateRequest>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;
    let service = body.service_type;
    let created = state.backend.create(body).await?;

    tracing::info!(
        submission_id = created.id.as_deref().unwrap_or_default(),
        service = service.as_str(),
        "Onboarding submission created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /onboarding-submissions/{id}
// ---------------------------------------------------------------------------

pub async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let submission = state.backend.get(&id).await?;
    Ok(Json(DataResponse { data: submission }))
}

// ---------------------------------------------------------------------------
// PUT /onboarding-submissions/{id}
// ---------------------------------------------------------------------------

/// Update submission details and workflow fields. The service type cannot
/// be changed.
pub async fn update_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<OnboardingSubmissionUpdateRequest>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;
    let status = body.status;
    let updated = state.backend.update(&id, body).await?;

    tracing::info!(
        submission_id = %id,
        status = status.map(|s| s.as_str()),
        "Onboarding submission updated"
    );

    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /onboarding-submissions/{id}
// ---------------------------------------------------------------------------

pub async fn delete_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.backend.delete(&id).await?;

    tracing::info!(submission_id = %id, "Onboarding submission deleted");

    Ok(StatusCode::NO_CONTENT)
}
