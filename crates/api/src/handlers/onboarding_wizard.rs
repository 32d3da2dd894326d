//! Handlers for onboarding wizard sessions.
//!
//! Each session owns one [`OnboardingStore`]. The raw store operations are
//! exposed as-is (no validation), alongside checked navigation and the
//! final submit, which assembles a create request from the accumulator and
//! hands it to the submission backend. A session is frozen while its
//! submit is in flight.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use intake_core::branching;
use intake_core::error::CoreError;
use intake_core::onboarding_state::{FormData, OnboardingState, OnboardingStore};
use intake_core::submission::{OnboardingSubmission, ServiceType};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

/// Body for opening a new wizard session.
#[derive(Debug, Deserialize)]
pub struct OpenSessionRequest {
    pub service: String,
}

/// Body for overwriting the current step.
#[derive(Debug, Deserialize)]
pub struct SetStepRequest {
    pub step: i32,
}

/// A session id together with its store state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub state: OnboardingState,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Run a store mutation, returning the resulting view.
async fn mutate_session<R>(
    state: &AppState,
    id: Uuid,
    f: impl FnOnce(&mut OnboardingStore) -> R,
) -> AppResult<(R, SessionView)> {
    let out = state
        .sessions
        .with_store(id, |store| {
            let out = f(store);
            let view = SessionView {
                session_id: id,
                state: store.state().clone(),
            };
            (out, view)
        })
        .await?;
    Ok(out)
}

/// Assemble the create request from a frozen snapshot and send it.
async fn create_from_snapshot(
    state: &AppState,
    id: Uuid,
    snapshot: &OnboardingState,
) -> AppResult<OnboardingSubmission> {
    if let Ok(service) = ServiceType::from_str_db(&snapshot.selected_service) {
        let stale = branching::stale_service_keys(service, &snapshot.form_data);
        if !stale.is_empty() {
            tracing::warn!(
                session_id = %id,
                service = service.as_str(),
                ?stale,
                "Ignoring fields that belong to another service"
            );
        }
    }

    let request = branching::build_create_request(snapshot)?;
    Ok(state.backend.create(request).await?)
}

// ---------------------------------------------------------------------------
// POST /onboarding-sessions
// ---------------------------------------------------------------------------

/// Open the wizard for a service in a new session.
pub async fn open_session(
    State(state): State<AppState>,
    Json(body): Json<OpenSessionRequest>,
) -> AppResult<impl IntoResponse> {
    if body.service.trim().is_empty() {
        return Err(AppError::BadRequest("service is required".to_string()));
    }
    let service = ServiceType::from_str_db(&body.service)?;
    let (session_id, snapshot) = state.sessions.open(service.as_str()).await;

    tracing::info!(
        %session_id,
        service = service.as_str(),
        "Onboarding session opened"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SessionView {
                session_id,
                state: snapshot,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// GET /onboarding-sessions/{id}
// ---------------------------------------------------------------------------

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let snapshot = state.sessions.snapshot(id).await?;
    Ok(Json(DataResponse {
        data: SessionView {
            session_id: id,
            state: snapshot,
        },
    }))
}

// ---------------------------------------------------------------------------
// PUT /onboarding-sessions/{id}/form-data
// ---------------------------------------------------------------------------

/// Shallow-merge a partial into the session's accumulator.
pub async fn set_form_data(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(partial): Json<FormData>,
) -> AppResult<impl IntoResponse> {
    let keys = partial.len();
    let ((), view) = mutate_session(&state, id, |store| store.set_form_data(partial)).await?;

    tracing::debug!(session_id = %id, keys, "Onboarding form data merged");

    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// PUT /onboarding-sessions/{id}/step
// ---------------------------------------------------------------------------

/// Overwrite the current step without range checks.
pub async fn set_current_step(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SetStepRequest>,
) -> AppResult<impl IntoResponse> {
    let ((), view) =
        mutate_session(&state, id, |store| store.set_current_step(body.step)).await?;

    tracing::debug!(session_id = %id, step = body.step, "Onboarding step set");

    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// POST /onboarding-sessions/{id}/advance
// ---------------------------------------------------------------------------

/// Move one step forward.
pub async fn advance_step(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let (result, view) = mutate_session(&state, id, OnboardingStore::advance).await?;
    let step = result?;

    tracing::info!(session_id = %id, to_step = step, "Onboarding session advanced");

    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// POST /onboarding-sessions/{id}/go-back
// ---------------------------------------------------------------------------

/// Move one step back.
pub async fn go_back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let (result, view) = mutate_session(&state, id, OnboardingStore::go_back).await?;
    let step = result?;

    tracing::info!(session_id = %id, to_step = step, "Onboarding session went back");

    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// POST /onboarding-sessions/{id}/close
// ---------------------------------------------------------------------------

/// Close the wizard, discarding everything collected.
pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let ((), view) = mutate_session(&state, id, OnboardingStore::close_modal).await?;

    tracing::info!(session_id = %id, "Onboarding session closed");

    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// POST /onboarding-sessions/{id}/reset
// ---------------------------------------------------------------------------

pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let ((), view) = mutate_session(&state, id, OnboardingStore::reset).await?;

    tracing::info!(session_id = %id, "Onboarding session reset");

    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// POST /onboarding-sessions/{id}/submit
// ---------------------------------------------------------------------------

/// Assemble the create request from the session and send it upstream.
///
/// The session is frozen for the duration, so a concurrent submit or edit
/// gets a conflict. On success the session is reset; on failure the
/// accumulated data is kept so the user can retry. The upstream call runs
/// in its own task so a dropped request still unfreezes the session.
pub async fn submit_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let snapshot = state.sessions.begin_submit(id).await?;

    let task_state = state.clone();
    let created = tokio::spawn(async move {
        let result = create_from_snapshot(&task_state, id, &snapshot).await;
        task_state
            .sessions
            .finish_submit(id, &snapshot, result.is_ok())
            .await;
        result
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Submit task failed: {e}")))??;

    tracing::info!(
        session_id = %id,
        submission_id = created.id.as_deref().unwrap_or_default(),
        service = created.service_type.as_str(),
        backend = state.backend.kind(),
        "Onboarding submission created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// DELETE /onboarding-sessions/{id}
// ---------------------------------------------------------------------------

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    if !state.sessions.remove(id).await {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "OnboardingSession",
            id: id.to_string(),
        }));
    }

    tracing::info!(session_id = %id, "Onboarding session discarded");

    Ok(StatusCode::NO_CONTENT)
}
