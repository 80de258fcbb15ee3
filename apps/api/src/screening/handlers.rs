//! Axum route handlers for the Screening API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::screen::{JobApplicationScreen, ManualScreenUpdate, ScreenRequest};
use crate::models::user::Requester;
use crate::screening::service::{
    get_screen, list_screens, save_manual_results, score_application, screen_application,
    ApplicationScore,
};
use crate::state::AppState;

/// POST /api/v1/screens
/// Screens the application, or returns its existing screen.
pub async fn handle_screen_application(
    State(state): State<AppState>,
    requester: Requester,
    Json(req): Json<ScreenRequest>,
) -> Result<(StatusCode, Json<JobApplicationScreen>), AppError> {
    let screen = screen_application(
        state.store.as_ref(),
        state.judge.as_ref(),
        &requester,
        req.application_id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(screen)))
}

/// GET /api/v1/screens
pub async fn handle_list_screens(
    State(state): State<AppState>,
    requester: Requester,
) -> Result<Json<Vec<JobApplicationScreen>>, AppError> {
    let screens = list_screens(state.store.as_ref(), &requester).await?;
    Ok(Json(screens))
}

/// GET /api/v1/screens/:id
pub async fn handle_get_screen(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<Uuid>,
) -> Result<Json<JobApplicationScreen>, AppError> {
    let screen = get_screen(state.store.as_ref(), &requester, id).await?;
    Ok(Json(screen))
}

/// PUT /api/v1/screens/application/:application_id
pub async fn handle_save_manual_results(
    State(state): State<AppState>,
    requester: Requester,
    Path(application_id): Path<Uuid>,
    Json(update): Json<ManualScreenUpdate>,
) -> Result<Json<JobApplicationScreen>, AppError> {
    let screen = save_manual_results(state.store.as_ref(), &requester, application_id, update).await?;
    Ok(Json(screen))
}

/// GET /api/v1/applications/:id/score
pub async fn handle_score_application(
    State(state): State<AppState>,
    requester: Requester,
    Path(application_id): Path<Uuid>,
) -> Result<Json<ApplicationScore>, AppError> {
    let score = score_application(state.store.as_ref(), &requester, application_id).await?;
    Ok(Json(score))
}
