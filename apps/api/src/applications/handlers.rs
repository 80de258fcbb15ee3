//! Axum route handlers for the Applications API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::applications::service::{
    get_application, list_applications, submit_application, update_application_status,
    withdraw_application,
};
use crate::errors::AppError;
use crate::models::application::{JobApplication, StatusUpdateRequest, SubmitApplicationRequest};
use crate::models::user::Requester;
use crate::state::AppState;

/// POST /api/v1/applications
pub async fn handle_submit_application(
    State(state): State<AppState>,
    requester: Requester,
    Json(req): Json<SubmitApplicationRequest>,
) -> Result<(StatusCode, Json<JobApplication>), AppError> {
    let application = submit_application(state.store.as_ref(), &requester, req).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    requester: Requester,
) -> Result<Json<Vec<JobApplication>>, AppError> {
    let applications = list_applications(state.store.as_ref(), &requester).await?;
    Ok(Json(applications))
}

/// GET /api/v1/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<Uuid>,
) -> Result<Json<JobApplication>, AppError> {
    let application = get_application(state.store.as_ref(), &requester, id).await?;
    Ok(Json(application))
}

/// PUT /api/v1/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<JobApplication>, AppError> {
    let application =
        update_application_status(state.store.as_ref(), &requester, id, req.status).await?;
    Ok(Json(application))
}

/// POST /api/v1/applications/:id/withdraw
pub async fn handle_withdraw(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<Uuid>,
) -> Result<Json<JobApplication>, AppError> {
    let application = withdraw_application(state.store.as_ref(), &requester, id).await?;
    Ok(Json(application))
}
