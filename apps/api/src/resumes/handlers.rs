//! Axum route handlers for the Resumes API.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::files::upload::read_upload;
use crate::models::resume::Resume;
use crate::models::user::Requester;
use crate::resumes::service::{delete_resume, get_resume, list_resumes, upload_resume};
use crate::state::AppState;

/// POST /api/v1/resumes (multipart, field `file`)
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    requester: Requester,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    let upload = read_upload(multipart, state.config.max_upload_bytes).await?;
    let resume = upload_resume(
        state.store.as_ref(),
        state.storage.as_ref(),
        &state.parsers,
        &requester,
        &upload,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    requester: Requester,
) -> Result<Json<Vec<Resume>>, AppError> {
    let resumes = list_resumes(state.store.as_ref(), &requester).await?;
    Ok(Json(resumes))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<Uuid>,
) -> Result<Json<Resume>, AppError> {
    let resume = get_resume(state.store.as_ref(), &requester, id).await?;
    Ok(Json(resume))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    delete_resume(state.store.as_ref(), state.storage.as_ref(), &requester, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
