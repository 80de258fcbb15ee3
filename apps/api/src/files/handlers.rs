//! Axum route handlers for the Files API.

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::files::service::{delete_file, download_file, upload_file};
use crate::files::upload::read_upload;
use crate::models::file::StoredFile;
use crate::models::user::Requester;
use crate::state::AppState;

/// POST /api/v1/files (multipart, field `file`)
pub async fn handle_upload_file(
    State(state): State<AppState>,
    requester: Requester,
    multipart: Multipart,
) -> Result<(StatusCode, Json<StoredFile>), AppError> {
    let upload = read_upload(multipart, state.config.max_upload_bytes).await?;
    let file = upload_file(
        state.store.as_ref(),
        state.storage.as_ref(),
        &requester,
        &upload,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(file)))
}

/// GET /api/v1/files/:id
/// Streams the stored bytes back with the original filename.
pub async fn handle_download_file(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (file, data) =
        download_file(state.store.as_ref(), state.storage.as_ref(), &requester, id).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        file.filename.replace(['"', '\\'], "_")
    );
    Ok((
        [
            (header::CONTENT_TYPE, file.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(data),
    )
        .into_response())
}

/// DELETE /api/v1/files/:id
pub async fn handle_delete_file(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    delete_file(state.store.as_ref(), state.storage.as_ref(), &requester, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
