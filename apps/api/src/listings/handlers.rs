//! Axum route handlers for the Listings API.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::files::upload::read_upload;
use crate::listings::service::{
    create_listing, get_listing, list_listings, parse_listing_file, parse_listing_text,
};
use crate::models::listing::{JobListing, ListingDraft, NewListing};
use crate::models::user::Requester;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ParseListingRequest {
    pub text: String,
}

/// POST /api/v1/listings
pub async fn handle_create_listing(
    State(state): State<AppState>,
    requester: Requester,
    Json(req): Json<NewListing>,
) -> Result<(StatusCode, Json<JobListing>), AppError> {
    let listing = create_listing(state.store.as_ref(), &requester, req).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// GET /api/v1/listings
pub async fn handle_list_listings(
    State(state): State<AppState>,
    requester: Requester,
) -> Result<Json<Vec<JobListing>>, AppError> {
    let listings = list_listings(state.store.as_ref(), &requester).await?;
    Ok(Json(listings))
}

/// GET /api/v1/listings/:id
pub async fn handle_get_listing(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<Uuid>,
) -> Result<Json<JobListing>, AppError> {
    let listing = get_listing(state.store.as_ref(), &requester, id).await?;
    Ok(Json(listing))
}

/// POST /api/v1/listings/parse
/// Extracts a draft listing from raw text. Nothing is persisted.
pub async fn handle_parse_listing(
    State(state): State<AppState>,
    requester: Requester,
    Json(req): Json<ParseListingRequest>,
) -> Result<Json<ListingDraft>, AppError> {
    let draft = parse_listing_text(state.extractor.as_ref(), &requester, &req.text).await?;
    Ok(Json(draft))
}

/// POST /api/v1/listings/parse-file (multipart, field `file`)
pub async fn handle_parse_listing_file(
    State(state): State<AppState>,
    requester: Requester,
    multipart: Multipart,
) -> Result<Json<ListingDraft>, AppError> {
    let upload = read_upload(multipart, state.config.max_upload_bytes).await?;
    let draft = parse_listing_file(
        state.extractor.as_ref(),
        &state.parsers,
        &requester,
        &upload,
    )
    .await?;
    Ok(Json(draft))
}
