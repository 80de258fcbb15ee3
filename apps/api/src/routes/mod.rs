pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;
use crate::{applications, files, listings, resumes, screening};

// Multipart framing on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Listings
        .route(
            "/api/v1/listings",
            get(listings::handlers::handle_list_listings)
                .post(listings::handlers::handle_create_listing),
        )
        .route(
            "/api/v1/listings/parse",
            post(listings::handlers::handle_parse_listing),
        )
        .route(
            "/api/v1/listings/parse-file",
            post(listings::handlers::handle_parse_listing_file),
        )
        .route(
            "/api/v1/listings/:id",
            get(listings::handlers::handle_get_listing),
        )
        // Files
        .route("/api/v1/files", post(files::handlers::handle_upload_file))
        .route(
            "/api/v1/files/:id",
            get(files::handlers::handle_download_file).delete(files::handlers::handle_delete_file),
        )
        // Resumes
        .route(
            "/api/v1/resumes",
            get(resumes::handlers::handle_list_resumes)
                .post(resumes::handlers::handle_upload_resume),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handlers::handle_get_resume)
                .delete(resumes::handlers::handle_delete_resume),
        )
        // Applications
        .route(
            "/api/v1/applications",
            get(applications::handlers::handle_list_applications)
                .post(applications::handlers::handle_submit_application),
        )
        .route(
            "/api/v1/applications/:id",
            get(applications::handlers::handle_get_application),
        )
        .route(
            "/api/v1/applications/:id/status",
            put(applications::handlers::handle_update_status),
        )
        .route(
            "/api/v1/applications/:id/withdraw",
            post(applications::handlers::handle_withdraw),
        )
        .route(
            "/api/v1/applications/:id/score",
            get(screening::handlers::handle_score_application),
        )
        // Screening
        .route(
            "/api/v1/screens",
            get(screening::handlers::handle_list_screens)
                .post(screening::handlers::handle_screen_application),
        )
        .route(
            "/api/v1/screens/:id",
            get(screening::handlers::handle_get_screen),
        )
        .route(
            "/api/v1/screens/application/:application_id",
            put(screening::handlers::handle_save_manual_results),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
