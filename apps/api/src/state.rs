use std::sync::Arc;

use crate::config::Config;
use crate::listings::extract::ListingExtractor;
use crate::parsers::ParserRegistry;
use crate::screening::judge::QualificationJudge;
use crate::storage::BlobStorage;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Persistence. `PgStore` in production.
    pub store: Arc<dyn Store>,
    /// Document blobs. S3 or local filesystem, chosen by `STORAGE_BACKEND`.
    pub storage: Arc<dyn BlobStorage>,
    pub parsers: Arc<ParserRegistry>,
    /// Qualification judgments for screening. Default: `LlmJudge`.
    pub judge: Arc<dyn QualificationJudge>,
    /// Listing draft extraction. Default: `LlmListingExtractor`.
    pub extractor: Arc<dyn ListingExtractor>,
    pub config: Config,
}
