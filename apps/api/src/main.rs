mod applications;
mod auth;
mod config;
mod db;
mod errors;
mod files;
mod listings;
mod llm_client;
mod models;
mod parsers;
mod resumes;
mod routes;
mod screening;
mod state;
mod storage;
mod store;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StorageSettings};
use crate::db::create_pool;
use crate::listings::extract::LlmListingExtractor;
use crate::llm_client::LlmClient;
use crate::parsers::ParserRegistry;
use crate::routes::build_router;
use crate::screening::judge::LlmJudge;
use crate::state::AppState;
use crate::storage::{BlobStorage, LocalStorage, S3Storage};
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobtrack API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and apply migrations
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgStore::new(db));

    // Initialize blob storage
    let storage: Arc<dyn BlobStorage> = match &config.storage {
        StorageSettings::S3(settings) => {
            let s3 = S3Storage::connect(settings).await;
            info!("S3 storage initialized (bucket: {})", settings.bucket);
            Arc::new(s3)
        }
        StorageSettings::Local { root } => {
            let local = LocalStorage::new(root.clone()).await?;
            info!("Local storage initialized at {}", local.root().display());
            Arc::new(local)
        }
    };

    // Initialize LLM client; screening and listing extraction share it
    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_model.clone())?;
    info!("LLM client initialized (model: {})", llm.model());

    let state = AppState {
        store,
        storage,
        parsers: Arc::new(ParserRegistry::new()),
        judge: Arc::new(LlmJudge(llm.clone())),
        extractor: Arc::new(LlmListingExtractor(llm)),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
