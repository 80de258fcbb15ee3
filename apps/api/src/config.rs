use std::path::PathBuf;

use anyhow::{bail, Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub storage: StorageSettings,
    pub llm_model: String,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

/// Where uploaded documents live.
#[derive(Debug, Clone)]
pub enum StorageSettings {
    S3(S3Settings),
    Local { root: PathBuf },
}

#[derive(Debug, Clone)]
pub struct S3Settings {
    pub bucket: String,
    pub endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            storage: storage_from_env()?,
            llm_model: optional_env("LLM_MODEL")
                .unwrap_or_else(|| crate::llm_client::DEFAULT_MODEL.to_string()),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            port: parse_env("PORT", 8080)?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn storage_from_env() -> Result<StorageSettings> {
    let backend = optional_env("STORAGE_BACKEND").unwrap_or_else(|| "s3".to_string());
    match backend.to_ascii_lowercase().as_str() {
        "s3" => Ok(StorageSettings::S3(S3Settings {
            bucket: require_env("S3_BUCKET")?,
            endpoint: require_env("S3_ENDPOINT")?,
            region: optional_env("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
        })),
        "local" => Ok(StorageSettings::Local {
            root: optional_env("STORAGE_ROOT")
                .unwrap_or_else(|| "./local_storage".to_string())
                .into(),
        }),
        other => bail!("STORAGE_BACKEND must be 's3' or 'local', got '{other}'"),
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
