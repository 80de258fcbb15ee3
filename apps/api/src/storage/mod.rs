//! Blob storage for uploaded documents. Keys are opaque strings chosen by the
//! caller; backends only save, fetch and delete bytes under them.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub mod local;
pub mod s3;

pub use local::LocalStorage;
pub use s3::S3Storage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object '{0}' not found in storage")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Stores `data` under `key` and returns the key actually used.
    async fn save(&self, key: &str, data: Bytes, content_type: &str) -> Result<String, StorageError>;

    async fn retrieve(&self, key: &str) -> Result<Bytes, StorageError>;

    /// Returns `false` when nothing was stored under `key`.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;
}
