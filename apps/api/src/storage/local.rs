use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::info;

use crate::storage::{BlobStorage, StorageError};

/// Filesystem-backed storage rooted at a single directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Creates the root directory if needed.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        info!("Local storage initialized at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // Keys are flat names; anything that could escape the root is refused.
    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\'])
            && !key.contains('\0');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl BlobStorage for LocalStorage {
    async fn save(&self, key: &str, data: Bytes, _content_type: &str) -> Result<String, StorageError> {
        let path = self.path_for(key)?;
        fs::write(&path, &data).await?;
        Ok(key.to_string())
    }

    async fn retrieve(&self, key: &str) -> Result<Bytes, StorageError> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_then_retrieve_returns_same_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let key = storage
            .save("resume-1", Bytes::from_static(b"hello"), "text/plain")
            .await
            .unwrap();
        assert_eq!(key, "resume-1");
        assert_eq!(storage.retrieve("resume-1").await.unwrap(), Bytes::from_static(b"hello"));
    }

    #[tokio::test]
    async fn test_retrieve_missing_key_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        let err = storage.retrieve("missing").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(k) if k == "missing"));
    }

    #[tokio::test]
    async fn test_delete_reports_whether_object_existed() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        storage
            .save("doc", Bytes::from_static(b"x"), "text/plain")
            .await
            .unwrap();

        assert!(storage.delete("doc").await.unwrap());
        assert!(!storage.delete("doc").await.unwrap());
    }

    #[tokio::test]
    async fn test_path_traversal_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        for key in ["../escape", "a/b", "..", ""] {
            let err = storage
                .save(key, Bytes::from_static(b"x"), "text/plain")
                .await
                .unwrap_err();
            assert!(matches!(err, StorageError::InvalidKey(_)), "key {key:?}");
        }
    }

    #[tokio::test]
    async fn test_new_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = LocalStorage::new(&nested).await.unwrap();
        assert!(storage.root().is_dir());
    }
}
