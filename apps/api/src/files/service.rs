//! File upload, download and deletion.
//!
//! The blob is keyed by the file id. Metadata and blob cannot be written
//! atomically, so every path that leaves one without the other cleans up
//! best-effort and logs what it could not remove.

use bytes::Bytes;
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::files::upload::Upload;
use crate::models::file::StoredFile;
use crate::models::user::Requester;
use crate::storage::{BlobStorage, StorageError};
use crate::store::Store;

pub async fn upload_file(
    store: &dyn Store,
    storage: &dyn BlobStorage,
    owner: &Requester,
    upload: &Upload,
) -> Result<StoredFile, AppError> {
    let id = Uuid::new_v4();
    let storage_key = storage
        .save(
            &id.to_string(),
            upload.data.clone(),
            upload.content_type_or_default(),
        )
        .await?;

    let now = Utc::now();
    let file = StoredFile {
        id,
        owner_id: owner.user_id,
        filename: upload.filename.clone(),
        content_type: upload.content_type_or_default().to_string(),
        size_bytes: upload.data.len() as i64,
        storage_key,
        created_at: now,
        updated_at: now,
    };

    if let Err(err) = store.insert_file(&file).await {
        remove_blob(storage, &file.storage_key).await;
        return Err(err.into());
    }

    info!(
        "Stored file {} ({} bytes) for {}",
        file.id, file.size_bytes, owner.user_id
    );
    Ok(file)
}

/// Loads a file's metadata, enforcing owner-or-admin access.
pub async fn get_file(
    store: &dyn Store,
    requester: &Requester,
    id: Uuid,
) -> Result<StoredFile, AppError> {
    let file = store
        .find_file(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("File {id} not found")))?;
    if !requester.is_admin_or(file.owner_id) {
        return Err(AppError::Forbidden(
            "Not authorized to access this file".to_string(),
        ));
    }
    Ok(file)
}

pub async fn download_file(
    store: &dyn Store,
    storage: &dyn BlobStorage,
    requester: &Requester,
    id: Uuid,
) -> Result<(StoredFile, Bytes), AppError> {
    let file = get_file(store, requester, id).await?;
    let data = storage.retrieve(&file.storage_key).await.map_err(|e| {
        if matches!(e, StorageError::NotFound(_)) {
            error!("File {} has metadata but no blob under '{}'", file.id, file.storage_key);
        }
        AppError::from(e)
    })?;
    Ok((file, data))
}

pub async fn delete_file(
    store: &dyn Store,
    storage: &dyn BlobStorage,
    requester: &Requester,
    id: Uuid,
) -> Result<(), AppError> {
    let file = get_file(store, requester, id).await?;
    if !store.delete_file(file.id).await? {
        return Err(AppError::NotFound(format!("File {id} not found")));
    }
    remove_blob(storage, &file.storage_key).await;
    info!("Deleted file {}", file.id);
    Ok(())
}

/// Best-effort blob removal. Never fails the caller.
pub(crate) async fn remove_blob(storage: &dyn BlobStorage, key: &str) {
    match storage.delete(key).await {
        Ok(true) => {}
        Ok(false) => warn!("Blob '{key}' was already missing from storage"),
        Err(e) => error!("Failed to delete blob '{key}' from storage: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStorage;
    use crate::store::memory::FailingWrite;
    use crate::store::MemoryStore;

    fn upload(text: &str) -> Upload {
        Upload {
            filename: "cv.txt".to_string(),
            content_type: Some("text/plain".to_string()),
            data: Bytes::from(text.to_string()),
        }
    }

    async fn local_storage(dir: &tempfile::TempDir) -> LocalStorage {
        LocalStorage::new(dir.path()).await.unwrap()
    }

    #[tokio::test]
    async fn test_upload_then_download_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = local_storage(&dir).await;
        let store = MemoryStore::new();
        let owner = Requester::applicant(Uuid::new_v4());

        let file = upload_file(&store, &storage, &owner, &upload("hello"))
            .await
            .unwrap();
        assert_eq!(file.size_bytes, 5);
        assert_eq!(file.storage_key, file.id.to_string());

        let (meta, data) = download_file(&store, &storage, &owner, file.id)
            .await
            .unwrap();
        assert_eq!(meta, file);
        assert_eq!(data, Bytes::from_static(b"hello"));
    }

    #[tokio::test]
    async fn test_failed_metadata_insert_removes_blob() {
        let dir = tempfile::tempdir().unwrap();
        let storage = local_storage(&dir).await;
        let store = MemoryStore::new();
        store.fail_next(FailingWrite::File);

        let err = upload_file(&store, &storage, &Requester::applicant(Uuid::new_v4()), &upload("x"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(store.file_count(), 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_other_users_cannot_download() {
        let dir = tempfile::tempdir().unwrap();
        let storage = local_storage(&dir).await;
        let store = MemoryStore::new();
        let owner = Requester::applicant(Uuid::new_v4());
        let file = upload_file(&store, &storage, &owner, &upload("secret"))
            .await
            .unwrap();

        let err = download_file(&store, &storage, &Requester::applicant(Uuid::new_v4()), file.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let admin = Requester::admin(Uuid::new_v4());
        assert!(download_file(&store, &storage, &admin, file.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_blob_is_a_storage_failure() {
        let dir = tempfile::tempdir().unwrap();
        let storage = local_storage(&dir).await;
        let store = MemoryStore::new();
        let owner = Requester::applicant(Uuid::new_v4());
        let file = upload_file(&store, &storage, &owner, &upload("gone"))
            .await
            .unwrap();
        storage.delete(&file.storage_key).await.unwrap();

        let err = download_file(&store, &storage, &owner, file.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_metadata_and_blob() {
        let dir = tempfile::tempdir().unwrap();
        let storage = local_storage(&dir).await;
        let store = MemoryStore::new();
        let owner = Requester::applicant(Uuid::new_v4());
        let file = upload_file(&store, &storage, &owner, &upload("bye"))
            .await
            .unwrap();

        delete_file(&store, &storage, &owner, file.id).await.unwrap();

        assert_eq!(store.file_count(), 0);
        assert!(matches!(
            storage.retrieve(&file.storage_key).await,
            Err(StorageError::NotFound(_))
        ));
        let err = delete_file(&store, &storage, &owner, file.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
