use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;

use crate::config::S3Settings;
use crate::storage::{BlobStorage, StorageError};

/// S3 / MinIO storage under a single bucket.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    /// Constructs an S3 client configured for MinIO (local) or AWS (production).
    pub async fn connect(settings: &S3Settings) -> Self {
        let credentials = Credentials::new(
            &settings.access_key_id,
            &settings.secret_access_key,
            None,
            None,
            "jobtrack-static",
        );

        let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(&settings.endpoint)
            .load()
            .await;

        Self {
            client: Client::new(&s3_config),
            bucket: settings.bucket.clone(),
        }
    }
}

#[async_trait]
impl BlobStorage for S3Storage {
    async fn save(&self, key: &str, data: Bytes, content_type: &str) -> Result<String, StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("S3 upload failed: {e}")))?;
        Ok(key.to_string())
    }

    async fn retrieve(&self, key: &str) -> Result<Bytes, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    StorageError::NotFound(key.to_string())
                } else {
                    StorageError::Backend(format!("S3 download failed: {service_error}"))
                }
            })?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(format!("S3 body read failed: {e}")))?;
        Ok(data.into_bytes())
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        // S3 deletes are idempotent and do not say whether the key existed.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("S3 delete failed: {e}")))?;
        Ok(true)
    }
}
