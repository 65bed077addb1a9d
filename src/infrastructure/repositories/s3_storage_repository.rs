use super::storage_repository::{StorageError, StorageRepository, StorageResult};
use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use std::sync::Arc;
use std::time::Duration;

/// S3 implementation of the storage repository.
///
/// Works against AWS S3 or any S3-compatible provider when the client was
/// built with a custom endpoint (MinIO, DigitalOcean Spaces, TOS, ...).
pub struct S3StorageRepository {
    s3_client: Arc<S3Client>,
    bucket: String,
}

impl S3StorageRepository {
    pub fn new(s3_client: Arc<S3Client>, bucket: String) -> Self {
        Self { s3_client, bucket }
    }

    /// Keep the SDK's client/server error split: errors the service
    /// returned are `Server`, everything else (construction, dispatch,
    /// timeouts) is `Client`.
    fn map_sdk_error<E>(err: SdkError<E>) -> StorageError
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let message = DisplayErrorContext(&err).to_string();
        match err {
            SdkError::ServiceError(_) => StorageError::Server(message),
            _ => StorageError::Client(message),
        }
    }
}

#[async_trait]
impl StorageRepository for S3StorageRepository {
    async fn upload(
        &self,
        object_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        let size = data.len();

        self.s3_client
            .put_object()
            .bucket(&self.bucket)
            .key(object_key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(Self::map_sdk_error)?;

        tracing::info!(
            object_key = %object_key,
            size_bytes = size,
            content_type = %content_type,
            "Object uploaded"
        );

        Ok(())
    }

    async fn presigned_get_url(
        &self,
        object_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let presigning_config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::Client(e.to_string()))?;

        let presigned = self
            .s3_client
            .get_object()
            .bucket(&self.bucket)
            .key(object_key)
            .presigned(presigning_config)
            .await
            .map_err(Self::map_sdk_error)?;

        tracing::info!(
            object_key = %object_key,
            expires_in_secs = expires_in.as_secs(),
            "Presigned URL generated"
        );

        Ok(presigned.uri().to_string())
    }

    async fn download(&self, object_key: &str) -> StorageResult<Vec<u8>> {
        let response = self
            .s3_client
            .get_object()
            .bucket(&self.bucket)
            .key(object_key)
            .send()
            .await
            .map_err(Self::map_sdk_error)?;

        let body = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Client(format!("failed to read object body: {}", e)))?;

        Ok(body.into_bytes().to_vec())
    }

    async fn delete(&self, object_key: &str) -> StorageResult<()> {
        self.s3_client
            .delete_object()
            .bucket(&self.bucket)
            .key(object_key)
            .send()
            .await
            .map_err(Self::map_sdk_error)?;

        tracing::info!(object_key = %object_key, "Object deleted");

        Ok(())
    }
}
