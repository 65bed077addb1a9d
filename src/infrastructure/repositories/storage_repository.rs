use async_trait::async_trait;
use std::time::Duration;

/// Object-storage failures, split by which side misbehaved. The vendor SDK
/// distinguishes request construction / connectivity problems from errors
/// returned by the service itself; both surface as a 500 at the view
/// boundary but the message keeps the distinction.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage client error: {0}")]
    Client(String),
    #[error("storage service error: {0}")]
    Server(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Repository for object-storage operations.
/// Abstracts the underlying provider (AWS S3 or any S3-compatible store).
///
/// Implementations are responsible for:
/// - Uploading raw bytes under a caller-chosen object key
/// - Minting time-limited presigned GET URLs for existing objects
/// - Downloading and deleting objects by key
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// Upload `data` under `object_key` with the given content type
    async fn upload(&self, object_key: &str, data: Vec<u8>, content_type: &str)
        -> StorageResult<()>;

    /// Mint a presigned GET URL for `object_key`, valid for `expires_in`
    async fn presigned_get_url(&self, object_key: &str, expires_in: Duration)
        -> StorageResult<String>;

    /// Fetch the full object body
    async fn download(&self, object_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete the object. Deleting a missing key is not an error.
    async fn delete(&self, object_key: &str) -> StorageResult<()>;
}
