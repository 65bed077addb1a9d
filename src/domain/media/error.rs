use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum MediaServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("input too large: {0}")]
    TooLarge(String),
    #[error("record not found")]
    NotFound,
    #[error("invalid record state: {0}")]
    InvalidState(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for MediaServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => MediaServiceError::Invalid(msg),
            AppError::NotFound(_) => MediaServiceError::NotFound,
            AppError::Conflict(msg) => MediaServiceError::InvalidState(msg),
            AppError::PayloadTooLarge(msg) => MediaServiceError::TooLarge(msg),
            AppError::ExternalService(msg) => MediaServiceError::Upstream(msg),
            _ => MediaServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<MediaServiceError> for AppError {
    fn from(err: MediaServiceError) -> Self {
        match err {
            MediaServiceError::Invalid(msg) => AppError::BadRequest(msg),
            MediaServiceError::TooLarge(msg) => AppError::PayloadTooLarge(msg),
            MediaServiceError::NotFound => AppError::NotFound("Record not found".to_string()),
            MediaServiceError::InvalidState(msg) => AppError::Conflict(msg),
            MediaServiceError::Upstream(msg) => AppError::ExternalService(msg),
            MediaServiceError::Dependency(msg) => AppError::Internal(msg),
            MediaServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
