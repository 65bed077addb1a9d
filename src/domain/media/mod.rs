pub mod dto;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod service;
pub mod subtitle;

pub use dto::*;
pub use error::MediaServiceError;
pub use lifecycle::{
    needs_renewal, FreshUrl, UrlLifecycle, DETAIL_RENEWAL_THRESHOLD, LIST_RENEWAL_THRESHOLD,
};
pub use model::{MediaKind, MediaRecord, RecordStatus, TtsEngine, VideoAssets};
pub use service::{MediaService, MediaServiceApi, MediaUrlOutcome, RecordView, UploadOutcome};
