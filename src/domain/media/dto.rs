use super::model::{MediaKind, MediaRecord, RecordStatus, TtsEngine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request for POST /api/get-audio-url/
#[derive(Debug, Serialize, Deserialize)]
pub struct GetAudioUrlRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_type: Option<TtsEngine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_time: Option<i64>,
}

/// Request for POST /api/upload-audio/
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadAudioRequest {
    pub file_path: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_type: Option<TtsEngine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_time: Option<i64>,
}

/// Request for POST /api/upload-video/
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadVideoRequest {
    pub file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_time: Option<i64>,
}

/// Request for POST /api/get-video-url/
#[derive(Debug, Serialize, Deserialize)]
pub struct GetVideoUrlRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_time: Option<i64>,
}

/// Request body for the renew endpoints
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RenewRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_time: Option<i64>,
}

/// Query string for the list endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub q: Option<String>,
}

/// One record as returned by detail and list endpoints. Audio-only and
/// video-only fields are omitted for the other kind.
#[derive(Debug, Serialize, Deserialize)]
pub struct MediaRecordDto {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_type: Option<TtsEngine>,
    pub status: RecordStatus,
    pub url: Option<String>,
    pub object_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub expire_time: Option<DateTime<Utc>>,
    pub is_expired: bool,
    pub remaining_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl From<&MediaRecord> for MediaRecordDto {
    fn from(record: &MediaRecord) -> Self {
        let (text, title) = match record.kind {
            MediaKind::Audio => (Some(record.subject.clone()), None),
            MediaKind::Video => (None, Some(record.subject.clone())),
        };

        MediaRecordDto {
            id: record.id,
            text,
            title,
            tts_type: record.tts_engine,
            status: record.status,
            url: record.signed_url.clone(),
            object_key: record.storage_key.clone(),
            thumbnail_url: record.thumbnail_url.clone(),
            subtitle_url: record.subtitle_url.clone(),
            subtitle_name: record.subtitle_name.clone(),
            file_size: record.file_size,
            created_at: record.created_at,
            expire_time: record.expires_at,
            is_expired: record.is_expired(),
            remaining_time: record.remaining_time(),
            error_message: record.error_message.clone(),
        }
    }
}

/// Response for POST /api/get-audio-url/ and /api/get-video-url/
#[derive(Debug, Serialize, Deserialize)]
pub struct MediaUrlResponse {
    pub success: bool,
    pub url: String,
    pub expire_time: DateTime<Utc>,
    pub is_new: bool,
    pub is_renewed: bool,
    pub record_id: Uuid,
    pub remaining_time: Option<String>,
}

/// Response for the path-based upload endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    pub expire_time: DateTime<Utc>,
    pub record_id: Uuid,
    pub object_key: String,
}

/// Response for POST /api/upload-video-file/
#[derive(Debug, Serialize, Deserialize)]
pub struct VideoUploadResponse {
    pub success: bool,
    pub record_id: Uuid,
    pub title: String,
    pub url: String,
    pub expire_time: DateTime<Utc>,
    pub object_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle_url: Option<String>,
}

/// Response for the detail endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordDetailResponse {
    pub success: bool,
    pub auto_renewed: bool,
    pub data: MediaRecordDto,
}

/// Response for the list endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<MediaRecordDto>,
}

/// Response for the renew endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct RenewResponse {
    pub success: bool,
    pub url: String,
    pub expire_time: DateTime<Utc>,
    pub record_id: Uuid,
}

/// Response for the delete endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}
