use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Record kind discriminant. Audio and video rows live in separate tables
/// but share this one model; the repository fills `kind` from the table it
/// read the row from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "lowercase")]
pub enum MediaKind {
    #[serde(rename = "audio")]
    Audio,
    #[serde(rename = "video")]
    Video,
}

impl MediaKind {
    /// Table holding rows of this kind
    pub fn table(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio_records",
            MediaKind::Video => "video_records",
        }
    }

    /// Column holding the natural lookup key (audio text / video title)
    pub fn subject_column(&self) -> &'static str {
        match self {
            MediaKind::Audio => "text",
            MediaKind::Video => "title",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Audio => write!(f, "audio"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "lowercase")]
pub enum RecordStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "failed")]
    Failed,
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordStatus::Pending => write!(f, "pending"),
            RecordStatus::Success => write!(f, "success"),
            RecordStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Which synthesis backend produced an audio record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "lowercase")]
pub enum TtsEngine {
    #[serde(rename = "local")]
    Local,
    #[serde(rename = "cloud")]
    Cloud,
}

impl std::fmt::Display for TtsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TtsEngine::Local => write!(f, "local"),
            TtsEngine::Cloud => write!(f, "cloud"),
        }
    }
}

/// One bookkeeping row for an uploaded artifact: the audio text or video
/// title it belongs to, where it lives in object storage, and the last
/// signed URL minted for it.
///
/// `signed_url` and `expires_at` are written together or not at all; the
/// repository exposes no way to update one without the other.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MediaRecord {
    pub id: Uuid,
    pub kind: MediaKind,
    pub subject: String,
    pub tts_engine: Option<TtsEngine>,
    pub storage_key: Option<String>,
    pub signed_url: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub thumbnail_key: Option<String>,
    pub thumbnail_url: Option<String>,
    pub subtitle_key: Option<String>,
    pub subtitle_url: Option<String>,
    pub subtitle_name: Option<String>,
    pub file_size: Option<i64>,
    pub status: RecordStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Optional artifacts attached to a video record after the main upload.
/// Absent fields stay null when their upload failed or was not requested.
#[derive(Debug, Clone, Default)]
pub struct VideoAssets {
    pub thumbnail_key: Option<String>,
    pub thumbnail_url: Option<String>,
    pub subtitle_key: Option<String>,
    pub subtitle_url: Option<String>,
    pub subtitle_name: Option<String>,
    pub file_size: Option<i64>,
}

impl MediaRecord {
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() > expires_at,
            None => false,
        }
    }

    /// Time left on the signed URL, human readable ("2d 3h", "3h 5m", "12m").
    /// None when there is no URL or it already expired.
    pub fn remaining_time(&self) -> Option<String> {
        let expires_at = self.expires_at?;
        let remaining = expires_at.signed_duration_since(Utc::now());
        if remaining.num_seconds() <= 0 {
            return None;
        }

        let days = remaining.num_days();
        let hours = remaining.num_hours() % 24;
        let minutes = remaining.num_minutes() % 60;

        if days > 0 {
            Some(format!("{}d {}h", days, hours))
        } else if hours > 0 {
            Some(format!("{}h {}m", hours, minutes))
        } else {
            Some(format!("{}m", minutes))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record_expiring_at(expires_at: Option<DateTime<Utc>>) -> MediaRecord {
        MediaRecord {
            id: Uuid::new_v4(),
            kind: MediaKind::Audio,
            subject: "Hello".to_string(),
            tts_engine: Some(TtsEngine::Cloud),
            storage_key: Some("k1".to_string()),
            signed_url: Some("https://example.com/signed".to_string()),
            expires_at,
            thumbnail_key: None,
            thumbnail_url: None,
            subtitle_key: None,
            subtitle_url: None,
            subtitle_name: None,
            file_size: None,
            status: RecordStatus::Success,
            error_message: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_expired_with_past_expiry() {
        let record = record_expiring_at(Some(Utc::now() - Duration::seconds(1)));
        assert!(record.is_expired());
    }

    #[test]
    fn test_is_expired_with_future_expiry() {
        let record = record_expiring_at(Some(Utc::now() + Duration::hours(1)));
        assert!(!record.is_expired());
    }

    #[test]
    fn test_is_expired_without_expiry() {
        let record = record_expiring_at(None);
        assert!(!record.is_expired());
    }

    #[test]
    fn test_remaining_time_none_when_expired() {
        let record = record_expiring_at(Some(Utc::now() - Duration::hours(1)));
        assert_eq!(record.remaining_time(), None);
    }

    #[test]
    fn test_remaining_time_minutes_only() {
        let record = record_expiring_at(Some(Utc::now() + Duration::minutes(12) + Duration::seconds(30)));
        assert_eq!(record.remaining_time(), Some("12m".to_string()));
    }

    #[test]
    fn test_remaining_time_hours_and_minutes() {
        let record = record_expiring_at(Some(Utc::now() + Duration::hours(3) + Duration::minutes(5) + Duration::seconds(30)));
        assert_eq!(record.remaining_time(), Some("3h 5m".to_string()));
    }

    #[test]
    fn test_remaining_time_days_and_hours() {
        let record = record_expiring_at(Some(Utc::now() + Duration::days(2) + Duration::hours(3) + Duration::minutes(1)));
        assert_eq!(record.remaining_time(), Some("2d 3h".to_string()));
    }

    #[test]
    fn test_kind_table_mapping() {
        assert_eq!(MediaKind::Audio.table(), "audio_records");
        assert_eq!(MediaKind::Video.table(), "video_records");
        assert_eq!(MediaKind::Audio.subject_column(), "text");
        assert_eq!(MediaKind::Video.subject_column(), "title");
    }
}
