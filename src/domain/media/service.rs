use super::error::MediaServiceError;
use super::lifecycle::{FreshUrl, UrlLifecycle, DETAIL_RENEWAL_THRESHOLD, LIST_RENEWAL_THRESHOLD};
use super::model::{MediaKind, MediaRecord, RecordStatus, TtsEngine, VideoAssets};
use super::subtitle::srt_to_vtt;
use crate::infrastructure::repositories::{MediaRepository, StorageRepository, TtsRepository};
use crate::infrastructure::thumbnail::ThumbnailGenerator;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const MAX_TEXT_CHARS: usize = 10_000;
const MAX_SUBJECT_CHARS: usize = 200;
const DEFAULT_LIST_LIMIT: i64 = 20;
const MAX_LIST_LIMIT: i64 = 100;

/// Outcome of a find-or-create / lookup URL request
#[derive(Debug, Clone)]
pub struct MediaUrlOutcome {
    pub record: MediaRecord,
    pub url: String,
    pub expires_at: DateTime<Utc>,
    pub is_new: bool,
    pub is_renewed: bool,
}

/// Outcome of an upload request
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub record: MediaRecord,
    pub url: String,
    pub expires_at: DateTime<Utc>,
    pub object_key: String,
}

/// A record plus whether reading it triggered a URL renewal
#[derive(Debug, Clone)]
pub struct RecordView {
    pub record: MediaRecord,
    pub auto_renewed: bool,
}

pub struct MediaService {
    media_repo: Arc<dyn MediaRepository>,
    storage_repo: Arc<dyn StorageRepository>,
    local_tts: Arc<dyn TtsRepository>,
    cloud_tts: Arc<dyn TtsRepository>,
    lifecycle: UrlLifecycle,
    thumbnails: Arc<ThumbnailGenerator>,
    default_url_ttl: i64,
}

impl MediaService {
    pub fn new(
        media_repo: Arc<dyn MediaRepository>,
        storage_repo: Arc<dyn StorageRepository>,
        local_tts: Arc<dyn TtsRepository>,
        cloud_tts: Arc<dyn TtsRepository>,
        thumbnails: Arc<ThumbnailGenerator>,
        default_url_ttl: i64,
    ) -> Self {
        let lifecycle = UrlLifecycle::new(media_repo.clone(), storage_repo.clone());
        Self {
            media_repo,
            storage_repo,
            local_tts,
            cloud_tts,
            lifecycle,
            thumbnails,
            default_url_ttl,
        }
    }
}

#[async_trait]
pub trait MediaServiceApi: Send + Sync {
    /// Find-or-create for audio: reuse the newest successful record with
    /// the same text (renewing its URL when needed), otherwise synthesize,
    /// upload and sign a fresh one.
    async fn get_or_create_audio(
        &self,
        text: String,
        tts_type: Option<TtsEngine>,
        expire_time: Option<i64>,
    ) -> Result<MediaUrlOutcome, MediaServiceError>;

    /// Upload a pre-existing local audio file; no TTS call
    async fn upload_audio_from_path(
        &self,
        file_path: String,
        text: String,
        tts_type: Option<TtsEngine>,
        expire_time: Option<i64>,
    ) -> Result<UploadOutcome, MediaServiceError>;

    /// Upload a pre-existing local video file
    async fn upload_video_from_path(
        &self,
        file_path: String,
        title: Option<String>,
        expire_time: Option<i64>,
    ) -> Result<UploadOutcome, MediaServiceError>;

    /// Upload video bytes received over multipart, with optional subtitle;
    /// a thumbnail is extracted with ffmpeg. Thumbnail and subtitle
    /// failures are non-fatal.
    async fn upload_video_file(
        &self,
        filename: String,
        data: Vec<u8>,
        title: Option<String>,
        subtitle: Option<(String, Vec<u8>)>,
        expire_time: Option<i64>,
    ) -> Result<UploadOutcome, MediaServiceError>;

    /// Lookup-only URL fetch for video by title
    async fn get_video_url(
        &self,
        title: String,
        expire_time: Option<i64>,
    ) -> Result<MediaUrlOutcome, MediaServiceError>;

    /// Single record, renewing its URL when it is about to expire
    async fn record_detail(
        &self,
        kind: MediaKind,
        id: Uuid,
    ) -> Result<RecordView, MediaServiceError>;

    /// Newest-first listing; expired URLs are re-signed, fresh ones left
    /// untouched
    async fn list_records(
        &self,
        kind: MediaKind,
        limit: Option<i64>,
        search: Option<String>,
    ) -> Result<Vec<MediaRecord>, MediaServiceError>;

    /// Unconditional URL regeneration
    async fn renew_record(
        &self,
        kind: MediaKind,
        id: Uuid,
        expire_time: Option<i64>,
    ) -> Result<FreshUrl, MediaServiceError>;

    /// Delete the backing objects and the row
    async fn delete_record(&self, kind: MediaKind, id: Uuid) -> Result<(), MediaServiceError>;

    /// Subtitle proxy body: the stored subtitle as WebVTT
    async fn video_subtitle(&self, id: Uuid) -> Result<String, MediaServiceError>;
}

#[async_trait]
impl MediaServiceApi for MediaService {
    async fn get_or_create_audio(
        &self,
        text: String,
        tts_type: Option<TtsEngine>,
        expire_time: Option<i64>,
    ) -> Result<MediaUrlOutcome, MediaServiceError> {
        let ttl = self.resolve_ttl(expire_time)?;
        self.validate_text(&text)?;
        let engine = tts_type.unwrap_or(TtsEngine::Local);

        tracing::info!(
            text_length = text.len(),
            engine = %engine,
            ttl_secs = ttl,
            "Audio URL request"
        );

        // Dedup on exact text, newest successful row wins
        if let Some(mut record) = self
            .media_repo
            .find_latest_success_by_subject(MediaKind::Audio, &text)
            .await
            .map_err(|e| MediaServiceError::Dependency(e.to_string()))?
        {
            let fresh = self
                .lifecycle
                .ensure_fresh(&record, ttl, DETAIL_RENEWAL_THRESHOLD)
                .await?;
            apply_fresh(&mut record, &fresh);

            return Ok(MediaUrlOutcome {
                url: fresh.url,
                expires_at: fresh.expires_at,
                is_new: false,
                is_renewed: fresh.was_renewed,
                record,
            });
        }

        // No reusable record: synthesize, upload, sign
        let mut record = self
            .media_repo
            .create_pending(MediaKind::Audio, &text, Some(engine))
            .await
            .map_err(|e| MediaServiceError::Dependency(e.to_string()))?;

        let audio = match self.tts_for(engine).synthesize(&text).await {
            Ok(audio) => audio,
            Err(message) => {
                return Err(self
                    .fail_record(MediaKind::Audio, record.id, format!("TTS failed: {}", message))
                    .await);
            }
        };

        let object_key = audio_object_key(engine, audio.extension);
        let (url, expires_at) = match self
            .upload_and_sign(&object_key, audio.data, audio.content_type, ttl)
            .await
        {
            Ok(pair) => pair,
            Err(message) => {
                return Err(self.fail_record(MediaKind::Audio, record.id, message).await);
            }
        };

        self.media_repo
            .mark_success(MediaKind::Audio, record.id, &object_key, &url, expires_at)
            .await
            .map_err(|e| MediaServiceError::Dependency(e.to_string()))?;

        record.status = RecordStatus::Success;
        record.storage_key = Some(object_key);
        record.signed_url = Some(url.clone());
        record.expires_at = Some(expires_at);

        Ok(MediaUrlOutcome {
            record,
            url,
            expires_at,
            is_new: true,
            is_renewed: false,
        })
    }

    async fn upload_audio_from_path(
        &self,
        file_path: String,
        text: String,
        tts_type: Option<TtsEngine>,
        expire_time: Option<i64>,
    ) -> Result<UploadOutcome, MediaServiceError> {
        let ttl = self.resolve_ttl(expire_time)?;
        self.validate_text(&text)?;

        let data = tokio::fs::read(&file_path)
            .await
            .map_err(|e| MediaServiceError::Invalid(format!("cannot read {}: {}", file_path, e)))?;

        let object_key = basename(&file_path);
        let content_type = content_type_for(&extension_of(&object_key));

        let record = self
            .media_repo
            .create_pending(MediaKind::Audio, &text, tts_type)
            .await
            .map_err(|e| MediaServiceError::Dependency(e.to_string()))?;

        self.finish_upload(record, object_key, data, content_type, ttl)
            .await
    }

    async fn upload_video_from_path(
        &self,
        file_path: String,
        title: Option<String>,
        expire_time: Option<i64>,
    ) -> Result<UploadOutcome, MediaServiceError> {
        let ttl = self.resolve_ttl(expire_time)?;
        let title = resolve_title(title, &file_path);
        self.validate_subject(&title)?;

        let data = tokio::fs::read(&file_path)
            .await
            .map_err(|e| MediaServiceError::Invalid(format!("cannot read {}: {}", file_path, e)))?;
        let file_size = data.len() as i64;

        let object_key = basename(&file_path);
        let content_type = content_type_for(&extension_of(&object_key));

        let record = self
            .media_repo
            .create_pending(MediaKind::Video, &title, None)
            .await
            .map_err(|e| MediaServiceError::Dependency(e.to_string()))?;

        let mut outcome = self
            .finish_upload(record, object_key, data, content_type, ttl)
            .await?;

        let mut assets = VideoAssets {
            file_size: Some(file_size),
            ..VideoAssets::default()
        };
        self.attach_thumbnail(&outcome, Path::new(&file_path), ttl, &mut assets)
            .await;
        self.persist_assets(&mut outcome.record, assets).await;

        Ok(outcome)
    }

    async fn upload_video_file(
        &self,
        filename: String,
        data: Vec<u8>,
        title: Option<String>,
        subtitle: Option<(String, Vec<u8>)>,
        expire_time: Option<i64>,
    ) -> Result<UploadOutcome, MediaServiceError> {
        let ttl = self.resolve_ttl(expire_time)?;
        if data.is_empty() {
            return Err(MediaServiceError::Invalid(
                "video_file is empty".to_string(),
            ));
        }
        let title = resolve_title(title, &filename);
        self.validate_subject(&title)?;

        let file_size = data.len() as i64;
        let extension = extension_of(&filename);
        let object_key = video_object_key(&extension);
        let content_type = content_type_for(&extension);

        // ffmpeg needs a file on disk; keep a temp copy for the thumbnail
        let temp_path =
            std::env::temp_dir().join(format!("upload_{}.{}", Uuid::new_v4().simple(), extension));
        if let Err(e) = tokio::fs::write(&temp_path, &data).await {
            tracing::warn!(error = %e, "Could not stage video for thumbnail extraction");
        }

        let record = self
            .media_repo
            .create_pending(MediaKind::Video, &title, None)
            .await
            .map_err(|e| MediaServiceError::Dependency(e.to_string()))?;

        let result = self
            .finish_upload(record, object_key, data, content_type, ttl)
            .await;

        let mut outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                let _ = tokio::fs::remove_file(&temp_path).await;
                return Err(e);
            }
        };

        let mut assets = VideoAssets {
            file_size: Some(file_size),
            ..VideoAssets::default()
        };
        self.attach_thumbnail(&outcome, &temp_path, ttl, &mut assets)
            .await;
        let _ = tokio::fs::remove_file(&temp_path).await;

        if let Some((subtitle_name, subtitle_data)) = subtitle {
            self.attach_subtitle(subtitle_name, subtitle_data, ttl, &mut assets)
                .await;
        }

        self.persist_assets(&mut outcome.record, assets).await;

        Ok(outcome)
    }

    async fn get_video_url(
        &self,
        title: String,
        expire_time: Option<i64>,
    ) -> Result<MediaUrlOutcome, MediaServiceError> {
        let ttl = self.resolve_ttl(expire_time)?;
        self.validate_subject(&title)?;

        let mut record = self
            .media_repo
            .find_latest_success_by_subject(MediaKind::Video, &title)
            .await
            .map_err(|e| MediaServiceError::Dependency(e.to_string()))?
            .ok_or(MediaServiceError::NotFound)?;

        let fresh = self
            .lifecycle
            .ensure_fresh(&record, ttl, DETAIL_RENEWAL_THRESHOLD)
            .await?;
        apply_fresh(&mut record, &fresh);

        Ok(MediaUrlOutcome {
            url: fresh.url,
            expires_at: fresh.expires_at,
            is_new: false,
            is_renewed: fresh.was_renewed,
            record,
        })
    }

    async fn record_detail(
        &self,
        kind: MediaKind,
        id: Uuid,
    ) -> Result<RecordView, MediaServiceError> {
        let mut record = self
            .media_repo
            .find_by_id(kind, id)
            .await
            .map_err(|e| MediaServiceError::Dependency(e.to_string()))?
            .ok_or(MediaServiceError::NotFound)?;

        let mut auto_renewed = false;
        if record.status == RecordStatus::Success && record.storage_key.is_some() {
            let fresh = self
                .lifecycle
                .ensure_fresh(&record, self.default_url_ttl, DETAIL_RENEWAL_THRESHOLD)
                .await?;
            apply_fresh(&mut record, &fresh);
            auto_renewed = fresh.was_renewed;
        }

        Ok(RecordView {
            record,
            auto_renewed,
        })
    }

    async fn list_records(
        &self,
        kind: MediaKind,
        limit: Option<i64>,
        search: Option<String>,
    ) -> Result<Vec<MediaRecord>, MediaServiceError> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
        let search = search.filter(|s| !s.trim().is_empty());

        let mut records = self
            .media_repo
            .list(kind, limit, search.as_deref())
            .await
            .map_err(|e| MediaServiceError::Dependency(e.to_string()))?;

        // Re-sign only rows whose URL actually expired; a failure leaves
        // that row stale rather than failing the whole listing
        for record in &mut records {
            if record.status != RecordStatus::Success || record.storage_key.is_none() {
                continue;
            }
            match self
                .lifecycle
                .ensure_fresh(record, self.default_url_ttl, LIST_RENEWAL_THRESHOLD)
                .await
            {
                Ok(fresh) => apply_fresh(record, &fresh),
                Err(e) => {
                    tracing::warn!(
                        record_id = %record.id,
                        error = %e,
                        "Could not refresh signed URL for listing"
                    );
                }
            }
        }

        Ok(records)
    }

    async fn renew_record(
        &self,
        kind: MediaKind,
        id: Uuid,
        expire_time: Option<i64>,
    ) -> Result<FreshUrl, MediaServiceError> {
        let ttl = self.resolve_ttl(expire_time)?;

        let record = self
            .media_repo
            .find_by_id(kind, id)
            .await
            .map_err(|e| MediaServiceError::Dependency(e.to_string()))?
            .ok_or(MediaServiceError::NotFound)?;

        self.lifecycle.renew(&record, ttl).await
    }

    async fn delete_record(&self, kind: MediaKind, id: Uuid) -> Result<(), MediaServiceError> {
        let record = self
            .media_repo
            .find_by_id(kind, id)
            .await
            .map_err(|e| MediaServiceError::Dependency(e.to_string()))?
            .ok_or(MediaServiceError::NotFound)?;

        // The main artifact must go before the row; optional assets are
        // best-effort
        if let Some(storage_key) = &record.storage_key {
            self.storage_repo
                .delete(storage_key)
                .await
                .map_err(|e| MediaServiceError::Upstream(e.to_string()))?;
        }
        for key in [&record.thumbnail_key, &record.subtitle_key]
            .into_iter()
            .flatten()
        {
            if let Err(e) = self.storage_repo.delete(key).await {
                tracing::warn!(record_id = %id, object_key = %key, error = %e, "Asset delete failed");
            }
        }

        self.media_repo
            .delete(kind, id)
            .await
            .map_err(|e| MediaServiceError::Dependency(e.to_string()))?;

        tracing::info!(record_id = %id, kind = %kind, "Record deleted");

        Ok(())
    }

    async fn video_subtitle(&self, id: Uuid) -> Result<String, MediaServiceError> {
        let record = self
            .media_repo
            .find_by_id(MediaKind::Video, id)
            .await
            .map_err(|e| MediaServiceError::Dependency(e.to_string()))?
            .ok_or(MediaServiceError::NotFound)?;

        let subtitle_key = record
            .subtitle_key
            .as_deref()
            .ok_or(MediaServiceError::NotFound)?;

        let raw = self
            .storage_repo
            .download(subtitle_key)
            .await
            .map_err(|e| MediaServiceError::Upstream(e.to_string()))?;

        let content = String::from_utf8_lossy(&raw).into_owned();
        Ok(srt_to_vtt(&content))
    }
}

impl MediaService {
    fn tts_for(&self, engine: TtsEngine) -> &Arc<dyn TtsRepository> {
        match engine {
            TtsEngine::Local => &self.local_tts,
            TtsEngine::Cloud => &self.cloud_tts,
        }
    }

    fn resolve_ttl(&self, expire_time: Option<i64>) -> Result<i64, MediaServiceError> {
        let ttl = expire_time.unwrap_or(self.default_url_ttl);
        if ttl <= 0 {
            return Err(MediaServiceError::Invalid(
                "expire_time must be a positive number of seconds".to_string(),
            ));
        }
        Ok(ttl)
    }

    fn validate_text(&self, text: &str) -> Result<(), MediaServiceError> {
        if text.trim().is_empty() {
            return Err(MediaServiceError::Invalid("text cannot be empty".to_string()));
        }
        if text.len() > MAX_TEXT_CHARS {
            return Err(MediaServiceError::TooLarge(format!(
                "text must be {} characters or less",
                MAX_TEXT_CHARS
            )));
        }
        Ok(())
    }

    fn validate_subject(&self, subject: &str) -> Result<(), MediaServiceError> {
        if subject.trim().is_empty() {
            return Err(MediaServiceError::Invalid("title cannot be empty".to_string()));
        }
        if subject.len() > MAX_SUBJECT_CHARS {
            return Err(MediaServiceError::Invalid(format!(
                "title must be {} characters or less",
                MAX_SUBJECT_CHARS
            )));
        }
        Ok(())
    }

    /// Upload bytes and mint the first signed URL for them
    async fn upload_and_sign(
        &self,
        object_key: &str,
        data: Vec<u8>,
        content_type: &str,
        ttl: i64,
    ) -> Result<(String, DateTime<Utc>), String> {
        self.storage_repo
            .upload(object_key, data, content_type)
            .await
            .map_err(|e| format!("upload failed: {}", e))?;

        let url = self
            .storage_repo
            .presigned_get_url(object_key, Duration::from_secs(ttl as u64))
            .await
            .map_err(|e| format!("presign failed: {}", e))?;

        Ok((url, Utc::now() + ChronoDuration::seconds(ttl)))
    }

    /// Shared tail of every upload flow: upload, sign, flip the record to
    /// its terminal state
    async fn finish_upload(
        &self,
        mut record: MediaRecord,
        object_key: String,
        data: Vec<u8>,
        content_type: &str,
        ttl: i64,
    ) -> Result<UploadOutcome, MediaServiceError> {
        let kind = record.kind;

        let (url, expires_at) = match self
            .upload_and_sign(&object_key, data, content_type, ttl)
            .await
        {
            Ok(pair) => pair,
            Err(message) => return Err(self.fail_record(kind, record.id, message).await),
        };

        self.media_repo
            .mark_success(kind, record.id, &object_key, &url, expires_at)
            .await
            .map_err(|e| MediaServiceError::Dependency(e.to_string()))?;

        record.status = RecordStatus::Success;
        record.storage_key = Some(object_key.clone());
        record.signed_url = Some(url.clone());
        record.expires_at = Some(expires_at);

        Ok(UploadOutcome {
            record,
            url,
            expires_at,
            object_key,
        })
    }

    /// Flip the record to failed and hand back the upstream error
    async fn fail_record(
        &self,
        kind: MediaKind,
        id: Uuid,
        message: String,
    ) -> MediaServiceError {
        if let Err(e) = self.media_repo.mark_failed(kind, id, &message).await {
            tracing::error!(record_id = %id, error = %e, "Could not mark record failed");
        }
        MediaServiceError::Upstream(message)
    }

    /// Extract, upload and sign a thumbnail; failures only log
    async fn attach_thumbnail(
        &self,
        outcome: &UploadOutcome,
        video_path: &Path,
        ttl: i64,
        assets: &mut VideoAssets,
    ) {
        let frame = match self.thumbnails.extract_frame(video_path).await {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(record_id = %outcome.record.id, error = %e, "Thumbnail extraction failed");
                return;
            }
        };

        let thumbnail_key = thumbnail_key_for(&outcome.object_key);
        match self
            .upload_and_sign(&thumbnail_key, frame, "image/jpeg", ttl)
            .await
        {
            Ok((url, _)) => {
                assets.thumbnail_key = Some(thumbnail_key);
                assets.thumbnail_url = Some(url);
            }
            Err(e) => {
                tracing::warn!(record_id = %outcome.record.id, error = %e, "Thumbnail upload failed");
            }
        }
    }

    /// Upload and sign a subtitle file; failures only log
    async fn attach_subtitle(
        &self,
        subtitle_name: String,
        data: Vec<u8>,
        ttl: i64,
        assets: &mut VideoAssets,
    ) {
        let extension = extension_of(&subtitle_name);
        let subtitle_key = subtitle_object_key(&extension);
        let content_type = content_type_for(&extension);

        match self
            .upload_and_sign(&subtitle_key, data, content_type, ttl)
            .await
        {
            Ok((url, _)) => {
                assets.subtitle_key = Some(subtitle_key);
                assets.subtitle_url = Some(url);
                assets.subtitle_name = Some(subtitle_name);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Subtitle upload failed");
            }
        }
    }

    /// Persist collected assets and mirror them onto the in-memory record
    async fn persist_assets(&self, record: &mut MediaRecord, assets: VideoAssets) {
        if let Err(e) = self.media_repo.set_video_assets(record.id, &assets).await {
            tracing::error!(record_id = %record.id, error = %e, "Could not persist video assets");
            return;
        }
        record.thumbnail_key = assets.thumbnail_key;
        record.thumbnail_url = assets.thumbnail_url;
        record.subtitle_key = assets.subtitle_key;
        record.subtitle_url = assets.subtitle_url;
        record.subtitle_name = assets.subtitle_name;
        record.file_size = assets.file_size;
    }
}

fn apply_fresh(record: &mut MediaRecord, fresh: &FreshUrl) {
    record.signed_url = Some(fresh.url.clone());
    record.expires_at = Some(fresh.expires_at);
}

fn resolve_title(title: Option<String>, filename: &str) -> String {
    match title.map(|t| t.trim().to_string()) {
        Some(title) if !title.is_empty() => title,
        _ => file_stem(filename),
    }
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

/// Object key for synthesized audio: `<engine>_<uid>_<unix-ts>.<ext>`
fn audio_object_key(engine: TtsEngine, extension: &str) -> String {
    format!(
        "{}_{}_{}.{}",
        engine,
        short_id(),
        Utc::now().timestamp(),
        extension
    )
}

fn video_object_key(extension: &str) -> String {
    format!("video_{}_{}.{}", short_id(), Utc::now().timestamp(), extension)
}

fn subtitle_object_key(extension: &str) -> String {
    format!("sub_{}_{}.{}", short_id(), Utc::now().timestamp(), extension)
}

/// Thumbnail key derived from the video key: the extension becomes
/// `_thumb.jpg`
fn thumbnail_key_for(video_key: &str) -> String {
    format!("{}_thumb.jpg", file_stem(video_key))
}

fn basename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| "bin".to_string())
}

fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "srt" => "application/x-subrip",
        "vtt" => "text/vtt",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_object_key_format() {
        let key = audio_object_key(TtsEngine::Cloud, "mp3");
        let pattern = regex::Regex::new(r"^cloud_[0-9a-f]{12}_\d+\.mp3$").unwrap();
        assert!(pattern.is_match(&key), "unexpected key: {}", key);
    }

    #[test]
    fn test_video_object_key_format() {
        let key = video_object_key("mp4");
        let pattern = regex::Regex::new(r"^video_[0-9a-f]{12}_\d+\.mp4$").unwrap();
        assert!(pattern.is_match(&key), "unexpected key: {}", key);
    }

    #[test]
    fn test_thumbnail_key_replaces_extension() {
        assert_eq!(
            thumbnail_key_for("video_ab12cd34ef56_1722950000.mp4"),
            "video_ab12cd34ef56_1722950000_thumb.jpg"
        );
    }

    #[test]
    fn test_basename_and_stem() {
        assert_eq!(basename("/tmp/audio/clip.wav"), "clip.wav");
        assert_eq!(file_stem("/tmp/audio/clip.wav"), "clip");
    }

    #[test]
    fn test_extension_defaults_to_bin() {
        assert_eq!(extension_of("noext"), "bin");
        assert_eq!(extension_of("movie.MP4"), "mp4");
    }

    #[test]
    fn test_content_type_mapping() {
        assert_eq!(content_type_for("mp3"), "audio/mpeg");
        assert_eq!(content_type_for("srt"), "application/x-subrip");
        assert_eq!(content_type_for("weird"), "application/octet-stream");
    }

    #[test]
    fn test_resolve_title_prefers_explicit_title() {
        assert_eq!(
            resolve_title(Some("My Talk".to_string()), "raw_upload.mp4"),
            "My Talk"
        );
        assert_eq!(resolve_title(None, "raw_upload.mp4"), "raw_upload");
        assert_eq!(resolve_title(Some("  ".to_string()), "raw_upload.mp4"), "raw_upload");
    }
}
