//! Service-level flow tests over in-memory repository implementations.
//!
//! The storage, TTS, and record-store seams are all traits, so the full
//! find-or-create / renew / delete lifecycle can be exercised without a
//! database or AWS credentials.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use mediavault_backend::domain::media::{
    MediaKind, MediaRecord, MediaService, MediaServiceApi, MediaServiceError, RecordStatus,
    TtsEngine, UrlLifecycle, VideoAssets, DETAIL_RENEWAL_THRESHOLD,
};
use mediavault_backend::error::AppResult;
use mediavault_backend::infrastructure::repositories::{
    MediaRepository, StorageError, StorageRepository, StorageResult, TtsAudio, TtsRepository,
};
use mediavault_backend::infrastructure::thumbnail::ThumbnailGenerator;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// Record store backed by a HashMap. Counts signed-URL writes so tests can
/// assert the zero-write property of the fresh-URL path.
#[derive(Default)]
struct InMemoryMediaRepository {
    records: Mutex<HashMap<Uuid, MediaRecord>>,
    url_writes: AtomicUsize,
}

impl InMemoryMediaRepository {
    fn get(&self, id: Uuid) -> Option<MediaRecord> {
        self.records.lock().unwrap().get(&id).cloned()
    }

    fn insert(&self, record: MediaRecord) {
        self.records.lock().unwrap().insert(record.id, record);
    }

    fn force_expire(&self, id: Uuid) {
        let mut records = self.records.lock().unwrap();
        let record = records.get_mut(&id).unwrap();
        record.expires_at = Some(Utc::now() - ChronoDuration::seconds(1));
    }

    fn url_write_count(&self) -> usize {
        self.url_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaRepository for InMemoryMediaRepository {
    async fn create_pending(
        &self,
        kind: MediaKind,
        subject: &str,
        tts_engine: Option<TtsEngine>,
    ) -> AppResult<MediaRecord> {
        let record = MediaRecord {
            id: Uuid::new_v4(),
            kind,
            subject: subject.to_string(),
            tts_engine,
            storage_key: None,
            signed_url: None,
            expires_at: None,
            thumbnail_key: None,
            thumbnail_url: None,
            subtitle_key: None,
            subtitle_url: None,
            subtitle_name: None,
            file_size: None,
            status: RecordStatus::Pending,
            error_message: None,
            created_at: Utc::now(),
        };
        self.insert(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, kind: MediaKind, id: Uuid) -> AppResult<Option<MediaRecord>> {
        Ok(self.get(id).filter(|r| r.kind == kind))
    }

    async fn find_latest_success_by_subject(
        &self,
        kind: MediaKind,
        subject: &str,
    ) -> AppResult<Option<MediaRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .values()
            .filter(|r| {
                r.kind == kind && r.subject == subject && r.status == RecordStatus::Success
            })
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn list(
        &self,
        kind: MediaKind,
        limit: i64,
        search: Option<&str>,
    ) -> AppResult<Vec<MediaRecord>> {
        let records = self.records.lock().unwrap();
        let mut matching: Vec<MediaRecord> = records
            .values()
            .filter(|r| r.kind == kind)
            .filter(|r| match search {
                Some(q) => r.subject.to_lowercase().contains(&q.to_lowercase()),
                None => true,
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit as usize);
        Ok(matching)
    }

    async fn mark_success(
        &self,
        _kind: MediaKind,
        id: Uuid,
        storage_key: &str,
        signed_url: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut records = self.records.lock().unwrap();
        let record = records.get_mut(&id).unwrap();
        record.status = RecordStatus::Success;
        record.storage_key = Some(storage_key.to_string());
        record.signed_url = Some(signed_url.to_string());
        record.expires_at = Some(expires_at);
        Ok(())
    }

    async fn mark_failed(&self, _kind: MediaKind, id: Uuid, error_message: &str) -> AppResult<()> {
        let mut records = self.records.lock().unwrap();
        let record = records.get_mut(&id).unwrap();
        record.status = RecordStatus::Failed;
        record.error_message = Some(error_message.to_string());
        Ok(())
    }

    async fn update_signed_url(
        &self,
        _kind: MediaKind,
        id: Uuid,
        signed_url: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.url_writes.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap();
        let record = records.get_mut(&id).unwrap();
        record.signed_url = Some(signed_url.to_string());
        record.expires_at = Some(expires_at);
        Ok(())
    }

    async fn set_video_assets(&self, id: Uuid, assets: &VideoAssets) -> AppResult<()> {
        let mut records = self.records.lock().unwrap();
        let record = records.get_mut(&id).unwrap();
        record.thumbnail_key = assets.thumbnail_key.clone();
        record.thumbnail_url = assets.thumbnail_url.clone();
        record.subtitle_key = assets.subtitle_key.clone();
        record.subtitle_url = assets.subtitle_url.clone();
        record.subtitle_name = assets.subtitle_name.clone();
        record.file_size = assets.file_size;
        Ok(())
    }

    async fn delete(&self, _kind: MediaKind, id: Uuid) -> AppResult<bool> {
        Ok(self.records.lock().unwrap().remove(&id).is_some())
    }
}

/// Object store backed by a HashMap; every presign mints a distinct URL and
/// bumps a counter.
#[derive(Default)]
struct InMemoryStorageRepository {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    sign_calls: AtomicUsize,
}

impl InMemoryStorageRepository {
    fn contains(&self, object_key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(object_key)
    }

    fn sign_call_count(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageRepository for InMemoryStorageRepository {
    async fn upload(
        &self,
        object_key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<()> {
        self.objects
            .lock()
            .unwrap()
            .insert(object_key.to_string(), data);
        Ok(())
    }

    async fn presigned_get_url(
        &self,
        object_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let serial = self.sign_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!(
            "https://storage.test/{}?exp={}&sig={}",
            object_key,
            expires_in.as_secs(),
            serial
        ))
    }

    async fn download(&self, object_key: &str) -> StorageResult<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(object_key)
            .cloned()
            .ok_or_else(|| StorageError::Server(format!("no such key: {}", object_key)))
    }

    async fn delete(&self, object_key: &str) -> StorageResult<()> {
        self.objects.lock().unwrap().remove(object_key);
        Ok(())
    }
}

/// Synthesizer returning a canned MP3 frame
struct StubTtsRepository;

fn stub_audio_bytes() -> Vec<u8> {
    // Minimal MP3 frame header plus padding
    vec![0xFF, 0xFB, 0x90, 0x00, 0x00, 0x00, 0x00, 0x00]
}

#[async_trait]
impl TtsRepository for StubTtsRepository {
    async fn synthesize(&self, _text: &str) -> Result<TtsAudio, String> {
        Ok(TtsAudio {
            data: stub_audio_bytes(),
            extension: "mp3",
            content_type: "audio/mpeg",
        })
    }
}

struct TestHarness {
    media_repo: Arc<InMemoryMediaRepository>,
    storage_repo: Arc<InMemoryStorageRepository>,
    service: MediaService,
}

fn harness() -> TestHarness {
    let media_repo = Arc::new(InMemoryMediaRepository::default());
    let storage_repo = Arc::new(InMemoryStorageRepository::default());
    let tts = Arc::new(StubTtsRepository);
    let service = MediaService::new(
        media_repo.clone(),
        storage_repo.clone(),
        tts.clone(),
        tts,
        Arc::new(ThumbnailGenerator::new()),
        3600,
    );
    TestHarness {
        media_repo,
        storage_repo,
        service,
    }
}

fn success_record(subject: &str, storage_key: Option<&str>) -> MediaRecord {
    MediaRecord {
        id: Uuid::new_v4(),
        kind: MediaKind::Audio,
        subject: subject.to_string(),
        tts_engine: Some(TtsEngine::Cloud),
        storage_key: storage_key.map(|k| k.to_string()),
        signed_url: storage_key.map(|k| format!("https://storage.test/{}?sig=seed", k)),
        expires_at: Some(Utc::now() + ChronoDuration::hours(1)),
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

#[tokio::test]
async fn audio_find_or_create_end_to_end() {
    let h = harness();

    // First request synthesizes, uploads and signs
    let first = h
        .service
        .get_or_create_audio("Hello, world!".to_string(), Some(TtsEngine::Cloud), Some(3600))
        .await
        .unwrap();
    assert!(first.is_new);
    assert!(!first.is_renewed);
    assert!(first.expires_at > Utc::now());
    let object_key = first.record.storage_key.clone().unwrap();
    assert!(h.storage_repo.contains(&object_key));

    // Second request reuses the record without touching storage or the store
    let signs_before = h.storage_repo.sign_call_count();
    let writes_before = h.media_repo.url_write_count();
    let second = h
        .service
        .get_or_create_audio("Hello, world!".to_string(), Some(TtsEngine::Cloud), Some(3600))
        .await
        .unwrap();
    assert!(!second.is_new);
    assert!(!second.is_renewed);
    assert_eq!(second.record.id, first.record.id);
    assert_eq!(second.url, first.url);
    assert_eq!(h.storage_repo.sign_call_count(), signs_before);
    assert_eq!(h.media_repo.url_write_count(), writes_before);

    // After forcing expiry the third request renews exactly once
    h.media_repo.force_expire(first.record.id);
    let third = h
        .service
        .get_or_create_audio("Hello, world!".to_string(), Some(TtsEngine::Cloud), Some(3600))
        .await
        .unwrap();
    assert!(!third.is_new);
    assert!(third.is_renewed);
    assert_eq!(third.record.id, first.record.id);
    assert!(third.expires_at > Utc::now());
    assert_ne!(third.url, first.url);
    assert_eq!(h.media_repo.url_write_count(), writes_before + 1);
}

#[tokio::test]
async fn ensure_fresh_twice_performs_zero_writes_on_second_call() {
    let h = harness();
    let lifecycle = UrlLifecycle::new(h.media_repo.clone(), h.storage_repo.clone());

    let mut record = success_record("fresh twice", Some("k-fresh"));
    record.expires_at = Some(Utc::now() - ChronoDuration::hours(1));
    h.media_repo.insert(record.clone());

    // Expired: first call regenerates and writes once
    let first = lifecycle
        .ensure_fresh(&record, 3600, DETAIL_RENEWAL_THRESHOLD)
        .await
        .unwrap();
    assert!(first.was_renewed);
    assert_eq!(h.media_repo.url_write_count(), 1);

    // The expiry lands at now + requested_ttl, give or take clock skew
    let expected = Utc::now() + ChronoDuration::seconds(3600);
    let skew = (first.expires_at - expected).num_seconds().abs();
    assert!(skew <= 2, "expires_at off by {}s", skew);

    // Second call sees the renewed record and does not write
    let renewed = h.media_repo.get(record.id).unwrap();
    let second = lifecycle
        .ensure_fresh(&renewed, 3600, DETAIL_RENEWAL_THRESHOLD)
        .await
        .unwrap();
    assert!(!second.was_renewed);
    assert_eq!(second.url, first.url);
    assert_eq!(second.expires_at, first.expires_at);
    assert_eq!(h.media_repo.url_write_count(), 1);
}

#[tokio::test]
async fn renewal_without_storage_key_is_invalid_state() {
    let h = harness();
    let lifecycle = UrlLifecycle::new(h.media_repo.clone(), h.storage_repo.clone());

    let mut record = success_record("keyless", None);
    record.signed_url = None;
    record.expires_at = None;
    h.media_repo.insert(record.clone());

    let err = lifecycle.renew(&record, 3600).await.unwrap_err();
    assert!(matches!(err, MediaServiceError::InvalidState(_)));

    // Record untouched, no sign call happened
    let stored = h.media_repo.get(record.id).unwrap();
    assert_eq!(stored.signed_url, None);
    assert_eq!(stored.expires_at, None);
    assert_eq!(h.storage_repo.sign_call_count(), 0);
    assert_eq!(h.media_repo.url_write_count(), 0);
}

#[tokio::test]
async fn lookup_returns_most_recent_successful_record() {
    let h = harness();

    let mut older = success_record("duplicate subject", Some("k-old"));
    older.created_at = Utc::now() - ChronoDuration::hours(2);
    let mut newer = success_record("duplicate subject", Some("k-new"));
    newer.created_at = Utc::now() - ChronoDuration::minutes(5);
    let mut failed = success_record("duplicate subject", Some("k-failed"));
    failed.status = RecordStatus::Failed;
    failed.created_at = Utc::now();

    h.media_repo.insert(older);
    h.media_repo.insert(newer.clone());
    h.media_repo.insert(failed);

    let outcome = h
        .service
        .get_or_create_audio("duplicate subject".to_string(), None, Some(3600))
        .await
        .unwrap();
    assert!(!outcome.is_new);
    assert_eq!(outcome.record.id, newer.id);
}

#[tokio::test]
async fn non_positive_ttl_is_rejected() {
    let h = harness();

    let err = h
        .service
        .get_or_create_audio("some text".to_string(), None, Some(0))
        .await
        .unwrap_err();
    assert!(matches!(err, MediaServiceError::Invalid(_)));

    let err = h
        .service
        .get_or_create_audio("some text".to_string(), None, Some(-60))
        .await
        .unwrap_err();
    assert!(matches!(err, MediaServiceError::Invalid(_)));
}

#[tokio::test]
async fn empty_text_is_rejected() {
    let h = harness();

    let err = h
        .service
        .get_or_create_audio("   ".to_string(), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, MediaServiceError::Invalid(_)));
}

#[tokio::test]
async fn unknown_video_title_is_not_found() {
    let h = harness();

    let err = h
        .service
        .get_video_url("no such title".to_string(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, MediaServiceError::NotFound));
}

#[tokio::test]
async fn video_upload_attaches_subtitle_and_serves_vtt() {
    let h = harness();

    let srt = "1\n00:00:01,000 --> 00:00:04,000\nHello subtitles\n";
    let outcome = h
        .service
        .upload_video_file(
            "talk.mp4".to_string(),
            vec![0u8; 1024],
            Some("Conference Talk".to_string()),
            Some(("talk.srt".to_string(), srt.as_bytes().to_vec())),
            Some(3600),
        )
        .await
        .unwrap();

    assert_eq!(outcome.record.subject, "Conference Talk");
    assert_eq!(outcome.record.status, RecordStatus::Success);
    assert_eq!(outcome.record.file_size, Some(1024));
    assert!(outcome.record.subtitle_url.is_some());
    assert_eq!(outcome.record.subtitle_name.as_deref(), Some("talk.srt"));

    // The subtitle proxy converts the stored SRT to WebVTT
    let vtt = h.service.video_subtitle(outcome.record.id).await.unwrap();
    assert!(vtt.starts_with("WEBVTT"));
    assert!(vtt.contains("00:00:01.000 --> 00:00:04.000"));
    assert!(vtt.contains("Hello subtitles"));
}

#[tokio::test]
async fn delete_removes_objects_and_row() {
    let h = harness();

    let outcome = h
        .service
        .upload_video_file(
            "clip.mp4".to_string(),
            vec![1u8; 64],
            None,
            Some(("clip.srt".to_string(), b"1\n00:00:00,000 --> 00:00:01,000\nx\n".to_vec())),
            None,
        )
        .await
        .unwrap();

    let object_key = outcome.record.storage_key.clone().unwrap();
    let subtitle_key = outcome.record.subtitle_key.clone().unwrap();
    assert!(h.storage_repo.contains(&object_key));
    assert!(h.storage_repo.contains(&subtitle_key));

    h.service
        .delete_record(MediaKind::Video, outcome.record.id)
        .await
        .unwrap();

    assert!(!h.storage_repo.contains(&object_key));
    assert!(!h.storage_repo.contains(&subtitle_key));
    assert!(h.media_repo.get(outcome.record.id).is_none());

    // Deleting again is a NotFound
    let err = h
        .service
        .delete_record(MediaKind::Video, outcome.record.id)
        .await
        .unwrap_err();
    assert!(matches!(err, MediaServiceError::NotFound));
}

#[tokio::test]
async fn list_refreshes_only_expired_rows() {
    let h = harness();

    let fresh = success_record("fresh row", Some("k-fresh-row"));
    let mut expired = success_record("expired row", Some("k-expired-row"));
    expired.expires_at = Some(Utc::now() - ChronoDuration::minutes(1));
    h.media_repo.insert(fresh.clone());
    h.media_repo.insert(expired.clone());

    let records = h
        .service
        .list_records(MediaKind::Audio, Some(10), None)
        .await
        .unwrap();
    assert_eq!(records.len(), 2);

    // Exactly one row (the expired one) was re-signed
    assert_eq!(h.media_repo.url_write_count(), 1);

    let refreshed = h.media_repo.get(expired.id).unwrap();
    assert!(refreshed.expires_at.unwrap() > Utc::now());
    let untouched = h.media_repo.get(fresh.id).unwrap();
    assert_eq!(untouched.signed_url, fresh.signed_url);
}
