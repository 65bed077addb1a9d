use crate::domain::media::{MediaKind, MediaRecord, RecordStatus, TtsEngine, VideoAssets};
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Repository for media bookkeeping rows.
///
/// Audio and video rows live in separate tables; every operation takes the
/// `MediaKind` that selects the table. `signed_url` and `expires_at` can
/// only be written together — there is deliberately no method updating one
/// without the other.
#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Insert a new row in `pending` state and return it
    async fn create_pending(
        &self,
        kind: MediaKind,
        subject: &str,
        tts_engine: Option<TtsEngine>,
    ) -> AppResult<MediaRecord>;

    async fn find_by_id(&self, kind: MediaKind, id: Uuid) -> AppResult<Option<MediaRecord>>;

    /// Dedup lookup: the most-recently-created successful row for this
    /// subject, ignoring pending and failed rows
    async fn find_latest_success_by_subject(
        &self,
        kind: MediaKind,
        subject: &str,
    ) -> AppResult<Option<MediaRecord>>;

    /// Newest-first listing with optional subject substring search
    async fn list(
        &self,
        kind: MediaKind,
        limit: i64,
        search: Option<&str>,
    ) -> AppResult<Vec<MediaRecord>>;

    /// Terminal transition pending -> success, recording the storage key
    /// and the first signed URL in one write
    async fn mark_success(
        &self,
        kind: MediaKind,
        id: Uuid,
        storage_key: &str,
        signed_url: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Terminal transition pending -> failed
    async fn mark_failed(&self, kind: MediaKind, id: Uuid, error_message: &str) -> AppResult<()>;

    /// Overwrite the signed URL and its expiry together (renewal write)
    async fn update_signed_url(
        &self,
        kind: MediaKind,
        id: Uuid,
        signed_url: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Attach optional video artifacts (thumbnail, subtitle, file size)
    async fn set_video_assets(&self, id: Uuid, assets: &VideoAssets) -> AppResult<()>;

    async fn delete(&self, kind: MediaKind, id: Uuid) -> AppResult<bool>;
}

/// PostgreSQL implementation
pub struct PgMediaRepository {
    pool: Arc<DbPool>,
}

impl PgMediaRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// SELECT clause mapping either table onto the unified MediaRecord
    /// column set. The audio table has no video asset columns and vice
    /// versa, so the missing ones are selected as typed NULLs.
    fn base_select(kind: MediaKind) -> &'static str {
        match kind {
            MediaKind::Audio => {
                r#"
                SELECT id, 'audio'::text AS kind, text AS subject, tts_type AS tts_engine,
                       storage_key, signed_url, expires_at,
                       NULL::text AS thumbnail_key, NULL::text AS thumbnail_url,
                       NULL::text AS subtitle_key, NULL::text AS subtitle_url,
                       NULL::text AS subtitle_name, NULL::bigint AS file_size,
                       status, error_message, created_at
                FROM audio_records
                "#
            }
            MediaKind::Video => {
                r#"
                SELECT id, 'video'::text AS kind, title AS subject, NULL::text AS tts_engine,
                       storage_key, signed_url, expires_at,
                       thumbnail_key, thumbnail_url,
                       subtitle_key, subtitle_url,
                       subtitle_name, file_size,
                       status, error_message, created_at
                FROM video_records
                "#
            }
        }
    }
}

#[async_trait]
impl MediaRepository for PgMediaRepository {
    async fn create_pending(
        &self,
        kind: MediaKind,
        subject: &str,
        tts_engine: Option<TtsEngine>,
    ) -> AppResult<MediaRecord> {
        let pool = self.pool.as_ref();
        let id = Uuid::new_v4();
        let now = Utc::now();

        match kind {
            MediaKind::Audio => {
                sqlx::query(
                    r#"
                    INSERT INTO audio_records (id, text, tts_type, status, created_at)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(id)
                .bind(subject)
                .bind(tts_engine)
                .bind(RecordStatus::Pending)
                .bind(now)
                .execute(pool)
                .await?;
            }
            MediaKind::Video => {
                sqlx::query(
                    r#"
                    INSERT INTO video_records (id, title, status, created_at)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(id)
                .bind(subject)
                .bind(RecordStatus::Pending)
                .bind(now)
                .execute(pool)
                .await?;
            }
        }

        Ok(MediaRecord {
            id,
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
            created_at: now,
        })
    }

    async fn find_by_id(&self, kind: MediaKind, id: Uuid) -> AppResult<Option<MediaRecord>> {
        let pool = self.pool.as_ref();
        let sql = format!("{} WHERE id = $1", Self::base_select(kind));

        let record = sqlx::query_as::<_, MediaRecord>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    async fn find_latest_success_by_subject(
        &self,
        kind: MediaKind,
        subject: &str,
    ) -> AppResult<Option<MediaRecord>> {
        let pool = self.pool.as_ref();
        let sql = format!(
            "{} WHERE {} = $1 AND status = $2 ORDER BY created_at DESC LIMIT 1",
            Self::base_select(kind),
            kind.subject_column(),
        );

        let record = sqlx::query_as::<_, MediaRecord>(&sql)
            .bind(subject)
            .bind(RecordStatus::Success)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    async fn list(
        &self,
        kind: MediaKind,
        limit: i64,
        search: Option<&str>,
    ) -> AppResult<Vec<MediaRecord>> {
        let pool = self.pool.as_ref();

        let records = match search {
            Some(keyword) => {
                let sql = format!(
                    "{} WHERE {} ILIKE $1 ORDER BY created_at DESC LIMIT $2",
                    Self::base_select(kind),
                    kind.subject_column(),
                );
                sqlx::query_as::<_, MediaRecord>(&sql)
                    .bind(format!("%{}%", keyword))
                    .bind(limit)
                    .fetch_all(pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "{} ORDER BY created_at DESC LIMIT $1",
                    Self::base_select(kind),
                );
                sqlx::query_as::<_, MediaRecord>(&sql)
                    .bind(limit)
                    .fetch_all(pool)
                    .await?
            }
        };

        Ok(records)
    }

    async fn mark_success(
        &self,
        kind: MediaKind,
        id: Uuid,
        storage_key: &str,
        signed_url: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let pool = self.pool.as_ref();
        let sql = format!(
            r#"
            UPDATE {}
            SET status = $1, storage_key = $2, signed_url = $3, expires_at = $4, error_message = NULL
            WHERE id = $5
            "#,
            kind.table(),
        );

        sqlx::query(&sql)
            .bind(RecordStatus::Success)
            .bind(storage_key)
            .bind(signed_url)
            .bind(expires_at)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    async fn mark_failed(&self, kind: MediaKind, id: Uuid, error_message: &str) -> AppResult<()> {
        let pool = self.pool.as_ref();
        let sql = format!(
            r#"
            UPDATE {}
            SET status = $1, error_message = $2
            WHERE id = $3
            "#,
            kind.table(),
        );

        sqlx::query(&sql)
            .bind(RecordStatus::Failed)
            .bind(error_message)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    async fn update_signed_url(
        &self,
        kind: MediaKind,
        id: Uuid,
        signed_url: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let pool = self.pool.as_ref();
        let sql = format!(
            r#"
            UPDATE {}
            SET signed_url = $1, expires_at = $2
            WHERE id = $3
            "#,
            kind.table(),
        );

        sqlx::query(&sql)
            .bind(signed_url)
            .bind(expires_at)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    async fn set_video_assets(&self, id: Uuid, assets: &VideoAssets) -> AppResult<()> {
        let pool = self.pool.as_ref();

        sqlx::query(
            r#"
            UPDATE video_records
            SET thumbnail_key = $1, thumbnail_url = $2,
                subtitle_key = $3, subtitle_url = $4, subtitle_name = $5,
                file_size = $6
            WHERE id = $7
            "#,
        )
        .bind(&assets.thumbnail_key)
        .bind(&assets.thumbnail_url)
        .bind(&assets.subtitle_key)
        .bind(&assets.subtitle_url)
        .bind(&assets.subtitle_name)
        .bind(assets.file_size)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, kind: MediaKind, id: Uuid) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());

        let result = sqlx::query(&sql).bind(id).execute(pool).await?;

        Ok(result.rows_affected() > 0)
    }
}
