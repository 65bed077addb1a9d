use super::error::MediaServiceError;
use super::model::MediaRecord;
use crate::infrastructure::repositories::{MediaRepository, StorageRepository};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;

/// List endpoints never renew a URL before it actually expired
pub const LIST_RENEWAL_THRESHOLD: Duration = Duration::ZERO;

/// Detail/get endpoints renew a URL that has less than this left, so the
/// caller never receives one about to lapse mid-use
pub const DETAIL_RENEWAL_THRESHOLD: Duration = Duration::from_secs(5 * 60);

/// Result of an `ensure_fresh`/`renew` call
#[derive(Debug, Clone)]
pub struct FreshUrl {
    pub url: String,
    pub expires_at: DateTime<Utc>,
    pub was_renewed: bool,
}

/// Whether a signed URL expiring at `expires_at` must be regenerated:
/// it never existed, it already expired, or it expires within `threshold`.
pub fn needs_renewal(
    expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    threshold: Duration,
) -> bool {
    match expires_at {
        None => true,
        Some(expires_at) => {
            now >= expires_at || (expires_at - now).num_seconds() < threshold.as_secs() as i64
        }
    }
}

/// Decides, per record, whether its signed URL is still usable or must be
/// re-minted, and persists the new URL/expiry pair when it is.
///
/// A regeneration is the only path that writes; the fresh-URL path returns
/// the stored fields untouched.
pub struct UrlLifecycle {
    media_repo: Arc<dyn MediaRepository>,
    storage_repo: Arc<dyn StorageRepository>,
}

impl UrlLifecycle {
    pub fn new(
        media_repo: Arc<dyn MediaRepository>,
        storage_repo: Arc<dyn StorageRepository>,
    ) -> Self {
        Self {
            media_repo,
            storage_repo,
        }
    }

    /// Guarantee the caller a signed URL valid for at least
    /// `renewal_threshold`, minting a new one only when necessary.
    pub async fn ensure_fresh(
        &self,
        record: &MediaRecord,
        requested_ttl: i64,
        renewal_threshold: Duration,
    ) -> Result<FreshUrl, MediaServiceError> {
        validate_ttl(requested_ttl)?;

        if let (Some(url), Some(expires_at)) = (&record.signed_url, record.expires_at) {
            if !needs_renewal(Some(expires_at), Utc::now(), renewal_threshold) {
                return Ok(FreshUrl {
                    url: url.clone(),
                    expires_at,
                    was_renewed: false,
                });
            }
        }

        self.regenerate(record, requested_ttl).await
    }

    /// Unconditional regeneration (explicit renew endpoints)
    pub async fn renew(
        &self,
        record: &MediaRecord,
        requested_ttl: i64,
    ) -> Result<FreshUrl, MediaServiceError> {
        validate_ttl(requested_ttl)?;
        self.regenerate(record, requested_ttl).await
    }

    async fn regenerate(
        &self,
        record: &MediaRecord,
        requested_ttl: i64,
    ) -> Result<FreshUrl, MediaServiceError> {
        let storage_key = record.storage_key.as_deref().ok_or_else(|| {
            MediaServiceError::InvalidState(format!(
                "record {} has no storage key; its upload never completed",
                record.id
            ))
        })?;

        let url = self
            .storage_repo
            .presigned_get_url(storage_key, Duration::from_secs(requested_ttl as u64))
            .await
            .map_err(|e| MediaServiceError::Upstream(e.to_string()))?;
        let expires_at = Utc::now() + ChronoDuration::seconds(requested_ttl);

        self.media_repo
            .update_signed_url(record.kind, record.id, &url, expires_at)
            .await
            .map_err(|e| MediaServiceError::Dependency(e.to_string()))?;

        tracing::info!(
            record_id = %record.id,
            kind = %record.kind,
            storage_key = %storage_key,
            ttl_secs = requested_ttl,
            "Signed URL regenerated"
        );

        Ok(FreshUrl {
            url,
            expires_at,
            was_renewed: true,
        })
    }
}

fn validate_ttl(requested_ttl: i64) -> Result<(), MediaServiceError> {
    if requested_ttl <= 0 {
        return Err(MediaServiceError::Invalid(
            "expire_time must be a positive number of seconds".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_renewal_when_never_signed() {
        assert!(needs_renewal(None, Utc::now(), LIST_RENEWAL_THRESHOLD));
    }

    #[test]
    fn test_needs_renewal_when_expired() {
        let now = Utc::now();
        assert!(needs_renewal(
            Some(now - ChronoDuration::seconds(1)),
            now,
            LIST_RENEWAL_THRESHOLD
        ));
    }

    #[test]
    fn test_needs_renewal_at_exact_expiry() {
        let now = Utc::now();
        assert!(needs_renewal(Some(now), now, LIST_RENEWAL_THRESHOLD));
    }

    #[test]
    fn test_no_renewal_when_fresh_with_zero_threshold() {
        let now = Utc::now();
        assert!(!needs_renewal(
            Some(now + ChronoDuration::seconds(30)),
            now,
            LIST_RENEWAL_THRESHOLD
        ));
    }

    #[test]
    fn test_renewal_inside_detail_threshold() {
        let now = Utc::now();
        // 2 minutes left, threshold 5 minutes
        assert!(needs_renewal(
            Some(now + ChronoDuration::minutes(2)),
            now,
            DETAIL_RENEWAL_THRESHOLD
        ));
    }

    #[test]
    fn test_no_renewal_outside_detail_threshold() {
        let now = Utc::now();
        assert!(!needs_renewal(
            Some(now + ChronoDuration::minutes(10)),
            now,
            DETAIL_RENEWAL_THRESHOLD
        ));
    }

    #[test]
    fn test_validate_ttl_rejects_zero_and_negative() {
        assert!(validate_ttl(0).is_err());
        assert!(validate_ttl(-5).is_err());
        assert!(validate_ttl(1).is_ok());
    }
}
