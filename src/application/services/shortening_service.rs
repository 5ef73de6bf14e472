//! Short code creation.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::RetryIf;
use tracing::{debug, info, warn};

use crate::domain::encoder::encode;
use crate::domain::repositories::{IdSource, MappingRepository};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::timing::timed;
use crate::utils::url_validator::validate_long_url;

/// Default number of lookups after losing a creation race.
pub const DEFAULT_RACE_MAX_RETRIES: u32 = 3;

/// Backoff unit between race-resolution lookups; the n-th wait is `n` units.
pub const DEFAULT_RACE_BACKOFF_STEP: Duration = Duration::from_millis(50);

/// Result of a shortening request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenOutcome {
    pub short_code: String,
    /// `true` if this call inserted the mapping.
    pub created: bool,
}

enum RaceLookupError {
    NotVisible,
    Store(AppError),
}

/// Creates short codes for long URLs.
///
/// The flow is check existing, fetch identifier, encode, insert. When the
/// insert loses against a concurrent request for the same URL, the winner's
/// code is looked up again with a bounded, linearly increasing backoff.
/// Uniqueness is enforced by the store, never by locks held here.
pub struct ShorteningService<R, I>
where
    R: MappingRepository + ?Sized,
    I: IdSource + ?Sized,
{
    repository: Arc<R>,
    id_source: Arc<I>,
    cache: Arc<dyn CacheService>,
    race_max_retries: u32,
    race_backoff_step: Duration,
}

impl<R, I> ShorteningService<R, I>
where
    R: MappingRepository + ?Sized,
    I: IdSource + ?Sized,
{
    /// Creates a new shortening service.
    ///
    /// `race_max_retries` is the total number of lookups made after a lost
    /// race; values below 1 are treated as 1.
    pub fn new(
        repository: Arc<R>,
        id_source: Arc<I>,
        cache: Arc<dyn CacheService>,
        race_max_retries: u32,
    ) -> Self {
        Self {
            repository,
            id_source,
            cache,
            race_max_retries: race_max_retries.max(1),
            race_backoff_step: DEFAULT_RACE_BACKOFF_STEP,
        }
    }

    /// Overrides the backoff unit used during race resolution.
    pub fn with_backoff_step(mut self, step: Duration) -> Self {
        self.race_backoff_step = step;
        self
    }

    /// Returns the short code for `long_url`, creating it if needed.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the URL is rejected. Nothing is called.
    /// - [`AppError::UpstreamUnavailable`] if no identifier could be obtained.
    ///   Nothing is written in that case.
    /// - [`AppError::RaceUnresolved`] if a concurrent creation won but its
    ///   mapping never became visible.
    /// - [`AppError::Store`] on database errors.
    pub async fn shorten(&self, long_url: &str) -> Result<ShortenOutcome, AppError> {
        let long_url = validate_long_url(long_url).map_err(|e| {
            AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        if let Some(short_code) = timed(
            "store.find_short_code_by_long_url",
            self.repository.find_short_code_by_long_url(&long_url),
        )
        .await?
        {
            debug!("Found existing short code {} for {}", short_code, long_url);
            return Ok(ShortenOutcome {
                short_code,
                created: false,
            });
        }

        let id = timed("id_source.next_id", self.id_source.next_id()).await?;
        let short_code = encode(id.id).map_err(|e| {
            warn!("Identifier service returned unusable id {}: {}", id.id, e);
            AppError::upstream_unavailable(
                "Identifier service returned an invalid id",
                json!({ "id": id.id }),
            )
        })?;

        let inserted = timed(
            "store.insert_if_absent",
            self.repository.insert_if_absent(&short_code, &long_url),
        )
        .await?;

        if inserted {
            if let Err(e) = self.cache.set_url(&short_code, &long_url).await {
                warn!("Failed to cache new mapping {}: {}", short_code, e);
            }
            info!("Created short code {} for {}", short_code, long_url);
            return Ok(ShortenOutcome {
                short_code,
                created: true,
            });
        }

        warn!("Concurrent creation detected for {}, resolving", long_url);
        let short_code = self.resolve_race(&long_url).await?;
        debug!("Race for {} resolved to {}", long_url, short_code);

        Ok(ShortenOutcome {
            short_code,
            created: false,
        })
    }

    async fn resolve_race(&self, long_url: &str) -> Result<String, AppError> {
        let step = self.race_backoff_step;
        let backoff = (1..self.race_max_retries).map(move |attempt| step * attempt);
        let repository = &self.repository;

        let lookup = move || async move {
            match repository.find_short_code_by_long_url(long_url).await {
                Ok(Some(code)) => Ok(code),
                Ok(None) => Err(RaceLookupError::NotVisible),
                Err(e) => Err(RaceLookupError::Store(e)),
            }
        };

        match RetryIf::spawn(backoff, lookup, |e: &RaceLookupError| {
            matches!(e, RaceLookupError::NotVisible)
        })
        .await
        {
            Ok(code) => Ok(code),
            Err(RaceLookupError::Store(e)) => Err(e),
            Err(RaceLookupError::NotVisible) => {
                warn!(
                    "Mapping for {} still not visible after {} lookups",
                    long_url, self.race_max_retries
                );
                Err(AppError::race_unresolved(
                    "Concurrent creation could not be resolved. Please retry.",
                    json!({ "attempts": self.race_max_retries }),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SnowflakeId;
    use crate::domain::repositories::{MockIdSource, MockMappingRepository};
    use crate::infrastructure::cache::MockCacheService;
    use mockall::predicate::eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const URL: &str = "https://example.com/some/long/path";

    fn snowflake(id: i64) -> SnowflakeId {
        SnowflakeId {
            id,
            node_id: 1,
            host: "snowflake-1".to_string(),
        }
    }

    fn service(
        repo: MockMappingRepository,
        ids: MockIdSource,
        cache: MockCacheService,
    ) -> ShorteningService<MockMappingRepository, MockIdSource> {
        ShorteningService::new(Arc::new(repo), Arc::new(ids), Arc::new(cache), 3)
    }

    #[tokio::test]
    async fn test_shorten_returns_existing_code() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_short_code_by_long_url()
            .with(eq(URL))
            .times(1)
            .returning(|_| Ok(Some("mGkAYBHPwp".to_string())));
        repo.expect_insert_if_absent().never();

        let mut ids = MockIdSource::new();
        ids.expect_next_id().never();

        let outcome = service(repo, ids, MockCacheService::new())
            .shorten(URL)
            .await
            .unwrap();

        assert_eq!(outcome.short_code, "mGkAYBHPwp");
        assert!(!outcome.created);
    }

    #[tokio::test]
    async fn test_shorten_creates_and_populates_cache() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_short_code_by_long_url()
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_insert_if_absent()
            .with(eq("mGkAYBHPwp"), eq(URL))
            .times(1)
            .returning(|_, _| Ok(true));

        let mut ids = MockIdSource::new();
        ids.expect_next_id()
            .times(1)
            .returning(|| Ok(snowflake(653436189499457547)));

        let mut cache = MockCacheService::new();
        cache
            .expect_set_url()
            .with(eq("mGkAYBHPwp"), eq(URL))
            .times(1)
            .returning(|_, _| Ok(()));

        let outcome = service(repo, ids, cache).shorten(URL).await.unwrap();

        assert_eq!(
            outcome,
            ShortenOutcome {
                short_code: "mGkAYBHPwp".to_string(),
                created: true
            }
        );
    }

    #[tokio::test]
    async fn test_shorten_trims_input() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_short_code_by_long_url()
            .with(eq(URL))
            .times(1)
            .returning(|_| Ok(Some("abc".to_string())));

        let outcome = service(repo, MockIdSource::new(), MockCacheService::new())
            .shorten(&format!("  {URL}\n"))
            .await
            .unwrap();

        assert_eq!(outcome.short_code, "abc");
    }

    #[tokio::test]
    async fn test_shorten_ignores_cache_failure_after_insert() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_short_code_by_long_url()
            .returning(|_| Ok(None));
        repo.expect_insert_if_absent().returning(|_, _| Ok(true));

        let mut ids = MockIdSource::new();
        ids.expect_next_id().returning(|| Ok(snowflake(62)));

        let mut cache = MockCacheService::new();
        cache.expect_set_url().returning(|_, _| {
            Err(crate::infrastructure::cache::CacheError::ConnectionError(
                "refused".to_string(),
            ))
        });

        let outcome = service(repo, ids, cache).shorten(URL).await.unwrap();
        assert_eq!(outcome.short_code, "10");
        assert!(outcome.created);
    }

    #[tokio::test]
    async fn test_shorten_rejects_invalid_url_without_calls() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_short_code_by_long_url().never();
        let mut ids = MockIdSource::new();
        ids.expect_next_id().never();

        let service = service(repo, ids, MockCacheService::new());

        for input in ["", "not a url", "ftp://example.com", "javascript:alert(1)"] {
            let err = service.shorten(input).await.unwrap_err();
            assert!(matches!(err, AppError::Validation { .. }), "{input}");
        }
    }

    #[tokio::test]
    async fn test_shorten_upstream_failure_writes_nothing() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_short_code_by_long_url()
            .returning(|_| Ok(None));
        repo.expect_insert_if_absent().never();

        let mut ids = MockIdSource::new();
        ids.expect_next_id().times(1).returning(|| {
            Err(AppError::upstream_unavailable(
                "Identifier service temporarily unavailable",
                json!({ "reason": "timeout" }),
            ))
        });

        let mut cache = MockCacheService::new();
        cache.expect_set_url().never();

        let err = service(repo, ids, cache).shorten(URL).await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_shorten_negative_id_is_upstream_failure() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_short_code_by_long_url()
            .returning(|_| Ok(None));
        repo.expect_insert_if_absent().never();

        let mut ids = MockIdSource::new();
        ids.expect_next_id().returning(|| Ok(snowflake(-5)));

        let err = service(repo, ids, MockCacheService::new())
            .shorten(URL)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UpstreamUnavailable { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shorten_resolves_lost_race() {
        let lookups = Arc::new(AtomicUsize::new(0));
        let seen = lookups.clone();

        let mut repo = MockMappingRepository::new();
        // First lookup is the dedupe check, then the winner shows up on the
        // second race-resolution lookup.
        repo.expect_find_short_code_by_long_url()
            .times(3)
            .returning(move |_| match seen.fetch_add(1, Ordering::SeqCst) {
                0 | 1 => Ok(None),
                _ => Ok(Some("winner".to_string())),
            });
        repo.expect_insert_if_absent()
            .times(1)
            .returning(|_, _| Ok(false));

        let mut ids = MockIdSource::new();
        ids.expect_next_id().returning(|| Ok(snowflake(1_000)));

        let mut cache = MockCacheService::new();
        cache.expect_set_url().never();

        let outcome = service(repo, ids, cache).shorten(URL).await.unwrap();

        assert_eq!(outcome.short_code, "winner");
        assert!(!outcome.created);
        assert_eq!(lookups.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shorten_race_unresolved_after_bounded_lookups() {
        let mut repo = MockMappingRepository::new();
        // One dedupe check plus three race-resolution lookups.
        repo.expect_find_short_code_by_long_url()
            .times(4)
            .returning(|_| Ok(None));
        repo.expect_insert_if_absent().returning(|_, _| Ok(false));

        let mut ids = MockIdSource::new();
        ids.expect_next_id().returning(|| Ok(snowflake(1_000)));

        let started = tokio::time::Instant::now();
        let err = service(repo, ids, MockCacheService::new())
            .shorten(URL)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::RaceUnresolved { .. }));
        assert_eq!(err.status_code(), axum::http::StatusCode::SERVICE_UNAVAILABLE);
        // 50 ms + 100 ms of backoff.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(150), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(200), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_shorten_race_store_error_stops_retrying() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();

        let mut repo = MockMappingRepository::new();
        repo.expect_find_short_code_by_long_url()
            .times(2)
            .returning(move |_| match seen.fetch_add(1, Ordering::SeqCst) {
                0 => Ok(None),
                _ => Err(AppError::store("Database error", json!({}))),
            });
        repo.expect_insert_if_absent().returning(|_, _| Ok(false));

        let mut ids = MockIdSource::new();
        ids.expect_next_id().returning(|| Ok(snowflake(1_000)));

        let err = service(repo, ids, MockCacheService::new())
            .shorten(URL)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Store { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
