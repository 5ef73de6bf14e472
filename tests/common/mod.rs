#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tinyurl::AppError;
use tinyurl::domain::entities::{SnowflakeId, UrlMapping};
use tinyurl::domain::repositories::{IdSource, MappingRepository};
use tinyurl::infrastructure::cache::MemoryCache;
use tinyurl::infrastructure::clicks::MemoryClickCounter;
use tinyurl::infrastructure::id_source::SequenceIdSource;
use tinyurl::infrastructure::persistence::InMemoryMappingRepository;
use tinyurl::routes;
use tinyurl::state::AppState;

/// First identifier handed out by [`test_app`]; encodes to [`FIRST_CODE`].
pub const FIRST_ID: i64 = 653436189499457547;
pub const FIRST_CODE: &str = "mGkAYBHPwp";

pub const CACHE_TTL: Duration = Duration::from_secs(24 * 3600);

/// Application wired with in-memory backends, keeping typed handles to them
/// for assertions.
pub struct TestApp {
    pub state: AppState,
    pub repository: Arc<InMemoryMappingRepository>,
    pub cache: Arc<MemoryCache>,
    pub clicks: Arc<MemoryClickCounter>,
}

impl TestApp {
    pub fn server(&self) -> TestServer {
        TestServer::new(routes::router(self.state.clone())).unwrap()
    }

    pub async fn durable_clicks(&self, short_code: &str) -> i64 {
        self.repository
            .find_by_short_code(short_code)
            .await
            .unwrap()
            .map(|m| m.click_count)
            .unwrap_or_default()
    }
}

pub fn test_app() -> TestApp {
    test_app_with_id_source(Arc::new(SequenceIdSource::starting_at(FIRST_ID)))
}

pub fn test_app_with_id_source(id_source: Arc<dyn IdSource>) -> TestApp {
    let repository = Arc::new(InMemoryMappingRepository::new());
    let cache = Arc::new(MemoryCache::new(CACHE_TTL));
    let clicks = Arc::new(MemoryClickCounter::new());

    let state = AppState::new(
        repository.clone(),
        id_source,
        cache.clone(),
        clicks.clone(),
        3,
    );

    TestApp {
        state,
        repository,
        cache,
        clicks,
    }
}

/// Builds state around an arbitrary repository with in-memory cache and counters.
pub fn state_with_repository(repository: Arc<dyn MappingRepository>) -> AppState {
    AppState::new(
        repository,
        Arc::new(SequenceIdSource::starting_at(FIRST_ID)),
        Arc::new(MemoryCache::new(CACHE_TTL)),
        Arc::new(MemoryClickCounter::new()),
        3,
    )
}

/// Identifier source that is always down.
pub struct UnavailableIdSource;

#[async_trait]
impl IdSource for UnavailableIdSource {
    async fn next_id(&self) -> Result<SnowflakeId, AppError> {
        Err(AppError::upstream_unavailable(
            "Identifier service temporarily unavailable. Please try again later.",
            json!({ "reason": "unreachable" }),
        ))
    }
}

/// Repository whose inserts always lose and whose winner never becomes visible.
pub struct NeverVisibleRepository;

#[async_trait]
impl MappingRepository for NeverVisibleRepository {
    async fn find_short_code_by_long_url(&self, _: &str) -> Result<Option<String>, AppError> {
        Ok(None)
    }

    async fn insert_if_absent(&self, _: &str, _: &str) -> Result<bool, AppError> {
        Ok(false)
    }

    async fn increment_and_fetch(&self, _: &str) -> Result<Option<String>, AppError> {
        Ok(None)
    }

    async fn apply_batched_increment(&self, _: &str, _: i64) -> Result<bool, AppError> {
        Ok(false)
    }

    async fn find_by_short_code(&self, _: &str) -> Result<Option<UrlMapping>, AppError> {
        Ok(None)
    }

    async fn health_check(&self) -> bool {
        false
    }
}
