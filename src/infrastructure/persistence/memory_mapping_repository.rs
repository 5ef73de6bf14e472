//! In-process mapping repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::UrlMapping;
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;

/// DashMap-backed [`MappingRepository`] with the same atomicity contracts as
/// the PostgreSQL table.
///
/// `by_long_url` plays the role of the unique long URL index: an insert holds
/// its entry while claiming the short code, so two inserts for the same URL
/// cannot both succeed.
#[derive(Debug, Default)]
pub struct InMemoryMappingRepository {
    by_code: DashMap<String, UrlMapping>,
    by_long_url: DashMap<String, String>,
}

impl InMemoryMappingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    /// Number of stored mappings pointing at `long_url`.
    pub fn rows_for_long_url(&self, long_url: &str) -> usize {
        self.by_code
            .iter()
            .filter(|entry| entry.value().long_url == long_url)
            .count()
    }
}

#[async_trait]
impl MappingRepository for InMemoryMappingRepository {
    async fn find_short_code_by_long_url(
        &self,
        long_url: &str,
    ) -> Result<Option<String>, AppError> {
        Ok(self.by_long_url.get(long_url).map(|code| code.clone()))
    }

    async fn insert_if_absent(&self, short_code: &str, long_url: &str) -> Result<bool, AppError> {
        let Entry::Vacant(url_slot) = self.by_long_url.entry(long_url.to_string()) else {
            return Ok(false);
        };

        match self.by_code.entry(short_code.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(code_slot) => {
                code_slot.insert(UrlMapping::new(
                    short_code.to_string(),
                    long_url.to_string(),
                    Utc::now(),
                    0,
                ));
                url_slot.insert(short_code.to_string());
                Ok(true)
            }
        }
    }

    async fn increment_and_fetch(&self, short_code: &str) -> Result<Option<String>, AppError> {
        Ok(self.by_code.get_mut(short_code).map(|mut mapping| {
            mapping.click_count += 1;
            mapping.long_url.clone()
        }))
    }

    async fn apply_batched_increment(
        &self,
        short_code: &str,
        delta: i64,
    ) -> Result<bool, AppError> {
        Ok(self
            .by_code
            .get_mut(short_code)
            .map(|mut mapping| mapping.click_count += delta)
            .is_some())
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<UrlMapping>, AppError> {
        Ok(self.by_code.get(short_code).map(|mapping| mapping.clone()))
    }

    async fn health_check(&self) -> bool {
        true
    }
}
