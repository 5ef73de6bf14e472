//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::{ClickAggregator, ResolutionService, ShorteningService};
use crate::domain::repositories::{IdSource, MappingRepository};
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::clicks::ClickCounter;

pub type DynMappingRepository = dyn MappingRepository;
pub type DynIdSource = dyn IdSource;

pub type AppShorteningService = ShorteningService<DynMappingRepository, DynIdSource>;
pub type AppResolutionService = ResolutionService<DynMappingRepository>;
pub type AppClickAggregator = ClickAggregator<DynMappingRepository>;

/// Services and backends shared by every request.
///
/// Collaborators are held as trait objects so the same wiring serves
/// PostgreSQL/Redis in production and in-memory fakes in tests.
#[derive(Clone)]
pub struct AppState {
    pub shortening_service: Arc<AppShorteningService>,
    pub resolution_service: Arc<AppResolutionService>,
    pub click_aggregator: Arc<AppClickAggregator>,
    pub repository: Arc<DynMappingRepository>,
    pub cache: Arc<dyn CacheService>,
    pub click_counter: Arc<dyn ClickCounter>,
}

impl AppState {
    /// Wires the services on top of the given backends.
    pub fn new(
        repository: Arc<DynMappingRepository>,
        id_source: Arc<DynIdSource>,
        cache: Arc<dyn CacheService>,
        click_counter: Arc<dyn ClickCounter>,
        race_max_retries: u32,
    ) -> Self {
        let click_aggregator = Arc::new(ClickAggregator::new(
            click_counter.clone(),
            repository.clone(),
        ));

        let shortening_service = Arc::new(ShorteningService::new(
            repository.clone(),
            id_source,
            cache.clone(),
            race_max_retries,
        ));

        let resolution_service = Arc::new(ResolutionService::new(
            repository.clone(),
            cache.clone(),
            click_aggregator.clone(),
        ));

        Self {
            shortening_service,
            resolution_service,
            click_aggregator,
            repository,
            cache,
            click_counter,
        }
    }
}
