//! Orchestrating services.

pub mod click_aggregator;
pub mod resolution_service;
pub mod shortening_service;

pub use click_aggregator::{ClickAggregator, FlushReport};
pub use resolution_service::ResolutionService;
pub use shortening_service::{ShortenOutcome, ShorteningService};
