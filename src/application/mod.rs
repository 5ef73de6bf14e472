//! Application layer: orchestration on top of the domain traits.
//!
//! Services receive their collaborators as trait objects and never lock
//! across requests; every cross-request invariant is delegated to the
//! durable store.
//!
//! - [`services::ShorteningService`] - Race-safe short code creation
//! - [`services::ResolutionService`] - Cache-aside resolution with click counting
//! - [`services::ClickAggregator`] - Pending click counters and their flush
//! - [`flush_job`] - Periodic flush task with start/stop lifecycle

pub mod flush_job;
pub mod services;
