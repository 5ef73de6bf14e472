//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for persistence, caching and identifier
//! allocation.
//!
//! # Modules
//!
//! - [`cache`] - Sliding-TTL URL cache (Redis and in-process)
//! - [`clicks`] - Pending click counters (Redis and in-process)
//! - [`id_source`] - Snowflake HTTP client and in-process sequence
//! - [`persistence`] - PostgreSQL and in-memory mapping repositories

pub mod cache;
pub mod clicks;
pub mod id_source;
pub mod persistence;
