//! Core domain entities.
//!
//! - [`UrlMapping`] - A durable short code → long URL record
//! - [`ClickStats`] - Durable plus pending click counters for one code
//! - [`SnowflakeId`] - Identifier handed out by the snowflake service

pub mod mapping;
pub mod snowflake_id;

pub use mapping::{ClickStats, UrlMapping};
pub use snowflake_id::SnowflakeId;
