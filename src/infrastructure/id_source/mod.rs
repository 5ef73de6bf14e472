//! Identifier source implementations.
//!
//! - [`HttpIdSource`] - Snowflake service over HTTP with a bounded timeout
//! - [`SequenceIdSource`] - In-process counter for tests and local tooling

mod http_id_source;
mod sequence_id_source;

pub use http_id_source::HttpIdSource;
pub use sequence_id_source::SequenceIdSource;
