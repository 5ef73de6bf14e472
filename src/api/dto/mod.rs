//! Data Transfer Objects for API requests and responses.
//!
//! JSON field names are camelCase; request bodies are checked with `validator`.

pub mod health;
pub mod resolve;
pub mod shorten;
pub mod stats;
