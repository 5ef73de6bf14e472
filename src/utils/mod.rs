//! Helpers shared across layers.
//!
//! - [`url_validator`] - Long-URL checks applied before shortening
//! - [`timing`] - Duration metrics for orchestrator operations

pub mod timing;
pub mod url_validator;
