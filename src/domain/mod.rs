//! Domain layer containing business entities and collaborator contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Durable store and identifier source traits
//! - [`encoder`] - Base62 encoding of identifiers into short codes
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Orchestration lives in [`crate::application::services`].

pub mod encoder;
pub mod entities;
pub mod repositories;
