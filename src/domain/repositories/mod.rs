//! Collaborator trait definitions for the domain layer.
//!
//! These traits abstract the durable store and the identifier service. They
//! are implemented by the infrastructure layer and passed into the services
//! as `Arc<dyn ...>`, so tests can substitute in-memory fakes or mocks.
//!
//! - [`MappingRepository`] - Durable URL mappings and click counters
//! - [`IdSource`] - Unique 64-bit identifier allocation
//!
//! Mock implementations are auto-generated via `mockall` for unit tests.

pub mod id_source;
pub mod mapping_repository;

pub use id_source::IdSource;
pub use mapping_repository::MappingRepository;

#[cfg(test)]
pub use id_source::MockIdSource;
#[cfg(test)]
pub use mapping_repository::MockMappingRepository;
