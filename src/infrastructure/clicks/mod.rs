//! Pending click counters kept in the fast store between flushes.
//!
//! - [`RedisClickCounter`] - `clicks:{code}` integers in Redis
//! - [`MemoryClickCounter`] - In-process fallback and test double

mod memory_counter;
mod redis_counter;
mod service;

pub use memory_counter::MemoryClickCounter;
pub use redis_counter::{RedisClickCounter, clicks_key};
pub use service::ClickCounter;

#[cfg(test)]
pub use service::MockClickCounter;
