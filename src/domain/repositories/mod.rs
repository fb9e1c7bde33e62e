//! Store trait definitions for the domain layer.
//!
//! The service persists nothing outside a key-value store with TTL support.
//! [`KeyValueStore`] is that contract; each logical partition (links, quotas)
//! is served by its own instance.
//!
//! # Implementations
//!
//! - `crate::infrastructure::store::RedisStore` - production, one Redis logical database per partition
//! - `crate::infrastructure::store::MemoryStore` - in-process store for tests and local runs
//! - Mock implementation auto-generated via `mockall` for unit tests

pub mod key_value_store;

pub use key_value_store::{KeyValueStore, StoreError, StoreResult};

#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
