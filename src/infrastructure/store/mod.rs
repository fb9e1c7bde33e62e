//! Key-value store implementations.
//!
//! - [`RedisStore`] - Production store, one Redis logical database per partition
//! - [`MemoryStore`] - In-process store with lazy TTL expiry, for tests and
//!   single-node development

mod memory_store;
mod redis_store;

pub use memory_store::MemoryStore;
pub use redis_store::{RedisStore, partition_url};
