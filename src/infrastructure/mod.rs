//! Infrastructure layer for external integrations.
//!
//! Provides concrete implementations of the domain's
//! [`KeyValueStore`](crate::domain::repositories::KeyValueStore) contract.
//!
//! # Modules
//!
//! - [`store`] - Redis-backed and in-memory stores

pub mod store;
