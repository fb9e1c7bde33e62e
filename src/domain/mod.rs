//! Domain layer containing business entities and the store contract.
//!
//! # Architecture
//!
//! - [`entities`] - Short links and quota decisions
//! - [`repositories`] - The [`repositories::KeyValueStore`] trait, the only
//!   persistence seam of the service
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - All state lives in the key-value store; services hold none between requests
//! - Business logic is encapsulated in services (see [`crate::application::services`])

pub mod entities;
pub mod repositories;
