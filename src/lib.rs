//! # TTL Shortener
//!
//! A URL shortening service built with Axum on a key-value store with
//! time-to-live semantics. Links and per-client quotas expire by TTL; nothing
//! is ever deleted explicitly.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Entities and the key-value store trait
//! - **Application Layer** ([`application`]) - Code allocation, rate limiting, resolution
//! - **Infrastructure Layer** ([`infrastructure`]) - Redis and in-memory stores
//! - **API Layer** ([`api`]) - REST handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Random 6-character or caller-chosen short codes, collision-safe via `SET NX`
//! - Per-client creation quota over a rolling window, enforced atomically
//! - Refusal of targets pointing back at the service's own domain
//! - Global redirect counter
//!
//! ## Quick Start
//!
//! ```bash
//! export DOMAIN="short.ly"
//! export REDIS_URL="redis://localhost:6379"  # Optional, in-memory otherwise
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LinkService, NewShortLink, RateLimiter, RedirectService};
    pub use crate::config::ShortenerSettings;
    pub use crate::domain::entities::{QuotaOutcome, ShortLink};
    pub use crate::domain::repositories::KeyValueStore;
    pub use crate::error::AppError;
    pub use crate::infrastructure::store::MemoryStore;
    pub use crate::state::AppState;
}
