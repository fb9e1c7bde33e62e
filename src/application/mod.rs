//! Application layer services implementing business logic.
//!
//! Services consume the [`KeyValueStore`](crate::domain::repositories::KeyValueStore)
//! seam and provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Code allocation and link creation
//! - [`services::rate_limiter::RateLimiter`] - Per-client creation quota
//! - [`services::redirect_service::RedirectService`] - Code resolution and redirect counting

pub mod services;
