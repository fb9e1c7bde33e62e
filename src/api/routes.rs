//! API route configuration.

use crate::api::handlers::{health_handler, redirect_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All public routes. None require authentication; creation is bounded by
/// the per-client quota.
///
/// # Endpoints
///
/// - `POST /api/v1`  - Create a short link
/// - `GET  /health`  - Store health
/// - `GET  /{code}`  - Redirect to the target URL
///
/// Static segments win over `/{code}`, so `health` can never be a link and is
/// refused as a code. `api` is refused as well, though `GET /api` itself still
/// reaches the resolver and answers 404.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1", post(shorten_handler))
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
}
