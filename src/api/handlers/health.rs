//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Both store partitions answer PING
/// - **503 Service Unavailable**: One or more partitions degraded
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "links_store": { "status": "ok" },
///     "quota_store": { "status": "ok" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let (links_up, quota_up) = tokio::join!(
        state.link_service.health_check(),
        state.rate_limiter.health_check()
    );

    let checks = HealthChecks {
        links_store: CheckStatus::from_ping(links_up, "links store"),
        quota_store: CheckStatus::from_ping(quota_up, "quota store"),
    };

    let all_healthy = checks.links_store.is_ok() && checks.quota_store.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
