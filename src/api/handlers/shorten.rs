//! Handler for link creation endpoint.

use axum::{
    Json,
    extract::{ConnectInfo, State, rejection::JsonRejection},
    http::HeaderMap,
};
use std::net::SocketAddr;
use tracing::debug;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::application::services::NewShortLink;
use crate::domain::entities::{QuotaOutcome, ShortLink};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_key;

/// Creates a short link, spending one unit of the caller's quota.
///
/// # Endpoint
///
/// `POST /api/v1`
///
/// # Request Flow
///
/// 1. Parse JSON body
/// 2. Reserve one unit of the client's quota (atomic)
/// 3. Validate the request and allocate a code
/// 4. Refund the unit if step 3 failed
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/page",
///   "short": "promo",   // optional
///   "expiry": 48        // optional, hours
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "url": "https://example.com/page",
///   "short": "short.ly/promo",
///   "expiry": 48,
///   "rate_limit": 9,
///   "rate_limit_reset": 30
/// }
/// ```
///
/// # Errors
///
/// - 400 - malformed body, invalid URL or invalid custom code
/// - 403 - custom code already in use
/// - 503 - quota exhausted or self-referential target
/// - 500 - store failure
pub async fn shorten_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload.map_err(|e| {
        debug!("Rejected request body: {}", e);
        AppError::MalformedBody
    })?;

    let client = client_key(&headers, peer, state.behind_proxy);

    let (remaining, reset_minutes) = match state.rate_limiter.check_and_consume(&client).await? {
        QuotaOutcome::Allowed {
            remaining,
            reset_minutes,
        } => (remaining, reset_minutes),
        QuotaOutcome::Denied { reset_minutes } => {
            return Err(AppError::RateLimitExceeded { reset_minutes });
        }
    };

    let link = match create_link(&state, payload).await {
        Ok(link) => link,
        Err(e) => {
            state.rate_limiter.refund(&client).await;
            return Err(e);
        }
    };

    Ok(Json(ShortenResponse {
        short: state.link_service.short_url(&link),
        url: link.target_url,
        expiry: link.expiry_hours,
        rate_limit: remaining,
        rate_limit_reset: reset_minutes,
    }))
}

async fn create_link(state: &AppState, payload: ShortenRequest) -> Result<ShortLink, AppError> {
    payload.validate()?;

    state
        .link_service
        .create_short_link(NewShortLink {
            url: payload.url,
            custom_code: payload.short,
            expiry_hours: payload.expiry,
        })
        .await
}
