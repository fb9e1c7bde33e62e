//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::error;
use url::Url;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Answers `301 Moved Permanently`. Every successful redirect bumps the
/// global counter; a counter failure never blocks the redirect.
///
/// # Errors
///
/// - 404 - unknown or expired code
/// - 500 - links store failure
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let target = state.redirect_service.resolve(&code).await?;

    let location = location_header(&target).ok_or_else(|| {
        error!(code = %code, "Stored target is not a valid Location: {}", target);
        AppError::NotFound
    })?;

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response())
}

/// Builds a `Location` value, percent-encoding non-ASCII targets.
fn location_header(target: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(target).ok().or_else(|| {
        let url = Url::parse(target).ok()?;
        HeaderValue::from_str(url.as_str()).ok()
    })
}
