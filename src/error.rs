//! Application error type and its HTTP representation.
//!
//! Every failure a client can observe is a variant of [`AppError`]. The
//! `Display` text of each variant is the exact `error` message written to the
//! response body, so handlers never format messages themselves.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use validator::ValidationErrors;

use crate::domain::repositories::StoreError;

/// Coarse classification of failures.
///
/// Only [`ErrorKind::Backend`] is treated as an operational incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or invalid input; fixable by the caller.
    Input,
    /// Request is well-formed but refused by policy.
    Policy,
    /// The requested code does not exist (or has expired).
    NotFound,
    /// The key-value store failed.
    Backend,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("cannot parse JSON")]
    MalformedBody,

    #[error("Invalid URL")]
    InvalidUrl,

    #[error("Invalid short")]
    InvalidShort,

    #[error("haha... nice try")]
    SelfReferential,

    #[error("Rate limit exceeded")]
    RateLimitExceeded { reset_minutes: u64 },

    #[error("URL short already in use")]
    ShortInUse,

    #[error("short not found on database")]
    NotFound,

    #[error("Unable to allocate a free short")]
    AllocationExhausted { attempts: usize },

    /// Store failure while creating a link.
    #[error("Unable to connect to server")]
    Unavailable(#[source] StoreError),

    /// Store failure while resolving a code.
    #[error("cannot connect to DB")]
    LookupUnavailable(#[source] StoreError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    rate_limit_reset: Option<u64>,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedBody | Self::InvalidUrl | Self::InvalidShort => ErrorKind::Input,
            Self::SelfReferential | Self::RateLimitExceeded { .. } | Self::ShortInUse => {
                ErrorKind::Policy
            }
            Self::NotFound => ErrorKind::NotFound,
            Self::AllocationExhausted { .. } | Self::Unavailable(_) | Self::LookupUnavailable(_) => {
                ErrorKind::Backend
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedBody | Self::InvalidUrl | Self::InvalidShort => StatusCode::BAD_REQUEST,
            Self::SelfReferential | Self::RateLimitExceeded { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::ShortInUse => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AllocationExhausted { .. } | Self::Unavailable(_) | Self::LookupUnavailable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Maps DTO validation failures onto the field that failed.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        if errors.field_errors().contains_key("short") {
            AppError::InvalidShort
        } else {
            AppError::InvalidUrl
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.kind() {
            ErrorKind::Backend => tracing::error!(error = ?self, "Request failed: {}", self),
            ErrorKind::Policy => tracing::warn!("Request refused: {}", self),
            ErrorKind::Input | ErrorKind::NotFound => tracing::debug!("Request rejected: {}", self),
        }

        let rate_limit_reset = match &self {
            AppError::RateLimitExceeded { reset_minutes } => Some(*reset_minutes),
            _ => None,
        };

        let body = ErrorBody {
            error: self.to_string(),
            rate_limit_reset,
        };

        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_messages() {
        assert_eq!(AppError::MalformedBody.to_string(), "cannot parse JSON");
        assert_eq!(AppError::InvalidUrl.to_string(), "Invalid URL");
        assert_eq!(AppError::SelfReferential.to_string(), "haha... nice try");
        assert_eq!(AppError::ShortInUse.to_string(), "URL short already in use");
        assert_eq!(AppError::NotFound.to_string(), "short not found on database");
        assert_eq!(
            AppError::RateLimitExceeded { reset_minutes: 3 }.to_string(),
            "Rate limit exceeded"
        );
        assert_eq!(
            AppError::Unavailable(StoreError::Connection("down".into())).to_string(),
            "Unable to connect to server"
        );
        assert_eq!(
            AppError::LookupUnavailable(StoreError::Connection("down".into())).to_string(),
            "cannot connect to DB"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::MalformedBody.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidUrl.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::SelfReferential.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::RateLimitExceeded { reset_minutes: 0 }.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(AppError::ShortInUse.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::AllocationExhausted { attempts: 5 }.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(AppError::InvalidShort.kind(), ErrorKind::Input);
        assert_eq!(AppError::ShortInUse.kind(), ErrorKind::Policy);
        assert_eq!(AppError::NotFound.kind(), ErrorKind::NotFound);
        assert_eq!(
            AppError::LookupUnavailable(StoreError::Command("boom".into())).kind(),
            ErrorKind::Backend
        );
    }
}
