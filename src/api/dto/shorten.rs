//! DTOs for the link creation endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// Target URL; a missing scheme becomes `http://`. Absent means empty,
    /// which fails URL validation.
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub url: String,

    /// Optional custom code; empty means "generate one".
    #[serde(default)]
    #[validate(length(max = 64))]
    pub short: Option<String>,

    /// Optional lifetime in hours; `0` means the default.
    #[serde(default)]
    pub expiry: Option<u64>,
}

/// Created link plus the client's quota after this request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub url: String,
    /// `<domain>/<code>`
    pub short: String,
    /// Lifetime in hours.
    pub expiry: u64,
    /// Creations left in the current window.
    pub rate_limit: i64,
    /// Whole minutes until the window resets.
    pub rate_limit_reset: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::code_generator::MAX_CUSTOM_CODE_LENGTH;

    #[test]
    fn test_optional_fields_default_to_none() {
        let request: ShortenRequest =
            serde_json::from_str(r#"{"url":"https://example.com"}"#).unwrap();

        assert_eq!(request.url, "https://example.com");
        assert!(request.short.is_none());
        assert!(request.expiry.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_missing_url_parses_as_empty() {
        let request: ShortenRequest = serde_json::from_str(r#"{"short":"abc"}"#).unwrap();

        assert_eq!(request.url, "");
        assert_eq!(request.short.as_deref(), Some("abc"));
    }

    #[test]
    fn test_negative_expiry_does_not_parse() {
        let result =
            serde_json::from_str::<ShortenRequest>(r#"{"url":"https://example.com","expiry":-1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_overlong_short_fails_validation() {
        let request = ShortenRequest {
            url: "https://example.com".to_string(),
            short: Some("a".repeat(MAX_CUSTOM_CODE_LENGTH + 1)),
            expiry: None,
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("short"));
    }
}
