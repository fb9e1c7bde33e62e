//! Target URL validation.
//!
//! Accepts absolute `http`/`https` URLs as well as bare hosts such as
//! `example.com/page`, which get an `http://` scheme via
//! [`enforce_scheme`](crate::utils::domain_guard::enforce_scheme).

use crate::utils::domain_guard::enforce_scheme;
use url::{Host, Url};

/// Longest target URL accepted.
pub const MAX_URL_LENGTH: usize = 2048;

/// Shortest input [`enforce_scheme`] is ever called with.
const MIN_URL_LENGTH: usize = 4;

/// Reasons a target URL is refused.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL must be between 4 and 2048 characters")]
    Length,

    #[error("URL must not contain whitespace")]
    Whitespace,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL host must be an IP address, localhost, or a dotted domain name")]
    InvalidHost,
}

/// Checks that `input` denotes a reachable web address once a scheme is
/// enforced.
///
/// # Rules
///
/// 1. **Length**: 4 to 2048 bytes
/// 2. **Whitespace**: none anywhere
/// 3. **Protocol**: after [`enforce_scheme`], `http` or `https`
/// 4. **Host**: IP address, `localhost`, or a domain containing a dot
///
/// Because [`enforce_scheme`] only looks at the first four characters, an
/// input like `httpbin.org` keeps no scheme and fails rule 3.
///
/// # Errors
///
/// Returns the first [`UrlValidationError`] that applies.
pub fn validate_target_url(input: &str) -> Result<(), UrlValidationError> {
    if input.len() < MIN_URL_LENGTH || input.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::Length);
    }

    if input.chars().any(char::is_whitespace) {
        return Err(UrlValidationError::Whitespace);
    }

    let url = Url::parse(&enforce_scheme(input))
        .map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host() {
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => Ok(()),
        Some(Host::Domain(domain)) if is_plausible_domain(domain) => Ok(()),
        _ => Err(UrlValidationError::InvalidHost),
    }
}

fn is_plausible_domain(domain: &str) -> bool {
    if domain == "localhost" {
        return true;
    }

    let labels: Vec<&str> = domain.trim_end_matches('.').split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}
