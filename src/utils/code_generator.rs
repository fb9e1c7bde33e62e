//! Short code generation and validation utilities.

use crate::error::AppError;
use base64::Engine as _;
use regex::Regex;
use std::sync::LazyLock;

/// Length of generated codes.
pub const CODE_LENGTH: usize = 6;

/// Longest custom code accepted.
pub const MAX_CUSTOM_CODE_LENGTH: usize = 64;

/// Random bytes drawn per code; encodes to 8 base64 characters, of which
/// the first [`CODE_LENGTH`] are kept.
const CODE_ENTROPY_BYTES: usize = 6;

/// Codes never stored as links. `health` is taken by the health route and
/// `api` is the API prefix.
const RESERVED_CODES: &[&str] = &["api", "health"];

static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("custom code pattern is valid"));

/// Generates a random 6-character short code.
///
/// Characters come from the URL-safe base64 alphabet. The code space is
/// 2^36, so collisions are rare but possible and callers must check the
/// store before using a code.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
pub fn generate_code() -> String {
    let mut buffer = [0u8; CODE_ENTROPY_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    let mut code = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer);
    code.truncate(CODE_LENGTH);
    code
}

/// Validates a caller-supplied custom code.
///
/// # Rules
///
/// - 1 to 64 characters
/// - Letters, digits, `-` and `_` only
/// - Not a reserved route name
///
/// # Errors
///
/// Returns [`AppError::InvalidShort`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.len() > MAX_CUSTOM_CODE_LENGTH || !CUSTOM_CODE_REGEX.is_match(code) {
        return Err(AppError::InvalidShort);
    }

    if is_reserved(code) {
        return Err(AppError::InvalidShort);
    }

    Ok(())
}

/// Whether `code` is a reserved route name.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}
