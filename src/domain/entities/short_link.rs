//! Short link entity representing a code to URL mapping.

use std::time::Duration;

const SECONDS_PER_HOUR: u64 = 3600;

/// A stored code to URL mapping.
///
/// Links are immutable once written and are only ever removed by the
/// store's TTL mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub code: String,
    /// Target URL, always carrying a scheme.
    pub target_url: String,
    pub expiry_hours: u64,
}

impl ShortLink {
    pub fn new(code: String, target_url: String, expiry_hours: u64) -> Self {
        Self {
            code,
            target_url,
            expiry_hours,
        }
    }

    /// Time-to-live applied when the mapping is written.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.expiry_hours.saturating_mul(SECONDS_PER_HOUR))
    }

    /// Public short form: `<domain>/<code>`.
    pub fn short_url(&self, domain: &str) -> String {
        format!("{}/{}", domain.trim_end_matches('/'), self.code)
    }
}
