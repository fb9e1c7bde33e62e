//! Per-client quota records.
//!
//! A quota record is a single integer counter stored under the client key
//! with a TTL equal to the rate-limit window. When the TTL runs out the record
//! disappears and the client starts over with a full quota.

use std::time::Duration;

/// Result of an atomic reserve-one-unit operation on a quota record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaDecision {
    /// Whether a unit of quota was taken.
    pub granted: bool,
    /// Value of the record after the operation.
    pub remaining: i64,
    /// Remaining lifetime of the record.
    pub reset_in: Duration,
}

/// Rate limiter verdict for one creation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaOutcome {
    Allowed { remaining: i64, reset_minutes: u64 },
    Denied { reset_minutes: u64 },
}

/// Read-only view of a live quota record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaSnapshot {
    pub remaining: i64,
    pub reset_minutes: u64,
}

impl From<QuotaDecision> for QuotaOutcome {
    fn from(decision: QuotaDecision) -> Self {
        let reset_minutes = whole_minutes(decision.reset_in);
        if decision.granted {
            QuotaOutcome::Allowed {
                remaining: decision.remaining,
                reset_minutes,
            }
        } else {
            QuotaOutcome::Denied { reset_minutes }
        }
    }
}

/// Converts a TTL to whole minutes, truncating.
///
/// A window with 59 seconds left reports `0`.
pub fn whole_minutes(ttl: Duration) -> u64 {
    ttl.as_secs() / 60
}
