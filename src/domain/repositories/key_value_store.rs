//! Key-value store contract.

use crate::domain::entities::QuotaDecision;
use async_trait::async_trait;
use std::time::Duration;

/// Errors raised by a store implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store connection error: {0}")]
    Connection(String),

    #[error("store command error: {0}")]
    Command(String),

    #[error("unexpected value {value:?} stored at {key}")]
    InvalidValue { key: String, value: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A partition of a networked key-value store with per-key TTLs.
///
/// Single-key operations must be atomic. Implementations acquire a connection
/// per call and release it on every exit path.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a live value.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes `value` with `ttl` only if `key` holds no live value.
    ///
    /// Returns `true` when the value was written.
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<bool>;

    /// Increments an integer value, creating it at `1` without a TTL.
    async fn incr(&self, key: &str) -> StoreResult<i64>;

    /// Remaining lifetime of a key.
    ///
    /// `None` when the key is absent or has no expiry.
    async fn ttl(&self, key: &str) -> StoreResult<Option<Duration>>;

    /// Atomically reserves one unit from the quota record at `key`.
    ///
    /// - absent record: created at `quota - 1` with TTL `window`, granted
    /// - value `<= 0`: denied, record untouched
    /// - otherwise: decremented, granted
    ///
    /// A record that somehow lost its TTL gets `window` again.
    async fn consume_quota(
        &self,
        key: &str,
        quota: i64,
        window: Duration,
    ) -> StoreResult<QuotaDecision>;

    /// Gives back one unit of quota if the record still exists.
    ///
    /// Never recreates an expired record.
    async fn refund_quota(&self, key: &str) -> StoreResult<()>;

    /// Returns `true` if the backend answers.
    async fn ping(&self) -> bool;
}
