//! Per-client creation quota backed by TTL counters.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::ShortenerSettings;
use crate::domain::entities::{QuotaOutcome, QuotaSnapshot, whole_minutes};
use crate::domain::repositories::{KeyValueStore, StoreError};
use crate::error::AppError;

/// Tracks how many links each client may still create in its current window.
///
/// A client's record is created with the full quota on its first request and
/// evicted by the store when the window ends, which resets the client.
///
/// # Consistency
///
/// Checking and spending quota is one atomic store operation
/// ([`KeyValueStore::consume_quota`]), so concurrent requests from the same
/// client can never exceed the quota. Callers hand the unit back with
/// [`RateLimiter::refund`] when the creation it paid for fails, so only
/// successful creations count.
pub struct RateLimiter {
    store: Arc<dyn KeyValueStore>,
    quota: i64,
    window: Duration,
}

impl RateLimiter {
    /// Creates a rate limiter over the quota partition.
    pub fn new(store: Arc<dyn KeyValueStore>, settings: &ShortenerSettings) -> Self {
        Self {
            store,
            quota: i64::from(settings.quota),
            window: settings.window,
        }
    }

    /// Spends one unit of `client`'s quota if any is left.
    ///
    /// `reset_minutes` is the record's remaining TTL in whole minutes,
    /// truncated.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the store fails.
    pub async fn check_and_consume(&self, client: &str) -> Result<QuotaOutcome, AppError> {
        let decision = self
            .store
            .consume_quota(client, self.quota, self.window)
            .await
            .map_err(AppError::Unavailable)?;

        let outcome = QuotaOutcome::from(decision);
        match outcome {
            QuotaOutcome::Allowed {
                remaining,
                reset_minutes,
            } => debug!(client, remaining, reset_minutes, "Quota consumed"),
            QuotaOutcome::Denied { reset_minutes } => {
                debug!(client, reset_minutes, "Quota exhausted")
            }
        }

        Ok(outcome)
    }

    /// Returns one unit to `client` after a failed creation.
    ///
    /// Best effort: failures are logged, and an expired record is left alone.
    pub async fn refund(&self, client: &str) {
        if let Err(e) = self.store.refund_quota(client).await {
            warn!(client, "Failed to refund quota: {}", e);
        }
    }

    /// Reads `client`'s record without spending anything.
    ///
    /// Returns `None` if the client has no live record (full quota).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the store fails or the record
    /// does not hold an integer.
    pub async fn snapshot(&self, client: &str) -> Result<Option<QuotaSnapshot>, AppError> {
        let Some(value) = self
            .store
            .get(client)
            .await
            .map_err(AppError::Unavailable)?
        else {
            return Ok(None);
        };

        let remaining = value.parse::<i64>().map_err(|_| {
            AppError::Unavailable(StoreError::InvalidValue {
                key: client.to_string(),
                value: value.clone(),
            })
        })?;

        let ttl = self
            .store
            .ttl(client)
            .await
            .map_err(AppError::Unavailable)?
            .unwrap_or_default();

        Ok(Some(QuotaSnapshot {
            remaining,
            reset_minutes: whole_minutes(ttl),
        }))
    }

    /// Checks if the quota partition answers.
    pub async fn health_check(&self) -> bool {
        self.store.ping().await
    }
}
