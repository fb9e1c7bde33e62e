//! Short code resolution and redirect counting.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::repositories::{KeyValueStore, StoreError};
use crate::error::AppError;

/// Key of the global redirect counter in the quota partition.
pub const REDIRECT_COUNTER_KEY: &str = "counter";

/// Resolves short codes to their target URLs.
///
/// Every successful resolution bumps the global redirect counter. The
/// counter is statistics only: a failed increment is logged and the
/// redirect still happens.
pub struct RedirectService {
    links: Arc<dyn KeyValueStore>,
    counters: Arc<dyn KeyValueStore>,
}

impl RedirectService {
    pub fn new(links: Arc<dyn KeyValueStore>, counters: Arc<dyn KeyValueStore>) -> Self {
        Self { links, counters }
    }

    /// Looks up the target URL for `code`.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] - no live mapping for `code`
    /// - [`AppError::LookupUnavailable`] - links store failure
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        let target = self
            .links
            .get(code)
            .await
            .map_err(AppError::LookupUnavailable)?
            .ok_or(AppError::NotFound)?;

        match self.counters.incr(REDIRECT_COUNTER_KEY).await {
            Ok(total) => debug!(code, total, "Redirect counted"),
            Err(e) => warn!(code, "Failed to increment redirect counter: {}", e),
        }

        Ok(target)
    }

    /// Total redirects served, `0` if none yet.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::LookupUnavailable`] if the store fails or the
    /// counter is not an integer.
    pub async fn redirect_count(&self) -> Result<i64, AppError> {
        let Some(value) = self
            .counters
            .get(REDIRECT_COUNTER_KEY)
            .await
            .map_err(AppError::LookupUnavailable)?
        else {
            return Ok(0);
        };

        value.parse().map_err(|_| {
            AppError::LookupUnavailable(StoreError::InvalidValue {
                key: REDIRECT_COUNTER_KEY.to_string(),
                value,
            })
        })
    }
}
