//! In-process key-value store with TTL support.

use crate::domain::entities::QuotaDecision;
use crate::domain::repositories::{KeyValueStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

/// A key-value store held in process memory.
///
/// Expired entries are dropped lazily when touched. Deadlines use tokio's
/// clock, so paused-time tests can move through TTLs with
/// `tokio::time::advance`.
///
/// State is not shared between processes: only suitable for tests and
/// single-node development.
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        debug!("Using MemoryStore (single node only)");
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<String, Entry>>> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Connection("memory store lock poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the live entry at `key`, evicting it first if it has expired.
fn live<'a>(
    entries: &'a mut HashMap<String, Entry>,
    key: &str,
    now: Instant,
) -> Option<&'a mut Entry> {
    if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
        entries.remove(key);
    }
    entries.get_mut(key)
}

fn parse_counter(key: &str, value: &str) -> StoreResult<i64> {
    value.parse().map_err(|_| StoreError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut entries = self.lock()?;
        Ok(live(&mut entries, key, Instant::now()).map(|entry| entry.value.clone()))
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<bool> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        if live(&mut entries, key, now).is_some() {
            return Ok(false);
        }

        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(now + ttl),
            },
        );
        Ok(true)
    }

    async fn incr(&self, key: &str) -> StoreResult<i64> {
        let mut entries = self.lock()?;
        match live(&mut entries, key, Instant::now()) {
            Some(entry) => {
                let next = parse_counter(key, &entry.value)? + 1;
                entry.value = next.to_string();
                Ok(next)
            }
            None => {
                entries.insert(
                    key.to_string(),
                    Entry {
                        value: "1".to_string(),
                        expires_at: None,
                    },
                );
                Ok(1)
            }
        }
    }

    async fn ttl(&self, key: &str) -> StoreResult<Option<Duration>> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        Ok(live(&mut entries, key, now)
            .and_then(|entry| entry.expires_at)
            .map(|deadline| deadline.saturating_duration_since(now)))
    }

    async fn consume_quota(
        &self,
        key: &str,
        quota: i64,
        window: Duration,
    ) -> StoreResult<QuotaDecision> {
        let now = Instant::now();
        let mut entries = self.lock()?;

        let Some(entry) = live(&mut entries, key, now) else {
            entries.insert(
                key.to_string(),
                Entry {
                    value: (quota - 1).to_string(),
                    expires_at: Some(now + window),
                },
            );
            return Ok(QuotaDecision {
                granted: true,
                remaining: quota - 1,
                reset_in: window,
            });
        };

        let remaining = parse_counter(key, &entry.value)?;
        let deadline = *entry.expires_at.get_or_insert(now + window);
        let reset_in = deadline.saturating_duration_since(now);

        if remaining <= 0 {
            return Ok(QuotaDecision {
                granted: false,
                remaining,
                reset_in,
            });
        }

        entry.value = (remaining - 1).to_string();
        Ok(QuotaDecision {
            granted: true,
            remaining: remaining - 1,
            reset_in,
        })
    }

    async fn refund_quota(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.lock()?;
        if let Some(entry) = live(&mut entries, key, Instant::now()) {
            let restored = parse_counter(key, &entry.value)? + 1;
            entry.value = restored.to_string();
        }
        Ok(())
    }

    async fn ping(&self) -> bool {
        self.lock().is_ok()
    }
}
