//! Redis-backed key-value store.

use crate::domain::entities::QuotaDecision;
use crate::domain::repositories::{KeyValueStore, StoreError, StoreResult};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, RedisError, Script, aio::ConnectionManager};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Reserve-one-unit on a quota record in a single round-trip.
///
/// Returns `{granted, remaining, ttl_ms}`.
static CONSUME_QUOTA: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r"
local quota = tonumber(ARGV[1])
local window = tonumber(ARGV[2])
local current = redis.call('GET', KEYS[1])
if not current then
  redis.call('SET', KEYS[1], quota - 1, 'PX', window)
  return {1, quota - 1, window}
end
local remaining = tonumber(current)
if not remaining then
  return redis.error_reply('quota record is not an integer')
end
local ttl = redis.call('PTTL', KEYS[1])
if ttl < 0 then
  redis.call('PEXPIRE', KEYS[1], window)
  ttl = window
end
if remaining <= 0 then
  return {0, remaining, ttl}
end
return {1, redis.call('DECR', KEYS[1]), ttl}
",
    )
});

/// Increment only while the record is alive, so a refund never creates a
/// record without expiry.
static REFUND_QUOTA: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r"
if redis.call('EXISTS', KEYS[1]) == 1 then
  return redis.call('INCR', KEYS[1])
end
return 0
",
    )
});

/// One Redis logical database used as a store partition.
///
/// Uses `ConnectionManager` for connection reuse; every call clones the
/// handle and drops it when the call returns.
pub struct RedisStore {
    conn: ConnectionManager,
    database: u32,
}

impl RedisStore {
    /// Connects to logical database `database` of the server at `base_url`
    /// and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(base_url: &str, database: u32) -> StoreResult<Self> {
        let url = partition_url(base_url, database)?;

        let client = Client::open(url.as_str()).map_err(|e| {
            StoreError::Connection(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            StoreError::Connection(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| StoreError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis database {}", database);

        Ok(Self {
            conn: manager,
            database,
        })
    }
}

/// Rewrites the database path of a Redis URL.
///
/// `redis://:pw@host:6379/0` with `database = 1` becomes `redis://:pw@host:6379/1`.
///
/// # Errors
///
/// Returns [`StoreError::Connection`] if `base_url` is not a valid URL.
pub fn partition_url(base_url: &str, database: u32) -> StoreResult<String> {
    let mut url = Url::parse(base_url)
        .map_err(|e| StoreError::Connection(format!("Invalid Redis URL: {}", e)))?;
    url.set_path(&format!("/{}", database));
    Ok(url.to_string())
}

fn command_error(e: RedisError) -> StoreError {
    StoreError::Command(e.to_string())
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis())
        .unwrap_or(u64::MAX)
        .max(1)
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(command_error)
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("PX")
            .arg(millis(ttl))
            .query_async(&mut conn)
            .await
            .map_err(command_error)?;

        debug!(
            "SET NX db{} {} -> {}",
            self.database,
            key,
            if reply.is_some() { "written" } else { "taken" }
        );
        Ok(reply.is_some())
    }

    async fn incr(&self, key: &str) -> StoreResult<i64> {
        let mut conn = self.conn.clone();
        conn.incr::<_, _, i64>(key, 1).await.map_err(command_error)
    }

    async fn ttl(&self, key: &str) -> StoreResult<Option<Duration>> {
        let mut conn = self.conn.clone();
        let pttl: i64 = conn.pttl(key).await.map_err(command_error)?;

        // -2: no such key, -1: no expiry
        Ok(u64::try_from(pttl).ok().map(Duration::from_millis))
    }

    async fn consume_quota(
        &self,
        key: &str,
        quota: i64,
        window: Duration,
    ) -> StoreResult<QuotaDecision> {
        let mut conn = self.conn.clone();
        let (granted, remaining, ttl_ms): (i64, i64, i64) = CONSUME_QUOTA
            .key(key)
            .arg(quota)
            .arg(millis(window))
            .invoke_async(&mut conn)
            .await
            .map_err(command_error)?;

        Ok(QuotaDecision {
            granted: granted == 1,
            remaining,
            reset_in: Duration::from_millis(u64::try_from(ttl_ms).unwrap_or(0)),
        })
    }

    async fn refund_quota(&self, key: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let restored: i64 = REFUND_QUOTA
            .key(key)
            .invoke_async(&mut conn)
            .await
            .map_err(command_error)?;

        debug!("Quota refund db{} {} -> {}", self.database, key, restored);
        Ok(())
    }

    async fn ping(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }
}
