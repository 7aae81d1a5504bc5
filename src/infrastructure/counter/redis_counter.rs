//! Redis-backed counter store.

use super::service::{CounterError, CounterResult, CounterStore};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, Script, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

/// Increments the key and arms its expiry on the first hit, in one round trip.
const INCREMENT_WITH_EXPIRY: &str = r"
local current = redis.call('INCR', KEYS[1])
if current == 1 then
    redis.call('PEXPIRE', KEYS[1], ARGV[1])
end
return current
";

/// Redis counter store shared by every instance of the service.
///
/// Uses `ConnectionManager` for connection reuse and a Lua script so that
/// the increment and the expiry can never be split by a crash or a race.
pub struct RedisCounterStore {
    client: ConnectionManager,
    script: Script,
    key_prefix: String,
}

impl RedisCounterStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::ConnectionError`] if the URL is invalid, the connection
    /// cannot be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> CounterResult<Self> {
        info!("Connecting to Redis counter store");

        let client = Client::open(redis_url).map_err(|e| {
            CounterError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CounterError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CounterError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            script: Script::new(INCREMENT_WITH_EXPIRY),
            key_prefix: "dedup:".to_string(),
        })
    }

    fn build_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn increment_and_check(
        &self,
        key: &str,
        window: Duration,
        cap: u64,
    ) -> CounterResult<bool> {
        let key = self.build_key(key);
        let mut conn = self.client.clone();
        let window_ms = window.as_millis().max(1) as u64;

        let count: u64 = self
            .script
            .key(&key)
            .arg(window_ms)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| CounterError::OperationError(e.to_string()))?;

        debug!("Counter {} -> {} (cap {})", key, count, cap);
        Ok(count <= cap)
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
