//! In-process counter store for development and tests.

use super::service::{CounterResult, CounterStore};
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Number of tracked keys above which expired windows are swept.
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u64,
    expires_at: Instant,
}

/// Counter store living in the current process.
///
/// Each key is updated under its `dashmap` shard lock, which makes the
/// increment and the window reset atomic for that key. Time comes from
/// `tokio::time`, so tests can drive windows with a paused clock.
///
/// Counters are not shared between instances; use
/// [`crate::infrastructure::counter::RedisCounterStore`] when running more than one.
#[derive(Default)]
pub struct MemoryCounterStore {
    windows: DashMap<String, Window>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        debug!("Using MemoryCounterStore (counters are per-process)");
        Self::default()
    }

    /// Number of keys currently tracked, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    fn sweep_expired(&self, now: Instant) {
        self.windows.retain(|_, w| w.expires_at > now);
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn increment_and_check(
        &self,
        key: &str,
        window: Duration,
        cap: u64,
    ) -> CounterResult<bool> {
        let now = Instant::now();

        if self.windows.len() > SWEEP_THRESHOLD {
            self.sweep_expired(now);
        }

        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            expires_at: now + window,
        });

        if entry.expires_at <= now {
            *entry = Window {
                count: 0,
                expires_at: now + window,
            };
        }

        entry.count += 1;
        Ok(entry.count <= cap)
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
