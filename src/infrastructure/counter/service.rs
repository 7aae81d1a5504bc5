//! Counter store trait and error types.

use async_trait::async_trait;
use std::time::Duration;

/// Errors that can occur while talking to a counter store.
#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    #[error("Counter store connection error: {0}")]
    ConnectionError(String),
    #[error("Counter store operation error: {0}")]
    OperationError(String),
}

/// Result type for counter store operations.
pub type CounterResult<T> = Result<T, CounterError>;

/// Atomic increment-with-expiry counters, one per key.
///
/// The first increment of a key opens a window of `window` length; the key
/// disappears when the window ends. The increment and the expiry must be
/// applied atomically by the implementation.
///
/// # Implementations
///
/// - [`crate::infrastructure::counter::RedisCounterStore`] - Redis, shared across instances
/// - [`crate::infrastructure::counter::MemoryCounterStore`] - In-process, for development and tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increments `key` and reports whether the new count is within `cap`.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError`] when the store is unreachable or the command fails.
    /// Callers decide how to degrade; the dedup gate fails open.
    async fn increment_and_check(&self, key: &str, window: Duration, cap: u64)
    -> CounterResult<bool>;

    /// Checks if the backend is healthy.
    async fn health_check(&self) -> bool;

    /// Backend name for logs and health output.
    fn name(&self) -> &'static str;
}
