//! Counting stores backing the click dedup window.
//!
//! Provides a [`CounterStore`] trait with two implementations:
//! - [`RedisCounterStore`] - Production Redis-backed counters
//! - [`MemoryCounterStore`] - Per-process counters for development and tests

mod memory_counter;
mod redis_counter;
mod service;

pub use memory_counter::MemoryCounterStore;
pub use redis_counter::RedisCounterStore;
pub use service::{CounterError, CounterResult, CounterStore};

#[cfg(test)]
pub use service::MockCounterStore;
