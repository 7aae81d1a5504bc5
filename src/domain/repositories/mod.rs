//! Repository trait definitions for the domain layer.
//!
//! These traits abstract the two downstream stores the dispatcher writes to.
//! Concrete implementations live in `crate::infrastructure`.
//!
//! # Available Repositories
//!
//! - [`EventStore`] - Append-only analytics event ingestion
//! - [`CounterRepository`] - Relational click and usage counters
//!
//! Mock implementations are auto-generated via `mockall` for unit tests.

pub mod counter_repository;
pub mod event_store;

pub use counter_repository::CounterRepository;
pub use event_store::{EventStore, IngestAck};

#[cfg(test)]
pub use counter_repository::MockCounterRepository;
#[cfg(test)]
pub use event_store::MockEventStore;
