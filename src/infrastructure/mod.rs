//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`counter`] - Dedup window counters (Redis and in-memory implementations)
//! - [`event_store`] - HTTP client for the analytics event store
//! - [`persistence`] - PostgreSQL counter repository

pub mod counter;
pub mod event_store;
pub mod persistence;
