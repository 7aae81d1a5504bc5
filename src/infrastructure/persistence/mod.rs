//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgCounterRepository`] - Domain, link and project counters

pub mod pg_counter_repository;

pub use pg_counter_repository::PgCounterRepository;
