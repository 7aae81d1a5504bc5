//! Domain layer: entities, event records and store contracts.
//!
//! The domain layer has no dependencies on infrastructure or HTTP layers.
//!
//! # Architecture
//!
//! - [`entities`] - Request snapshot, enrichment and caller inputs
//! - [`events`] - Canonical click, link-metadata and conversion records
//! - [`repositories`] - Event store and counter store traits
//!
//! # Click Processing Flow
//!
//! 1. HTTP handler captures an [`entities::InboundRequest`]
//! 2. [`crate::application::services::Dispatcher`] filters, dedups and enriches it
//! 3. [`events::ClickEvent`] is built
//! 4. Writes fan out to [`repositories::EventStore`] and [`repositories::CounterRepository`]

pub mod entities;
pub mod events;
pub mod repositories;
