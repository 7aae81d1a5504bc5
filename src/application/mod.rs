//! Application layer: the click ingestion pipeline.
//!
//! Services here consume the domain's repository traits and the counter store,
//! and expose the `record_*` entry points used by HTTP handlers.
//!
//! # Pipeline stages
//!
//! - [`services::bot_filter`] - Drops crawler and test traffic
//! - [`services::identity`] - Hashes IP and user-agent into the dedup key
//! - [`services::dedup_gate`] - Caps repeated clicks per visitor and resource
//! - [`services::enrichment`] - Geo, device, software and referer context
//! - [`services::dispatcher`] - Builds events and fans writes out concurrently

pub mod services;
