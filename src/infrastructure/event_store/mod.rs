//! Event store clients.
//!
//! - [`HttpEventStore`] - Append-only ingestion over HTTP with bearer auth

mod http_event_store;

pub use http_event_store::HttpEventStore;
