//! HTTP layer over the ingestion pipeline.
//!
//! # Modules
//!
//! - [`dto`] - Request and response bodies
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Authentication and request tracing
//! - [`routes`] - Protected route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
