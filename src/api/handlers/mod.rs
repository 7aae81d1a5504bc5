//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod conversions;
pub mod health;
pub mod links;
pub mod redirect;

pub use conversions::conversion_handler;
pub use health::health_handler;
pub use links::link_metadata_handler;
pub use redirect::redirect_handler;
