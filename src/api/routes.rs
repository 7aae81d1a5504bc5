//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{conversion_handler, link_metadata_handler};
use crate::state::AppState;
use axum::{Router, routing::post};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `POST /links/metadata` - Record a link snapshot
/// - `POST /conversions`    - Record a conversion
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/links/metadata", post(link_metadata_handler))
        .route("/conversions", post(conversion_handler))
}
