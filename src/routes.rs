//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`              - Health check: database, dedup store (public)
//! - `GET  /r/{resource_id}`     - Record a click and redirect (Bearer token required)
//! - `/api/*`                    - Ingestion API (Bearer token required)
//!
//! Clicks are reported by the link-serving edge after it has resolved the
//! link, so the click route shares the API token.

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
    let click_router = Router::new()
        .route("/r/{resource_id}", get(redirect_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .route("/health", get(health_handler))
        .merge(click_router)
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer())
}
