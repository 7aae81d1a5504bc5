//! HTTP server initialization and runtime setup.
//!
//! Handles database and Redis connections, wires the ingestion pipeline and
//! runs the Axum server until Ctrl+C.

use crate::api::middleware::auth::ApiToken;
use crate::application::services::{
    DedupGate, Dispatcher, IdentityResolver, RequestEnricher, UserAgentBotFilter,
};
use crate::config::Config;
use crate::domain::repositories::{CounterRepository, EventStore};
use crate::infrastructure::counter::{CounterStore, MemoryCounterStore, RedisCounterStore};
use crate::infrastructure::event_store::HttpEventStore;
use crate::infrastructure::persistence::PgCounterRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Redis dedup counters (or in-memory fallback)
/// - Event store client
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails
/// - The event store client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    let counter_store = connect_counter_store(&config).await;

    let event_store: Arc<dyn EventStore> = Arc::new(
        HttpEventStore::new(
            &config.event_store_url,
            config.event_store_token.clone(),
            Duration::from_secs(config.event_store_timeout_secs),
        )
        .context("Failed to build event store client")?,
    );

    let counters: Arc<dyn CounterRepository> = Arc::new(PgCounterRepository::new(Arc::new(pool)));

    let env = config.deployment_env;
    let dispatcher = Dispatcher::new(
        Arc::new(UserAgentBotFilter::new()),
        RequestEnricher::with_platform_geo(env),
        DedupGate::new(counter_store.clone(), env),
        event_store,
        counters.clone(),
    )
    .with_identity(IdentityResolver::new(config.behind_proxy));
    tracing::info!("Ingestion pipeline ready ({} mode)", env);

    let state = AppState::new(
        Arc::new(dispatcher),
        counter_store,
        counters,
        ApiToken::new(&config.ingest_api_token),
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Redis when configured and reachable, process memory otherwise.
async fn connect_counter_store(config: &Config) -> Arc<dyn CounterStore> {
    if let Some(redis_url) = &config.redis_url {
        match RedisCounterStore::connect(redis_url).await {
            Ok(redis) => {
                tracing::info!("Dedup counters in Redis");
                return Arc::new(redis);
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to connect to Redis: {}. Dedup counters kept in memory.",
                    e
                );
            }
        }
    } else {
        tracing::info!("Redis not configured, dedup counters kept in memory");
    }

    Arc::new(MemoryCounterStore::new())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::warn!(
            "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
            e
        ),
    }
}
