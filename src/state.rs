//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::api::middleware::auth::ApiToken;
use crate::application::services::Dispatcher;
use crate::domain::repositories::CounterRepository;
use crate::infrastructure::counter::CounterStore;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    /// Dedup counter backend, probed by the health check.
    pub counter_store: Arc<dyn CounterStore>,
    /// Relational counters, probed by the health check.
    pub counters: Arc<dyn CounterRepository>,
    pub api_token: ApiToken,
}

impl AppState {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        counter_store: Arc<dyn CounterStore>,
        counters: Arc<dyn CounterRepository>,
        api_token: ApiToken,
    ) -> Self {
        Self {
            dispatcher,
            counter_store,
            counters,
            api_token,
        }
    }
}
