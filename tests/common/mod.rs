#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use click_ingest::api::middleware::auth::ApiToken;
use click_ingest::application::services::{
    DedupGate, Dispatcher, IdentityResolver, RequestEnricher, UserAgentBotFilter,
};
use click_ingest::domain::entities::{DeploymentEnv, InboundRequest};
use click_ingest::domain::events::EventStream;
use click_ingest::domain::repositories::{CounterRepository, EventStore, IngestAck};
use click_ingest::error::DispatchError;
use click_ingest::infrastructure::counter::{
    CounterError, CounterResult, CounterStore, MemoryCounterStore,
};
use click_ingest::state::AppState;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const API_TOKEN: &str = "test-ingest-token";

pub const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const CRAWLER_UA: &str = "Mozilla/5.0 (compatible; bingbot/2.0; +http://www.bing.com/bingbot.htm)";

/// A request arriving directly from socket peer `ip`.
pub fn request(ua: &'static str, ip: &'static str) -> InboundRequest {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static(ua));
    InboundRequest::new(
        headers,
        "/r/link_1".parse().unwrap(),
        Some(ip.parse().unwrap()),
    )
}

/// Event store that keeps every record in memory.
#[derive(Default)]
pub struct RecordingEventStore {
    records: Mutex<Vec<(EventStream, Value)>>,
    fail: AtomicBool,
}

impl RecordingEventStore {
    pub fn failing() -> Self {
        let store = Self::default();
        store.fail.store(true, Ordering::SeqCst);
        store
    }

    pub fn records(&self) -> Vec<(EventStream, Value)> {
        self.records.lock().unwrap().clone()
    }

    pub fn count(&self, stream: EventStream) -> usize {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == stream)
            .count()
    }
}

#[async_trait]
impl EventStore for RecordingEventStore {
    async fn ingest(&self, stream: EventStream, record: Value) -> Result<IngestAck, DispatchError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DispatchError::EventStore("connection refused".into()));
        }
        self.records.lock().unwrap().push((stream, record));
        Ok(IngestAck {
            successful_rows: 1,
            quarantined_rows: 0,
        })
    }
}

/// Relational counters that log each increment as `(table, id)`.
#[derive(Default)]
pub struct RecordingCounters {
    calls: Mutex<Vec<(&'static str, String)>>,
    fail: AtomicBool,
    healthy: AtomicBool,
}

impl RecordingCounters {
    pub fn new() -> Self {
        let counters = Self::default();
        counters.healthy.store(true, Ordering::SeqCst);
        counters
    }

    pub fn failing() -> Self {
        let counters = Self::new();
        counters.fail.store(true, Ordering::SeqCst);
        counters
    }

    pub fn unhealthy() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(&'static str, String)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, table: &'static str, id: &str) -> Result<u64, DispatchError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DispatchError::Database("pool timed out".into()));
        }
        self.calls.lock().unwrap().push((table, id.to_string()));
        Ok(1)
    }
}

#[async_trait]
impl CounterRepository for RecordingCounters {
    async fn increment_domain_clicks(&self, domain_id: &str) -> Result<u64, DispatchError> {
        self.record("domains", domain_id)
    }

    async fn increment_link_clicks(&self, link_id: &str) -> Result<u64, DispatchError> {
        self.record("links", link_id)
    }

    async fn increment_project_usage(&self, link_id: &str) -> Result<u64, DispatchError> {
        self.record("projects", link_id)
    }

    async fn health_check(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }
}

/// Dedup store that is always down, counting how often it was asked.
#[derive(Default)]
pub struct UnreachableCounterStore {
    pub calls: AtomicUsize,
}

#[async_trait]
impl CounterStore for UnreachableCounterStore {
    async fn increment_and_check(
        &self,
        _key: &str,
        _window: Duration,
        _cap: u64,
    ) -> CounterResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CounterError::ConnectionError("connection refused".into()))
    }

    async fn health_check(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "unreachable"
    }
}

pub struct Pipeline {
    pub dispatcher: Arc<Dispatcher>,
    pub event_store: Arc<RecordingEventStore>,
    pub counters: Arc<RecordingCounters>,
    pub counter_store: Arc<dyn CounterStore>,
}

pub fn pipeline_with(
    env: DeploymentEnv,
    event_store: RecordingEventStore,
    counters: RecordingCounters,
    counter_store: Arc<dyn CounterStore>,
) -> Pipeline {
    build_pipeline(env, event_store, counters, counter_store, IdentityResolver::default())
}

/// Hosted pipeline that trusts `X-Forwarded-For`, as when deployed behind a proxy.
pub fn pipeline_behind_proxy() -> Pipeline {
    build_pipeline(
        DeploymentEnv::Hosted,
        RecordingEventStore::default(),
        RecordingCounters::new(),
        Arc::new(MemoryCounterStore::new()),
        IdentityResolver::new(true),
    )
}

fn build_pipeline(
    env: DeploymentEnv,
    event_store: RecordingEventStore,
    counters: RecordingCounters,
    counter_store: Arc<dyn CounterStore>,
    identity: IdentityResolver,
) -> Pipeline {
    let event_store = Arc::new(event_store);
    let counters = Arc::new(counters);
    let dispatcher = Dispatcher::new(
        Arc::new(UserAgentBotFilter::new()),
        RequestEnricher::with_platform_geo(env),
        DedupGate::new(counter_store.clone(), env),
        event_store.clone(),
        counters.clone(),
    )
    .with_identity(identity);

    Pipeline {
        dispatcher: Arc::new(dispatcher),
        event_store,
        counters,
        counter_store,
    }
}

pub fn pipeline(env: DeploymentEnv) -> Pipeline {
    pipeline_with(
        env,
        RecordingEventStore::default(),
        RecordingCounters::new(),
        Arc::new(MemoryCounterStore::new()),
    )
}

pub fn create_test_state(pipeline: &Pipeline) -> AppState {
    AppState::new(
        pipeline.dispatcher.clone(),
        pipeline.counter_store.clone(),
        pipeline.counters.clone(),
        ApiToken::new(API_TOKEN),
    )
}

/// Waits until the background click task has written `n` records.
pub async fn wait_for_records(store: &RecordingEventStore, n: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while store.records().len() < n {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("background click was not recorded in time");
}

/// One request received by [`spawn_event_store`].
#[derive(Debug, Clone)]
pub struct ReceivedEvent {
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct FakeIngestState {
    status: StatusCode,
    ack: Value,
    received: Arc<Mutex<Vec<ReceivedEvent>>>,
}

async fn fake_ingest(
    State(state): State<FakeIngestState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.received.lock().unwrap().push(ReceivedEvent {
        query,
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    if state.status.is_success() {
        Json(state.ack.clone()).into_response()
    } else {
        (state.status, "quota exceeded for workspace").into_response()
    }
}

pub struct FakeEventStoreServer {
    pub base_url: String,
    pub received: Arc<Mutex<Vec<ReceivedEvent>>>,
}

/// Starts an in-process stand-in for the ingestion API that answers `status`.
pub async fn spawn_event_store(status: StatusCode) -> FakeEventStoreServer {
    spawn_event_store_with_ack(status, json!({ "successful_rows": 1, "quarantined_rows": 0 })).await
}

/// Like [`spawn_event_store`], but success responses carry `ack` as the body.
pub async fn spawn_event_store_with_ack(status: StatusCode, ack: Value) -> FakeEventStoreServer {
    let received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/v0/events", post(fake_ingest))
        .with_state(FakeIngestState {
            status,
            ack,
            received: received.clone(),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeEventStoreServer {
        base_url: format!("http://{}", addr),
        received,
    }
}
