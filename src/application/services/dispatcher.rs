//! Click, link metadata and conversion recording with concurrent fan-out.
//!
//! A click passes the bot filter and the dedup gate, gets enriched into a
//! [`ClickEvent`] and is then written to every destination at once. Each write
//! runs in its own task; the dispatcher waits for all of them and reports one
//! [`DestinationOutcome`] per write, so a failing store never hides or cancels
//! the result of another.

use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::application::services::bot_filter::BotFilter;
use crate::application::services::dedup_gate::DedupGate;
use crate::application::services::enrichment::RequestEnricher;
use crate::application::services::identity::IdentityResolver;
use crate::domain::entities::{ClickInput, ConversionInput, InboundRequest, LinkSnapshot};
use crate::domain::events::{ClickEvent, ConversionEvent, EventStream, LinkMetadataEvent};
use crate::domain::repositories::{CounterRepository, EventStore, IngestAck};
use crate::error::{AppError, DispatchError};
use crate::utils::click_id::is_valid_click_id;

/// Downstream target of one write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    EventStore,
    DomainCounter,
    LinkCounter,
    ProjectUsage,
}

impl Destination {
    pub fn as_str(self) -> &'static str {
        match self {
            Destination::EventStore => "event_store",
            Destination::DomainCounter => "domain_counter",
            Destination::LinkCounter => "link_counter",
            Destination::ProjectUsage => "project_usage",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful write acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteAck {
    /// Event store confirmation.
    Ingested(IngestAck),
    /// Rows touched by a counter update. Zero when the row does not exist.
    RowsAffected(u64),
}

/// Result of one destination write.
#[derive(Debug)]
pub struct DestinationOutcome {
    pub destination: Destination,
    pub result: Result<WriteAck, DispatchError>,
}

impl DestinationOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

type PendingWrite = (Destination, JoinHandle<Result<WriteAck, DispatchError>>);

/// Entry point of the ingestion pipeline.
pub struct Dispatcher {
    bot_filter: Arc<dyn BotFilter>,
    identity: IdentityResolver,
    enricher: RequestEnricher,
    dedup: DedupGate,
    event_store: Arc<dyn EventStore>,
    counters: Arc<dyn CounterRepository>,
}

impl Dispatcher {
    pub fn new(
        bot_filter: Arc<dyn BotFilter>,
        enricher: RequestEnricher,
        dedup: DedupGate,
        event_store: Arc<dyn EventStore>,
        counters: Arc<dyn CounterRepository>,
    ) -> Self {
        Self {
            bot_filter,
            identity: IdentityResolver::default(),
            enricher,
            dedup,
            event_store,
            counters,
        }
    }

    /// Replaces the identity resolver, e.g. to trust forwarding headers.
    pub fn with_identity(mut self, identity: IdentityResolver) -> Self {
        self.identity = identity;
        self
    }

    /// Records one served redirect.
    ///
    /// Returns `Ok(None)` when the click is filtered as a bot or suppressed by
    /// the dedup window. Otherwise returns one outcome per issued write, in
    /// issue order: the event store first, then the domain counter (root
    /// clicks) or the link and project counters.
    ///
    /// Dropping the returned future does not cancel writes already issued.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty resource id or a malformed
    /// click id, before anything else happens.
    pub async fn record_click(
        &self,
        request: InboundRequest,
        input: ClickInput,
    ) -> Result<Option<Vec<DestinationOutcome>>, AppError> {
        validate_click(&input)?;

        if self.bot_filter.is_bot(&request) {
            debug!("Dropping bot click for {}", input.resource_id);
            return Ok(None);
        }

        let identity = self.identity.resolve(&request);
        if !self.dedup.admit(&identity, &input.resource_id).await.admitted {
            debug!("Suppressing repeated click for {}", input.resource_id);
            return Ok(None);
        }

        let enrichment = self.enricher.enrich(&request);
        let root = input.root;
        let resource_id = input.resource_id.clone();
        let event = ClickEvent::build(input, enrichment, identity);
        let click_id = event.click_id.clone();
        let record = to_record(&event).map_err(|e| {
            AppError::internal(
                "Failed to encode click event",
                json!({ "reason": e.to_string() }),
            )
        })?;

        let mut pending = vec![self.spawn_ingest(EventStream::Clicks, record)];
        if root {
            pending.push(self.spawn_counter(Destination::DomainCounter, resource_id.clone()));
        } else {
            pending.push(self.spawn_counter(Destination::LinkCounter, resource_id.clone()));
            pending.push(self.spawn_counter(Destination::ProjectUsage, resource_id.clone()));
        }

        let outcomes = settle(pending).await;
        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        if failed == 0 {
            info!("Recorded click {} for {}", click_id, resource_id);
        } else {
            warn!(
                "Recorded click {} for {} with {}/{} failed writes",
                click_id,
                resource_id,
                failed,
                outcomes.len()
            );
        }

        Ok(Some(outcomes))
    }

    /// Writes a full snapshot of a link to the `links_metadata` stream.
    ///
    /// No deduplication: every call is one write.
    pub async fn record_link_metadata(
        &self,
        link: &LinkSnapshot,
        deleted: bool,
    ) -> Result<IngestAck, DispatchError> {
        if link.id.trim().is_empty() {
            return Err(DispatchError::Validation("link id is required".into()));
        }

        let record = to_record(&LinkMetadataEvent::build(link, deleted))?;
        let ack = self.ingest_one(EventStream::LinksMetadata, record).await?;
        info!(
            "Recorded metadata for link {} (deleted: {})",
            link.id, deleted
        );
        Ok(ack)
    }

    /// Writes a conversion attributed to an earlier click.
    ///
    /// The click id is not checked against recorded clicks.
    pub async fn record_conversion(
        &self,
        input: ConversionInput,
    ) -> Result<IngestAck, DispatchError> {
        if input.event_name.trim().is_empty() {
            return Err(DispatchError::Validation("event name is required".into()));
        }
        if input.click_id.trim().is_empty() {
            return Err(DispatchError::Validation("click id is required".into()));
        }

        let event_name = input.event_name.clone();
        let record = to_record(&ConversionEvent::build(input))?;
        let ack = self.ingest_one(EventStream::Conversions, record).await?;
        info!("Recorded conversion '{}'", event_name);
        Ok(ack)
    }

    async fn ingest_one(
        &self,
        stream: EventStream,
        record: Value,
    ) -> Result<IngestAck, DispatchError> {
        let (destination, handle) = self.spawn_ingest(stream, record);
        let outcome = settle(vec![(destination, handle)])
            .await
            .pop()
            .ok_or_else(|| DispatchError::TaskFailed("no outcome for event store write".into()))?;

        match outcome.result? {
            WriteAck::Ingested(ack) => Ok(ack),
            WriteAck::RowsAffected(_) => Err(DispatchError::TaskFailed(
                "event store write returned a counter result".into(),
            )),
        }
    }

    fn spawn_ingest(&self, stream: EventStream, record: Value) -> PendingWrite {
        let store = Arc::clone(&self.event_store);
        let handle = tokio::spawn(async move {
            store.ingest(stream, record).await.map(WriteAck::Ingested)
        });
        (Destination::EventStore, handle)
    }

    fn spawn_counter(&self, destination: Destination, id: String) -> PendingWrite {
        let counters = Arc::clone(&self.counters);
        let handle = tokio::spawn(async move {
            let rows = match destination {
                Destination::DomainCounter => counters.increment_domain_clicks(&id).await,
                Destination::LinkCounter => counters.increment_link_clicks(&id).await,
                Destination::ProjectUsage => counters.increment_project_usage(&id).await,
                Destination::EventStore => {
                    return Err(DispatchError::TaskFailed(
                        "event store is not a counter destination".into(),
                    ));
                }
            }?;
            if rows == 0 {
                debug!("{} update for {} touched no rows", destination, id);
            }
            Ok(WriteAck::RowsAffected(rows))
        });
        (destination, handle)
    }
}

/// Checks caller-supplied click fields. Runs first in
/// [`Dispatcher::record_click`]; callers that record in the background use it
/// to reject bad input synchronously.
pub fn validate_click(input: &ClickInput) -> Result<(), AppError> {
    if input.resource_id.trim().is_empty() {
        return Err(AppError::bad_request(
            "Resource id is required",
            json!({ "field": "resource_id" }),
        ));
    }
    if let Some(click_id) = input.click_id.as_deref()
        && !click_id.is_empty()
        && !is_valid_click_id(click_id)
    {
        return Err(AppError::bad_request(
            "Invalid click id",
            json!({ "field": "click_id", "value": click_id }),
        ));
    }
    Ok(())
}

fn to_record<T: Serialize>(event: &T) -> Result<Value, DispatchError> {
    serde_json::to_value(event)
        .map_err(|e| DispatchError::TaskFailed(format!("event is not serializable: {}", e)))
}

/// Awaits every pending write in issue order. A task that panicked becomes a
/// [`DispatchError::TaskFailed`] outcome for its own destination only.
async fn settle(pending: Vec<PendingWrite>) -> Vec<DestinationOutcome> {
    let mut outcomes = Vec::with_capacity(pending.len());
    for (destination, handle) in pending {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(DispatchError::TaskFailed(e.to_string())),
        };

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => {
                warn!("Write to {} failed: {}", destination, e);
                "error"
            }
        };
        metrics::counter!(
            "click_ingest_writes_total",
            "destination" => destination.as_str(),
            "outcome" => outcome
        )
        .increment(1);

        outcomes.push(DestinationOutcome {
            destination,
            result,
        });
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::bot_filter::UserAgentBotFilter;
    use crate::domain::entities::DeploymentEnv;
    use crate::domain::repositories::{MockCounterRepository, MockEventStore};
    use crate::infrastructure::counter::{MemoryCounterStore, MockCounterStore};
    use axum::http::{HeaderMap, HeaderValue, header};
    use std::sync::Mutex;

    const BROWSER_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15";

    fn request(ua: &'static str) -> InboundRequest {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static(ua));
        InboundRequest::new(
            headers,
            "/r/link_1".parse().unwrap(),
            Some("203.0.113.9".parse().unwrap()),
        )
    }

    fn dispatcher(
        env: DeploymentEnv,
        event_store: MockEventStore,
        counters: MockCounterRepository,
    ) -> Dispatcher {
        Dispatcher::new(
            Arc::new(UserAgentBotFilter::new()),
            RequestEnricher::with_platform_geo(env),
            DedupGate::new(Arc::new(MemoryCounterStore::new()), env),
            Arc::new(event_store),
            Arc::new(counters),
        )
    }

    fn ack() -> IngestAck {
        IngestAck {
            successful_rows: 1,
            quarantined_rows: 0,
        }
    }

    fn destinations(outcomes: &[DestinationOutcome]) -> Vec<Destination> {
        outcomes.iter().map(|o| o.destination).collect()
    }

    #[tokio::test]
    async fn test_bot_click_performs_no_writes() {
        let mut store = MockEventStore::new();
        store.expect_ingest().never();
        let mut counters = MockCounterRepository::new();
        counters.expect_increment_link_clicks().never();
        counters.expect_increment_project_usage().never();
        counters.expect_increment_domain_clicks().never();

        let d = dispatcher(DeploymentEnv::Local, store, counters);
        let result = d
            .record_click(
                request("Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)"),
                ClickInput::new("link_1"),
            )
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_link_click_writes_event_link_and_project() {
        let mut store = MockEventStore::new();
        store
            .expect_ingest()
            .withf(|stream, record| {
                *stream == EventStream::Clicks
                    && record["link_id"] == "link_1"
                    && record["country"] == "US"
            })
            .times(1)
            .returning(|_, _| Ok(ack()));
        let mut counters = MockCounterRepository::new();
        counters
            .expect_increment_link_clicks()
            .withf(|id| id == "link_1")
            .times(1)
            .returning(|_| Ok(1));
        counters
            .expect_increment_project_usage()
            .withf(|id| id == "link_1")
            .times(1)
            .returning(|_| Ok(1));
        counters.expect_increment_domain_clicks().never();

        let d = dispatcher(DeploymentEnv::Local, store, counters);
        let outcomes = d
            .record_click(request(BROWSER_UA), ClickInput::new("link_1"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            destinations(&outcomes),
            [
                Destination::EventStore,
                Destination::LinkCounter,
                Destination::ProjectUsage
            ]
        );
        assert!(outcomes.iter().all(DestinationOutcome::is_ok));
    }

    #[tokio::test]
    async fn test_root_click_writes_event_and_domain() {
        let mut store = MockEventStore::new();
        store.expect_ingest().times(1).returning(|_, _| Ok(ack()));
        let mut counters = MockCounterRepository::new();
        counters
            .expect_increment_domain_clicks()
            .withf(|id| id == "dom_1")
            .times(1)
            .returning(|_| Ok(1));
        counters.expect_increment_link_clicks().never();
        counters.expect_increment_project_usage().never();

        let d = dispatcher(DeploymentEnv::Local, store, counters);
        let outcomes = d
            .record_click(request(BROWSER_UA), ClickInput::new("dom_1").root(true))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            destinations(&outcomes),
            [Destination::EventStore, Destination::DomainCounter]
        );
    }

    #[tokio::test]
    async fn test_event_store_failure_does_not_affect_counters() {
        let mut store = MockEventStore::new();
        store
            .expect_ingest()
            .times(1)
            .returning(|_, _| Err(DispatchError::EventStore("connection refused".into())));
        let mut counters = MockCounterRepository::new();
        counters
            .expect_increment_domain_clicks()
            .times(1)
            .returning(|_| Ok(1));

        let d = dispatcher(DeploymentEnv::Local, store, counters);
        let outcomes = d
            .record_click(request(BROWSER_UA), ClickInput::new("dom_1").root(true))
            .await
            .unwrap()
            .unwrap();

        assert!(matches!(
            outcomes[0].result,
            Err(DispatchError::EventStore(_))
        ));
        assert_eq!(outcomes[1].result.as_ref().unwrap(), &WriteAck::RowsAffected(1));
    }

    #[tokio::test]
    async fn test_counter_failure_does_not_affect_event_store() {
        let mut store = MockEventStore::new();
        store.expect_ingest().times(1).returning(|_, _| Ok(ack()));
        let mut counters = MockCounterRepository::new();
        counters
            .expect_increment_domain_clicks()
            .times(1)
            .returning(|_| Err(DispatchError::Database("pool timed out".into())));

        let d = dispatcher(DeploymentEnv::Local, store, counters);
        let outcomes = d
            .record_click(request(BROWSER_UA), ClickInput::new("dom_1").root(true))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            outcomes[0].result.as_ref().unwrap(),
            &WriteAck::Ingested(ack())
        );
        assert!(matches!(outcomes[1].result, Err(DispatchError::Database(_))));
    }

    #[tokio::test]
    async fn test_hosted_dedup_suppresses_third_click() {
        let mut store = MockEventStore::new();
        store.expect_ingest().times(2).returning(|_, _| Ok(ack()));
        let mut counters = MockCounterRepository::new();
        counters
            .expect_increment_link_clicks()
            .times(2)
            .returning(|_| Ok(1));
        counters
            .expect_increment_project_usage()
            .times(2)
            .returning(|_| Ok(1));

        let d = dispatcher(DeploymentEnv::Hosted, store, counters);
        for _ in 0..2 {
            let outcomes = d
                .record_click(request(BROWSER_UA), ClickInput::new("link_1"))
                .await
                .unwrap();
            assert!(outcomes.is_some());
        }
        let third = d
            .record_click(request(BROWSER_UA), ClickInput::new("link_1"))
            .await
            .unwrap();
        assert!(third.is_none());
    }

    #[tokio::test]
    async fn test_local_never_consults_counter_store() {
        let mut store = MockEventStore::new();
        store.expect_ingest().times(3).returning(|_, _| Ok(ack()));
        let mut counters = MockCounterRepository::new();
        counters
            .expect_increment_domain_clicks()
            .times(3)
            .returning(|_| Ok(1));
        let mut dedup_store = MockCounterStore::new();
        dedup_store.expect_increment_and_check().never();

        let d = Dispatcher::new(
            Arc::new(UserAgentBotFilter::new()),
            RequestEnricher::with_platform_geo(DeploymentEnv::Local),
            DedupGate::new(Arc::new(dedup_store), DeploymentEnv::Local),
            Arc::new(store),
            Arc::new(counters),
        );
        for _ in 0..3 {
            let outcomes = d
                .record_click(request(BROWSER_UA), ClickInput::new("dom_1").root(true))
                .await
                .unwrap();
            assert!(outcomes.is_some());
        }
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_any_write() {
        let mut store = MockEventStore::new();
        store.expect_ingest().never();
        let d = dispatcher(DeploymentEnv::Local, store, MockCounterRepository::new());

        let err = d
            .record_click(request(BROWSER_UA), ClickInput::new(""))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let err = d
            .record_click(
                request(BROWSER_UA),
                ClickInput::new("link_1").with_click_id("not a/valid id"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_supplied_click_id_reaches_the_event() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut store = MockEventStore::new();
        store.expect_ingest().times(1).returning(move |_, record| {
            sink.lock().unwrap().push(record);
            Ok(ack())
        });
        let mut counters = MockCounterRepository::new();
        counters
            .expect_increment_domain_clicks()
            .returning(|_| Ok(1));

        let d = dispatcher(DeploymentEnv::Local, store, counters);
        d.record_click(
            request(BROWSER_UA),
            ClickInput::new("dom_1")
                .root(true)
                .with_click_id("abc123DEF_-x")
                .with_affiliate("partner_7"),
        )
        .await
        .unwrap();

        let records = seen.lock().unwrap();
        assert_eq!(records[0]["click_id"], "abc123DEF_-x");
        assert_eq!(records[0]["affiliate_id"], "partner_7");
    }

    #[tokio::test]
    async fn test_link_metadata_twice_is_two_writes() {
        let mut store = MockEventStore::new();
        store
            .expect_ingest()
            .withf(|stream, record| {
                *stream == EventStream::LinksMetadata && record["link_id"] == "link_1"
            })
            .times(2)
            .returning(|_, _| Ok(ack()));

        let d = dispatcher(DeploymentEnv::Local, store, MockCounterRepository::new());
        let link = LinkSnapshot::new("link_1", "s.example.com", "promo", "https://example.com", None);

        d.record_link_metadata(&link, false).await.unwrap();
        d.record_link_metadata(&link, false).await.unwrap();
    }

    #[tokio::test]
    async fn test_link_metadata_requires_id() {
        let mut store = MockEventStore::new();
        store.expect_ingest().never();

        let d = dispatcher(DeploymentEnv::Local, store, MockCounterRepository::new());
        let link = LinkSnapshot::new("", "s.example.com", "promo", "https://example.com", None);

        let err = d.record_link_metadata(&link, true).await.unwrap_err();
        assert!(matches!(err, DispatchError::Validation(_)));
    }

    #[tokio::test]
    async fn test_conversion_is_one_write() {
        let mut store = MockEventStore::new();
        store
            .expect_ingest()
            .withf(|stream, record| {
                *stream == EventStream::Conversions
                    && record["event_name"] == "Purchase"
                    && record["properties"]["amount"] == 4900
            })
            .times(1)
            .returning(|_, _| Ok(ack()));

        let d = dispatcher(DeploymentEnv::Local, store, MockCounterRepository::new());
        let properties = json!({ "amount": 4900 }).as_object().unwrap().clone();
        let result = d
            .record_conversion(ConversionInput {
                event_name: "Purchase".into(),
                properties,
                click_id: "clk_1".into(),
                affiliate_id: None,
            })
            .await
            .unwrap();

        assert_eq!(result, ack());
    }

    #[tokio::test]
    async fn test_conversion_validation() {
        let mut store = MockEventStore::new();
        store.expect_ingest().never();
        let d = dispatcher(DeploymentEnv::Local, store, MockCounterRepository::new());

        let input = ConversionInput {
            event_name: "".into(),
            properties: Default::default(),
            click_id: "clk_1".into(),
            affiliate_id: None,
        };
        assert!(matches!(
            d.record_conversion(input.clone()).await,
            Err(DispatchError::Validation(_))
        ));

        let input = ConversionInput {
            event_name: "Signup".into(),
            click_id: "".into(),
            ..input
        };
        assert!(matches!(
            d.record_conversion(input).await,
            Err(DispatchError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_conversion_surfaces_rejection() {
        let mut store = MockEventStore::new();
        store.expect_ingest().times(1).returning(|_, _| {
            Err(DispatchError::Rejected {
                status: 400,
                body: "bad record".into(),
            })
        });

        let d = dispatcher(DeploymentEnv::Local, store, MockCounterRepository::new());
        let err = d
            .record_conversion(ConversionInput {
                event_name: "Signup".into(),
                properties: Default::default(),
                click_id: "clk_1".into(),
                affiliate_id: Some("aff".into()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Rejected { status: 400, .. }));
    }
}
