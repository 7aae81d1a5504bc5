//! Event store client for an HTTP ingestion API.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::domain::events::EventStream;
use crate::domain::repositories::{EventStore, IngestAck};
use crate::error::DispatchError;

/// Upper bound on how much of an error body is kept in [`DispatchError::Rejected`].
const MAX_ERROR_BODY: usize = 512;

/// Posts one JSON record per call to `{base}/v0/events?name={stream}&wait=true`.
///
/// `wait=true` makes the API acknowledge only after the row is ingested, so a
/// successful return means the event is durable on the store side.
pub struct HttpEventStore {
    client: Client,
    events_url: Url,
    token: String,
}

impl HttpEventStore {
    /// Creates a client for the ingestion API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::EventStore`] if the base URL cannot be parsed or
    /// the HTTP client cannot be constructed.
    pub fn new(base_url: &str, token: impl Into<String>, timeout: Duration) -> Result<Self, DispatchError> {
        let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
            .map_err(|e| DispatchError::EventStore(format!("Invalid event store URL: {}", e)))?;
        let events_url = base
            .join("v0/events")
            .map_err(|e| DispatchError::EventStore(format!("Invalid event store URL: {}", e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DispatchError::EventStore(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            events_url,
            token: token.into(),
        })
    }

    fn stream_url(&self, stream: EventStream) -> Url {
        let mut url = self.events_url.clone();
        url.query_pairs_mut()
            .append_pair("name", stream.as_str())
            .append_pair("wait", "true");
        url
    }
}

#[async_trait]
impl EventStore for HttpEventStore {
    async fn ingest(&self, stream: EventStream, record: Value) -> Result<IngestAck, DispatchError> {
        let response = self
            .client
            .post(self.stream_url(stream))
            .bearer_auth(&self.token)
            .json(&record)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY)
                .collect();
            warn!("Event store rejected {} record: {} {}", stream, status, body);
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let ack: IngestAck = response.json().await?;
        debug!(
            "Event store ingested into {}: {} ok, {} quarantined",
            stream, ack.successful_rows, ack.quarantined_rows
        );

        if ack.successful_rows == 0 && ack.quarantined_rows > 0 {
            warn!(
                "Event store quarantined {} record: {} row(s)",
                stream, ack.quarantined_rows
            );
            return Err(DispatchError::Quarantined {
                quarantined_rows: ack.quarantined_rows,
            });
        }
        Ok(ack)
    }
}
