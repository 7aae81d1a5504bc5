//! Event store trait: append-only ingestion of analytics records.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::events::EventStream;
use crate::error::DispatchError;

/// Acknowledgement returned by the event store after a synchronous ingest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestAck {
    #[serde(default)]
    pub successful_rows: u64,
    #[serde(default)]
    pub quarantined_rows: u64,
}

/// Append-only analytics event store.
///
/// One JSON record per call. Implementations wait for the store to confirm
/// ingestion before returning and never retry.
///
/// # Implementations
///
/// - [`crate::infrastructure::event_store::HttpEventStore`] - HTTP ingestion API
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends one record to the named stream.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::EventStore`] on transport failures and
    /// [`DispatchError::Rejected`] when the store answers with an error status.
    /// An ack with every row quarantined is [`DispatchError::Quarantined`].
    async fn ingest(&self, stream: EventStream, record: Value) -> Result<IngestAck, DispatchError>;
}
