//! Response returned after a synchronous event store write.

use serde::Serialize;

use crate::domain::events::EventStream;
use crate::domain::repositories::IngestAck;

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub stream: &'static str,
    pub successful_rows: u64,
    pub quarantined_rows: u64,
}

impl IngestResponse {
    pub fn new(stream: EventStream, ack: IngestAck) -> Self {
        Self {
            stream: stream.as_str(),
            successful_rows: ack.successful_rows,
            quarantined_rows: ack.quarantined_rows,
        }
    }
}
