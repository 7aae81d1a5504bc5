//! Canonical analytics event records.
//!
//! Three event shapes are produced, each bound to its own stream in the event
//! store. Builders stamp the current UTC instant when called, so timestamps
//! reflect when the action happened rather than when the write landed.

pub mod click;
pub mod conversion;
pub mod link_metadata;

pub use click::ClickEvent;
pub use conversion::ConversionEvent;
pub use link_metadata::LinkMetadataEvent;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serializer;
use std::fmt;

/// Named stream in the event store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventStream {
    Clicks,
    LinksMetadata,
    Conversions,
}

impl EventStream {
    /// Stream name passed as the `name` query parameter of the ingestion API.
    pub fn as_str(self) -> &'static str {
        match self {
            EventStream::Clicks => "dub_click_events",
            EventStream::LinksMetadata => "dub_links_metadata",
            EventStream::Conversions => "dub_conversion_events",
        }
    }
}

impl fmt::Display for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serializes timestamps as RFC 3339 with millisecond precision and a `Z` suffix.
pub(crate) fn serialize_timestamp<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}
