//! Conversion event: a business event attributed to an earlier click.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::serialize_timestamp;
use crate::domain::entities::ConversionInput;

/// Record written to the `dub_conversion_events` stream.
///
/// `click_id` refers to a click event but is not checked; the two streams are
/// only eventually consistent. `properties` is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionEvent {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub click_id: String,
    pub affiliate_id: String,
    pub event_name: String,
    pub properties: Map<String, Value>,
}

impl ConversionEvent {
    pub fn build(input: ConversionInput) -> Self {
        Self {
            timestamp: Utc::now(),
            click_id: input.click_id,
            affiliate_id: input.affiliate_id.unwrap_or_default(),
            event_name: input.event_name,
            properties: input.properties,
        }
    }
}
