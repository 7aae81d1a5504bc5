//! DTOs for the conversion endpoint.

use serde::Deserialize;
use serde_json::{Map, Value};
use validator::Validate;

use crate::domain::entities::ConversionInput;

/// A business event attributed to an earlier click.
#[derive(Debug, Deserialize, Validate)]
pub struct ConversionRequest {
    #[validate(length(min = 1, max = 128))]
    pub event_name: String,

    #[validate(length(min = 1, max = 64))]
    pub click_id: String,

    pub affiliate_id: Option<String>,

    /// Arbitrary JSON object, stored as sent.
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl From<ConversionRequest> for ConversionInput {
    fn from(req: ConversionRequest) -> Self {
        ConversionInput {
            event_name: req.event_name,
            properties: req.properties,
            click_id: req.click_id,
            affiliate_id: req.affiliate_id.filter(|a| !a.is_empty()),
        }
    }
}
