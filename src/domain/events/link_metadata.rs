//! Link metadata event: full snapshot of a link for the catalog side.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use super::serialize_timestamp;
use crate::domain::entities::LinkSnapshot;

fn serialize_flag<S>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u8(u8::from(*flag))
}

/// Record written to the `dub_links_metadata` stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkMetadataEvent {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub link_id: String,
    pub domain: String,
    pub key: String,
    pub url: String,
    pub project_id: String,
    /// `0` or `1` on the wire.
    #[serde(serialize_with = "serialize_flag")]
    pub deleted: bool,
}

impl LinkMetadataEvent {
    pub fn build(link: &LinkSnapshot, deleted: bool) -> Self {
        Self {
            timestamp: Utc::now(),
            link_id: link.id.clone(),
            domain: link.domain.clone(),
            key: link.key.clone(),
            url: link.url.clone(),
            project_id: link.project_id.clone().unwrap_or_default(),
            deleted,
        }
    }
}
