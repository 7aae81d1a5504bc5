//! DTOs for the link metadata endpoint.

use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::LinkSnapshot;

/// Full snapshot of a link after a create, update or delete.
#[derive(Debug, Deserialize, Validate)]
pub struct LinkMetadataRequest {
    #[validate(length(min = 1, max = 64))]
    pub link_id: String,

    #[validate(length(min = 1, max = 255))]
    pub domain: String,

    #[validate(length(min = 1, max = 190))]
    pub key: String,

    #[validate(url(message = "Invalid URL format"))]
    pub url: String,

    pub project_id: Option<String>,

    /// Emits a tombstone snapshot when true.
    #[serde(default)]
    pub deleted: bool,
}

impl LinkMetadataRequest {
    pub fn snapshot(&self) -> LinkSnapshot {
        LinkSnapshot::new(
            self.link_id.clone(),
            self.domain.clone(),
            self.key.clone(),
            self.url.clone(),
            self.project_id.clone().filter(|p| !p.is_empty()),
        )
    }
}
