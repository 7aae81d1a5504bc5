//! Link snapshot fields used for link-metadata events.

/// Catalog view of a short link at the moment it changed.
///
/// Emitted whole on every create, update or delete; consumers upsert by the
/// latest timestamp, so partial snapshots are not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSnapshot {
    pub id: String,
    pub domain: String,
    /// Short key (slug) under the domain.
    pub key: String,
    pub url: String,
    pub project_id: Option<String>,
}

impl LinkSnapshot {
    pub fn new(
        id: impl Into<String>,
        domain: impl Into<String>,
        key: impl Into<String>,
        url: impl Into<String>,
        project_id: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            domain: domain.into(),
            key: key.into(),
            url: url.into(),
            project_id,
        }
    }
}
