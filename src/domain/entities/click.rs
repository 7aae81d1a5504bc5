//! Caller-supplied identifiers for a click.

/// What the redirect layer knows about a click before enrichment.
///
/// `resource_id` is a link id, or a domain id when `root` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickInput {
    pub resource_id: String,
    /// Destination the visitor was sent to.
    pub url: Option<String>,
    /// Pre-assigned click id; generated during build when absent.
    pub click_id: Option<String>,
    /// True when the click hit a bare domain rather than a link.
    pub root: bool,
    pub affiliate_id: Option<String>,
}

impl ClickInput {
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_click_id(mut self, click_id: impl Into<String>) -> Self {
        self.click_id = Some(click_id.into());
        self
    }

    pub fn with_affiliate(mut self, affiliate_id: impl Into<String>) -> Self {
        self.affiliate_id = Some(affiliate_id.into());
        self
    }

    pub fn root(mut self, root: bool) -> Self {
        self.root = root;
        self
    }
}

/// A business event to attribute to a previous click.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionInput {
    pub event_name: String,
    pub properties: serde_json::Map<String, serde_json::Value>,
    pub click_id: String,
    pub affiliate_id: Option<String>,
}
