//! Query parameters of the redirect endpoint.

use serde::Deserialize;
use serde_with::{NoneAsEmptyString, serde_as};
use validator::Validate;

use crate::domain::entities::ClickInput;

/// Query string of `GET /r/{resource_id}`.
///
/// `via` carries the affiliate that referred the visitor. Empty `click_id` and
/// `via` values count as absent.
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RedirectQuery {
    #[validate(url(message = "Invalid URL format"))]
    pub url: Option<String>,

    /// Set when `resource_id` is a domain id rather than a link id.
    #[serde(default)]
    pub root: bool,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[validate(length(min = 1, max = 64))]
    pub click_id: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[validate(length(min = 1, max = 128))]
    pub via: Option<String>,
}

impl RedirectQuery {
    pub fn into_click_input(self, resource_id: String) -> ClickInput {
        ClickInput {
            resource_id,
            url: self.url,
            click_id: self.click_id,
            root: self.root,
            affiliate_id: self.via,
        }
    }
}
