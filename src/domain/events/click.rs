//! Click event: one redirect served to one visitor.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::serialize_timestamp;
use crate::domain::entities::{ClickInput, Enrichment, IdentityToken};
use crate::utils::click_id::generate_click_id;

/// Enriched click record written to the `dub_click_events` stream.
///
/// No field is optional: absent caller values become empty strings and
/// unresolved enrichment values carry their sentinels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClickEvent {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub identity_hash: String,
    pub click_id: String,
    pub link_id: String,
    pub alias_link_id: String,
    pub affiliate_id: String,
    pub url: String,
    pub country: String,
    pub city: String,
    pub region: String,
    pub latitude: String,
    pub longitude: String,
    pub device: String,
    pub device_vendor: String,
    pub device_model: String,
    pub browser: String,
    pub browser_version: String,
    pub engine: String,
    pub engine_version: String,
    pub os: String,
    pub os_version: String,
    pub cpu_architecture: String,
    pub ua: String,
    pub bot: bool,
    pub referer: String,
    pub referer_url: String,
}

impl ClickEvent {
    /// Builds a click event stamped with the current instant.
    ///
    /// A click id is generated when the input does not carry one.
    pub fn build(input: ClickInput, enrichment: Enrichment, identity: IdentityToken) -> Self {
        let Enrichment {
            geo,
            device,
            browser,
            engine,
            os,
            cpu_architecture,
            ua,
            is_bot,
            referer,
        } = enrichment;

        Self {
            timestamp: Utc::now(),
            identity_hash: identity.into_inner(),
            click_id: input
                .click_id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(generate_click_id),
            link_id: input.resource_id,
            alias_link_id: String::new(),
            affiliate_id: input.affiliate_id.unwrap_or_default(),
            url: input.url.unwrap_or_default(),
            country: geo.country,
            city: geo.city,
            region: geo.region,
            latitude: geo.latitude,
            longitude: geo.longitude,
            device: device.kind,
            device_vendor: device.vendor,
            device_model: device.model,
            browser: browser.name,
            browser_version: browser.version,
            engine: engine.name,
            engine_version: engine.version,
            os: os.name,
            os_version: os.version,
            cpu_architecture,
            ua,
            bot: is_bot,
            referer: referer.domain,
            referer_url: referer.url,
        }
    }
}
