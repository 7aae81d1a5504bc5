//! Request enrichment: geography, user-agent details and referer.

use std::sync::Arc;

use crate::application::services::user_agent::UserAgentParser;
use crate::domain::entities::{DeploymentEnv, Enrichment, Geo, InboundRequest, UNKNOWN};
use crate::utils::referer::normalize_referer;

/// Resolves a visitor's location for a request.
///
/// Only consulted when running hosted; local runs use [`Geo::loopback`].
pub trait GeoResolver: Send + Sync {
    fn resolve(&self, request: &InboundRequest) -> Geo;
}

/// Reads the geo annotation the edge platform attaches to every request.
///
/// City names arrive percent-encoded and are decoded here. Absent headers
/// become `Unknown`.
#[derive(Debug, Clone, Default)]
pub struct PlatformHeaderGeo;

impl PlatformHeaderGeo {
    pub const COUNTRY: &'static str = "x-vercel-ip-country";
    pub const CITY: &'static str = "x-vercel-ip-city";
    pub const REGION: &'static str = "x-vercel-ip-country-region";
    pub const LATITUDE: &'static str = "x-vercel-ip-latitude";
    pub const LONGITUDE: &'static str = "x-vercel-ip-longitude";

    pub fn new() -> Self {
        Self
    }
}

impl GeoResolver for PlatformHeaderGeo {
    fn resolve(&self, request: &InboundRequest) -> Geo {
        let header = |name: &str| request.header(name).map(str::to_string);
        let city = request
            .header(Self::CITY)
            .map(|raw| match urlencoding::decode(raw) {
                Ok(decoded) => decoded.into_owned(),
                Err(_) => raw.to_string(),
            });

        Geo::new(
            header(Self::COUNTRY),
            city,
            header(Self::REGION),
            header(Self::LATITUDE),
            header(Self::LONGITUDE),
        )
    }
}

/// Builds the [`Enrichment`] for a click. Never fails: anything it cannot
/// resolve is replaced by a sentinel.
pub struct RequestEnricher {
    env: DeploymentEnv,
    geo: Arc<dyn GeoResolver>,
    user_agents: UserAgentParser,
}

impl RequestEnricher {
    pub fn new(env: DeploymentEnv, geo: Arc<dyn GeoResolver>) -> Self {
        Self {
            env,
            geo,
            user_agents: UserAgentParser::new(),
        }
    }

    /// Enricher reading platform geo headers when hosted.
    pub fn with_platform_geo(env: DeploymentEnv) -> Self {
        Self::new(env, Arc::new(PlatformHeaderGeo::new()))
    }

    pub fn enrich(&self, request: &InboundRequest) -> Enrichment {
        let geo = match self.env {
            DeploymentEnv::Hosted => self.geo.resolve(request),
            DeploymentEnv::Local => Geo::loopback(),
        };

        let ua = request.user_agent();
        let details = self.user_agents.parse(ua);

        Enrichment {
            geo,
            device: details.device,
            browser: details.browser,
            engine: details.engine,
            os: details.os,
            cpu_architecture: details
                .cpu_architecture
                .unwrap_or_else(|| UNKNOWN.to_string()),
            ua: ua.unwrap_or(UNKNOWN).to_string(),
            is_bot: details.is_bot,
            referer: normalize_referer(request.referer()),
        }
    }
}
