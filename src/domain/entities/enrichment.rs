//! Enrichment data derived from an inbound request.
//!
//! Every field is a concrete string. Missing signals are replaced with the
//! sentinels below at construction time, never at serialization time.

/// Sentinel for any unresolved attribute.
pub const UNKNOWN: &str = "Unknown";

/// Device type reported when the user-agent gives no hint.
pub const DEFAULT_DEVICE: &str = "Desktop";

/// Referer domain and URL when no referer header was sent.
pub const DIRECT: &str = "(direct)";

fn or_unknown(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Geographic location of the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geo {
    pub country: String,
    pub city: String,
    pub region: String,
    pub latitude: String,
    pub longitude: String,
}

impl Geo {
    pub fn new(
        country: Option<String>,
        city: Option<String>,
        region: Option<String>,
        latitude: Option<String>,
        longitude: Option<String>,
    ) -> Self {
        Self {
            country: or_unknown(country),
            city: or_unknown(city),
            region: or_unknown(region),
            latitude: or_unknown(latitude),
            longitude: or_unknown(longitude),
        }
    }

    /// Fixed fixture used for requests served from a developer machine.
    pub fn loopback() -> Self {
        Self {
            country: "US".to_string(),
            city: "San Francisco".to_string(),
            region: "CA".to_string(),
            latitude: "37.7695".to_string(),
            longitude: "-122.385".to_string(),
        }
    }
}

impl Default for Geo {
    fn default() -> Self {
        Self::new(None, None, None, None, None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub kind: String,
    pub vendor: String,
    pub model: String,
}

impl Device {
    pub fn new(kind: Option<String>, vendor: Option<String>, model: Option<String>) -> Self {
        Self {
            kind: kind
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DEVICE.to_string()),
            vendor: or_unknown(vendor),
            model: or_unknown(model),
        }
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

/// Name and version pair used for browser, engine and OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Software {
    pub name: String,
    pub version: String,
}

impl Software {
    pub fn new(name: Option<String>, version: Option<String>) -> Self {
        Self {
            name: or_unknown(name),
            version: or_unknown(version),
        }
    }
}

impl Default for Software {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Referer {
    /// Bare host without `www.`.
    pub domain: String,
    pub url: String,
}

impl Referer {
    pub fn direct() -> Self {
        Self {
            domain: DIRECT.to_string(),
            url: DIRECT.to_string(),
        }
    }
}

impl Default for Referer {
    fn default() -> Self {
        Self::direct()
    }
}

/// Everything the click event needs beyond the caller-supplied identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub geo: Geo,
    pub device: Device,
    pub browser: Software,
    pub engine: Software,
    pub os: Software,
    pub cpu_architecture: String,
    /// Raw user-agent string, or [`UNKNOWN`].
    pub ua: String,
    /// Crawler verdict from the user-agent parser.
    pub is_bot: bool,
    pub referer: Referer,
}

impl Default for Enrichment {
    fn default() -> Self {
        Self {
            geo: Geo::default(),
            device: Device::default(),
            browser: Software::default(),
            engine: Software::default(),
            os: Software::default(),
            cpu_architecture: UNKNOWN.to_string(),
            ua: UNKNOWN.to_string(),
            is_bot: false,
            referer: Referer::default(),
        }
    }
}
