//! User-agent parsing into device, browser, engine, OS and CPU tuples.
//!
//! Browser, OS and category come from `woothee`. Engine, CPU architecture and
//! device vendor/model are read from well-known UA tokens, since woothee does
//! not report them.

use regex::Regex;
use std::sync::LazyLock;
use woothee::parser::Parser;

use crate::domain::entities::{Device, Software};

/// Placeholder woothee uses for undetected values.
const WOOTHEE_UNKNOWN: &str = "UNKNOWN";

static TRIDENT: LazyLock<Regex> = LazyLock::new(|| compile(r"Trident/([\d.]+)"));
static EDGE_HTML: LazyLock<Regex> = LazyLock::new(|| compile(r"Edge/([\d.]+)"));
static BLINK: LazyLock<Regex> = LazyLock::new(|| compile(r"(?:Chrome|Chromium|CriOS)/([\d.]+)"));
static WEBKIT: LazyLock<Regex> = LazyLock::new(|| compile(r"AppleWebKit/([\d.]+)"));
static PRESTO: LazyLock<Regex> = LazyLock::new(|| compile(r"Presto/([\d.]+)"));
static GECKO: LazyLock<Regex> = LazyLock::new(|| compile(r"rv:([\d.]+)\) Gecko/"));

static CPU_AMD64: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(?:x86_64|x86-64|x64|win64|wow64|amd64)\b"));
static CPU_ARM64: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\b(?:aarch64|arm64)\b"));
static CPU_ARM: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\barm(?:v\d+l?)?\b"));
static CPU_IA32: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\b(?:i[3-6]86|x86)\b"));

static SAMSUNG: LazyLock<Regex> = LazyLock::new(|| compile(r"\b(SM-[A-Z0-9]+|GT-[A-Z0-9]+)"));
static PIXEL: LazyLock<Regex> = LazyLock::new(|| compile(r"\b((?:Pixel|Nexus)[^;)]*?)(?: Build|;|\))"));
static HUAWEI: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\bHUAWEI[ _-]?([^;)]+?)(?: Build|;|\))"));
static XIAOMI: LazyLock<Regex> = LazyLock::new(|| compile(r"\b((?:Redmi|POCO|Mi) [^;)]+?)(?: Build|;|\))"));
static ANDROID_MODEL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Android [\d.]+; (?:[a-z]{2}[-_][a-zA-Z]{2}; )?([^;)]+?)(?: Build|\))"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("user-agent pattern is valid")
}

fn known(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value == WOOTHEE_UNKNOWN {
        None
    } else {
        Some(value.to_string())
    }
}

fn capture(re: &Regex, ua: &str) -> Option<String> {
    re.captures(ua)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parsed user-agent with sentinels already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgentDetails {
    pub device: Device,
    pub browser: Software,
    pub engine: Software,
    pub os: Software,
    pub cpu_architecture: Option<String>,
    /// woothee classified the agent as a crawler.
    pub is_bot: bool,
}

/// Parses user-agent strings. Cheap to clone, safe to share.
#[derive(Debug, Clone, Default)]
pub struct UserAgentParser;

impl UserAgentParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, ua: Option<&str>) -> UserAgentDetails {
        let Some(ua) = ua.filter(|ua| !ua.trim().is_empty()) else {
            return UserAgentDetails {
                device: Device::default(),
                browser: Software::default(),
                engine: Software::default(),
                os: Software::default(),
                cpu_architecture: None,
                is_bot: false,
            };
        };

        let parsed = Parser::new().parse(ua);
        let (browser, os, category) = match &parsed {
            Some(r) => (
                Software::new(known(&r.name), known(&r.version)),
                Software::new(known(&r.os), known(&r.os_version)),
                &*r.category,
            ),
            None => (Software::default(), Software::default(), WOOTHEE_UNKNOWN),
        };

        let (vendor, model) = device_vendor_model(ua);

        UserAgentDetails {
            device: Device::new(device_type(ua, category), vendor, model),
            browser,
            engine: engine(ua),
            os,
            cpu_architecture: cpu_architecture(ua),
            is_bot: category == "crawler",
        }
    }
}

/// Maps woothee's category plus a few UA markers onto a capitalized device type.
///
/// `None` means "no hint"; the caller falls back to `Desktop`.
fn device_type(ua: &str, category: &str) -> Option<String> {
    let kind = if ua.contains("iPad")
        || ua.contains("Tablet")
        || (ua.contains("Android") && !ua.contains("Mobile") && category == "smartphone")
    {
        "Tablet"
    } else if ua.contains("SmartTV") || ua.contains("SMART-TV") {
        "Smarttv"
    } else {
        match category {
            "smartphone" | "mobilephone" => "Mobile",
            "appliance" => "Console",
            _ => return None,
        }
    };
    Some(kind.to_string())
}

fn device_vendor_model(ua: &str) -> (Option<String>, Option<String>) {
    let apple = |model: &str| (Some("Apple".to_string()), Some(model.to_string()));

    if ua.contains("iPhone") {
        return apple("iPhone");
    }
    if ua.contains("iPad") {
        return apple("iPad");
    }
    if ua.contains("Macintosh") {
        return apple("Macintosh");
    }
    if let Some(model) = capture(&SAMSUNG, ua) {
        return (Some("Samsung".to_string()), Some(model));
    }
    if let Some(model) = capture(&PIXEL, ua) {
        return (Some("Google".to_string()), Some(model));
    }
    if let Some(model) = capture(&HUAWEI, ua) {
        return (Some("Huawei".to_string()), Some(model));
    }
    if let Some(model) = capture(&XIAOMI, ua) {
        return (Some("Xiaomi".to_string()), Some(model));
    }
    if ua.contains("PlayStation") {
        return (Some("Sony".to_string()), Some("PlayStation".to_string()));
    }
    if ua.contains("Xbox") {
        return (Some("Microsoft".to_string()), Some("Xbox".to_string()));
    }
    if ua.contains("Nintendo") {
        return (Some("Nintendo".to_string()), None);
    }

    (None, capture(&ANDROID_MODEL, ua))
}

fn engine(ua: &str) -> Software {
    let (name, re): (&str, &Regex) = if TRIDENT.is_match(ua) {
        ("Trident", &*TRIDENT)
    } else if EDGE_HTML.is_match(ua) {
        ("EdgeHTML", &*EDGE_HTML)
    } else if BLINK.is_match(ua) {
        ("Blink", &*BLINK)
    } else if WEBKIT.is_match(ua) {
        ("WebKit", &*WEBKIT)
    } else if PRESTO.is_match(ua) {
        ("Presto", &*PRESTO)
    } else if GECKO.is_match(ua) {
        ("Gecko", &*GECKO)
    } else {
        return Software::default();
    };

    Software::new(Some(name.to_string()), capture(re, ua))
}

fn cpu_architecture(ua: &str) -> Option<String> {
    let arch = if CPU_AMD64.is_match(ua) {
        "amd64"
    } else if CPU_ARM64.is_match(ua) {
        "arm64"
    } else if CPU_ARM.is_match(ua) {
        "arm"
    } else if CPU_IA32.is_match(ua) {
        "ia32"
    } else {
        return None;
    };
    Some(arch.to_string())
}
