//! Referer header normalization.

use url::Url;

use crate::domain::entities::{DIRECT, Referer};

/// Extracts the bare host of a URL without a leading `www.`.
///
/// Returns `None` when the input is not an absolute URL with a host.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(domain_without_www("https://www.example.com/page").as_deref(), Some("example.com"));
/// assert_eq!(domain_without_www("not a url"), None);
/// ```
pub fn domain_without_www(input: &str) -> Option<String> {
    let url = Url::parse(input.trim()).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

/// Builds the referer pair stored on click events.
///
/// - absent header: domain and URL are both `(direct)`
/// - unparsable header: domain is `(direct)`, URL keeps the raw value
pub fn normalize_referer(header: Option<&str>) -> Referer {
    match header {
        Some(raw) => Referer {
            domain: domain_without_www(raw).unwrap_or_else(|| DIRECT.to_string()),
            url: raw.to_string(),
        },
        None => Referer::direct(),
    }
}
