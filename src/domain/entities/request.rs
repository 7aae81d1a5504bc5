//! Inbound request snapshot handed to the ingestion pipeline.

use axum::http::{HeaderMap, Uri, header};
use std::fmt;
use std::net::IpAddr;

/// The parts of an inbound redirect request the pipeline looks at.
///
/// Captured from the HTTP layer once, then shared read-only by the bot filter,
/// identity resolver and enricher. Owning the data lets the dispatcher move it
/// into a spawned task after the redirect response has been sent.
#[derive(Debug, Clone, Default)]
pub struct InboundRequest {
    pub headers: HeaderMap,
    pub uri: Uri,
    /// Socket peer address of the connection.
    pub peer_ip: Option<IpAddr>,
}

impl InboundRequest {
    pub fn new(headers: HeaderMap, uri: Uri, peer_ip: Option<IpAddr>) -> Self {
        Self {
            headers,
            uri,
            peer_ip,
        }
    }

    fn header_str(&self, name: impl header::AsHeaderName) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.header_str(header::USER_AGENT)
    }

    pub fn referer(&self) -> Option<&str> {
        self.header_str(header::REFERER)
    }

    /// Returns a raw header value by name, ignoring empty or non-UTF-8 values.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_str(name)
    }

    /// Returns the first value of a query parameter, percent-decoded.
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.uri.query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    /// Resolves the client IP.
    ///
    /// With `trust_forwarded`, the first `X-Forwarded-For` entry wins, then
    /// `X-Real-IP`, then the socket peer. Without it the forwarding headers are
    /// client-controlled and only the socket peer is used.
    pub fn client_ip(&self, trust_forwarded: bool) -> Option<IpAddr> {
        if !trust_forwarded {
            return self.peer_ip;
        }

        if let Some(forwarded) = self.header_str("x-forwarded-for")
            && let Some(ip) = forwarded
                .split(',')
                .next()
                .and_then(|first| first.trim().parse().ok())
        {
            return Some(ip);
        }

        if let Some(ip) = self
            .header_str("x-real-ip")
            .and_then(|v| v.parse().ok())
        {
            return Some(ip);
        }

        self.peer_ip
    }
}

/// Opaque, privacy-preserving visitor identity used as the dedup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityToken(String);

impl IdentityToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
