//! Visitor identity derivation for click deduplication.

use sha2::{Digest, Sha256};

use crate::domain::entities::{IdentityToken, InboundRequest};

/// Substitute for the IP when the request carries none.
const ANONYMOUS: &str = "anonymous";

/// Derives a stable, opaque identity token from the visitor's IP and user-agent.
///
/// The same IP and user-agent always map to the same token. Only the SHA-256
/// hex digest leaves this type; raw values are never stored.
///
/// Forwarding headers are read only when `behind_proxy` is set. Otherwise the
/// socket peer is the IP, so a client cannot mint a fresh identity per request.
#[derive(Debug, Clone, Default)]
pub struct IdentityResolver {
    behind_proxy: bool,
}

impl IdentityResolver {
    pub fn new(behind_proxy: bool) -> Self {
        Self { behind_proxy }
    }

    /// Resolves the identity token for a request. Never fails.
    pub fn resolve(&self, request: &InboundRequest) -> IdentityToken {
        let ip = request
            .client_ip(self.behind_proxy)
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| ANONYMOUS.to_string());
        let ua = request.user_agent().unwrap_or_default();

        let mut hasher = Sha256::new();
        hasher.update(ip.as_bytes());
        hasher.update([0u8]);
        hasher.update(ua.as_bytes());

        IdentityToken::new(hex::encode(hasher.finalize()))
    }
}
