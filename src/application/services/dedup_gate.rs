//! Per-visitor, per-resource click deduplication.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::entities::{DeploymentEnv, IdentityToken};
use crate::infrastructure::counter::CounterStore;

/// Length of one dedup window.
pub const DEDUP_WINDOW: Duration = Duration::from_secs(60 * 60);

/// Clicks admitted per identity and resource in one window.
///
/// Two rather than one so a browser prefetch followed by the real navigation
/// still counts the real click.
pub const DEDUP_CAP: u64 = 2;

/// Verdict of the dedup gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub admitted: bool,
}

impl Admission {
    pub const ADMITTED: Admission = Admission { admitted: true };
    pub const SUPPRESSED: Admission = Admission { admitted: false };
}

/// Caps clicks from one identity to one resource at [`DEDUP_CAP`] per [`DEDUP_WINDOW`].
///
/// Only enforced when hosted. Counter store failures admit the click: losing
/// some dedup accuracy is preferable to losing clicks.
pub struct DedupGate {
    store: Arc<dyn CounterStore>,
    env: DeploymentEnv,
}

impl DedupGate {
    pub fn new(store: Arc<dyn CounterStore>, env: DeploymentEnv) -> Self {
        Self { store, env }
    }

    fn key(identity: &IdentityToken, resource_id: &str) -> String {
        format!("recordClick:{}:{}", identity, resource_id)
    }

    pub async fn admit(&self, identity: &IdentityToken, resource_id: &str) -> Admission {
        if !self.env.is_hosted() {
            return Admission::ADMITTED;
        }

        let key = Self::key(identity, resource_id);
        match self
            .store
            .increment_and_check(&key, DEDUP_WINDOW, DEDUP_CAP)
            .await
        {
            Ok(true) => Admission::ADMITTED,
            Ok(false) => {
                debug!("Dedup window exceeded for resource {}", resource_id);
                Admission::SUPPRESSED
            }
            Err(e) => {
                warn!(
                    "Dedup store '{}' unavailable, admitting click for {}: {}",
                    self.store.name(),
                    resource_id,
                    e
                );
                Admission::ADMITTED
            }
        }
    }
}
