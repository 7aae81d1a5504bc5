//! Repository trait for relational click and usage counters.

use async_trait::async_trait;

use crate::error::DispatchError;

/// Atomic counter updates in the relational store.
///
/// Every method is a single `SET x = x + 1` statement; callers never read a
/// counter back, so concurrent requests commute.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCounterRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterRepository: Send + Sync {
    /// Increments a domain's click counter and stamps its last-click time.
    ///
    /// Returns the number of rows updated (0 when the domain does not exist).
    async fn increment_domain_clicks(&self, domain_id: &str) -> Result<u64, DispatchError>;

    /// Increments a link's click counter and stamps its last-click time.
    async fn increment_link_clicks(&self, link_id: &str) -> Result<u64, DispatchError>;

    /// Increments the usage counter of the project owning the link.
    async fn increment_project_usage(&self, link_id: &str) -> Result<u64, DispatchError>;

    /// Checks that the store is reachable.
    async fn health_check(&self) -> bool;
}
