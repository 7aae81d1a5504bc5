//! PostgreSQL implementation of the counter repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::CounterRepository;
use crate::error::DispatchError;

/// PostgreSQL repository for click and usage counters.
///
/// Expects `domains`, `links` and `projects` tables with `clicks`,
/// `last_clicked` and `usage` columns. Each method is one atomic statement.
pub struct PgCounterRepository {
    pool: Arc<PgPool>,
}

impl PgCounterRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CounterRepository for PgCounterRepository {
    async fn increment_domain_clicks(&self, domain_id: &str) -> Result<u64, DispatchError> {
        let result = sqlx::query(
            r#"
            UPDATE domains
            SET clicks = clicks + 1, last_clicked = NOW()
            WHERE id = $1
            "#,
        )
        .bind(domain_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn increment_link_clicks(&self, link_id: &str) -> Result<u64, DispatchError> {
        let result = sqlx::query(
            r#"
            UPDATE links
            SET clicks = clicks + 1, last_clicked = NOW()
            WHERE id = $1
            "#,
        )
        .bind(link_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn increment_project_usage(&self, link_id: &str) -> Result<u64, DispatchError> {
        let result = sqlx::query(
            r#"
            UPDATE projects p
            SET usage = p.usage + 1
            FROM links l
            WHERE p.id = l.project_id AND l.id = $1
            "#,
        )
        .bind(link_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
