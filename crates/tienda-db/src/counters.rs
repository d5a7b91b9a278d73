//! Durable counter store: one `id_sequences` row per namespace.

use async_trait::async_trait;
use sqlx::PgPool;
use tienda_core::{AppError, Config, CounterStore};

/// Postgres-backed [`CounterStore`].
///
/// `reserve` is a single atomic upsert, so concurrent processes sharing a
/// namespace never receive the same value. Requires the `id_sequences`
/// table from `migrations/0001_id_sequences.sql`.
#[derive(Clone)]
pub struct PgCounterStore {
    pool: PgPool,
}

impl PgCounterStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect using the configured `DATABASE_URL`.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let url = config
            .database_url
            .as_deref()
            .ok_or_else(|| AppError::Config("DATABASE_URL not configured".to_string()))?;
        let pool = PgPool::connect(url).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl CounterStore for PgCounterStore {
    #[tracing::instrument(skip(self), fields(db.table = "id_sequences"))]
    async fn reserve(&self, namespace: &str) -> Result<u64, AppError> {
        let (value,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO id_sequences (namespace, last_value)
            VALUES ($1, 1)
            ON CONFLICT (namespace)
            DO UPDATE SET last_value = id_sequences.last_value + 1
            RETURNING last_value
            "#,
        )
        .bind(namespace)
        .fetch_one(&self.pool)
        .await?;

        Ok(value as u64)
    }
}
