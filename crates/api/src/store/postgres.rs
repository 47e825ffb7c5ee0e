//! `PostgreSQL` document store.
//!
//! Each collection is a table with the same shape:
//!
//! ```sql
//! id         UUID PRIMARY KEY
//! seq        BIGSERIAL (insertion order)
//! doc        JSONB NOT NULL
//! created_at TIMESTAMPTZ NOT NULL DEFAULT now()
//! ```
//!
//! Field filters compile to JSONB containment (`doc @> $filter`), which is
//! exact equality for scalar values. Unique fields are enforced by unique
//! expression indexes, see `crates/api/migrations/`.
//!
//! # Migrations
//!
//! Migrations are NOT run on server startup. Apply them with:
//! ```bash
//! cargo run -p repurpose-cli -- migrate
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use uuid::Uuid;

use super::{Collection, Document, DocumentStore, Filter, StoreError, take_id, with_id};

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Document store backed by `PostgreSQL` JSONB tables.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

type Row = (Uuid, Json<Document>);

fn select_sql(collection: Collection, limit_one: bool) -> String {
    format!(
        "SELECT id, doc FROM {} \
         WHERE ($1::uuid IS NULL OR id = $1) AND doc @> $2 \
         ORDER BY seq{}",
        collection.name(),
        if limit_one { " LIMIT 1" } else { "" }
    )
}

fn map_sqlx_error(collection: Collection, e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return StoreError::Conflict(format!(
            "{collection}: {}",
            db_err.constraint().unwrap_or("unique constraint")
        ));
    }
    StoreError::Unavailable(e.to_string())
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn insert(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> Result<Uuid, StoreError> {
        let id = take_id(&mut document)?.unwrap_or_else(Uuid::new_v4);
        let sql = format!(
            "INSERT INTO {} (id, doc) VALUES ($1, $2) RETURNING id",
            collection.name()
        );

        sqlx::query_scalar::<_, Uuid>(&sql)
            .bind(id)
            .bind(Json(Value::Object(document)))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(collection, e))
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Document, StoreError> {
        let sql = select_sql(collection, true);
        let row: Option<Row> = sqlx::query_as(&sql)
            .bind(filter.id())
            .bind(Json(Value::Object(filter.fields().clone())))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(collection, e))?;

        row.map(|(id, Json(doc))| with_id(id, doc))
            .ok_or(StoreError::NotFound)
    }

    async fn find_all(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError> {
        let sql = select_sql(collection, false);
        let rows: Vec<Row> = sqlx::query_as(&sql)
            .bind(filter.id())
            .bind(Json(Value::Object(filter.fields().clone())))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(collection, e))?;

        Ok(rows
            .into_iter()
            .map(|(id, Json(doc))| with_id(id, doc))
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}
