//! PostgreSQL session store.
//!
//! Each chat's session is one row holding the JSON-encoded session. Updates lock the row
//! with `SELECT ... FOR UPDATE` inside a transaction, so concurrent updates of the same
//! chat are serialized and a failed mutation rolls back.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::PgPool;
use tracing::{debug, info};

use crate::errors::TrainerResult;
use crate::session::Session;
use crate::session_store::{SessionKey, SessionMutation, SessionStore};

/// Initialize the database schema
pub async fn init_database_schema(pool: &PgPool) -> Result<()> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS sessions (
            chat_id BIGINT PRIMARY KEY,
            data TEXT NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create sessions table")?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// Session store backed by the `sessions` table
#[derive(Debug, Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and make sure the schema exists
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        init_database_schema(&pool).await?;
        Ok(Self::new(pool))
    }
}

fn decode(data: Option<String>) -> TrainerResult<Session> {
    match data {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Session::default()),
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn load(&self, key: SessionKey) -> TrainerResult<Session> {
        let data: Option<String> =
            sqlx::query_scalar("SELECT data FROM sessions WHERE chat_id = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        decode(data)
    }

    async fn update(&self, key: SessionKey, mutate: SessionMutation<'_>) -> TrainerResult<()> {
        let mut tx = self.pool.begin().await?;

        // Make sure a row exists so the lock below always has something to hold
        sqlx::query("INSERT INTO sessions (chat_id, data) VALUES ($1, '{}') ON CONFLICT (chat_id) DO NOTHING")
            .bind(key)
            .execute(&mut *tx)
            .await?;

        let data: String =
            sqlx::query_scalar("SELECT data FROM sessions WHERE chat_id = $1 FOR UPDATE")
                .bind(key)
                .fetch_one(&mut *tx)
                .await?;

        let mut session = decode(Some(data))?;
        // Dropping the transaction on error rolls it back
        mutate(&mut session)?;

        sqlx::query("UPDATE sessions SET data = $2, updated_at = NOW() WHERE chat_id = $1")
            .bind(key)
            .bind(serde_json::to_string(&session)?)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(chat_id = key, words = session.words.len(), "Session row updated");
        Ok(())
    }
}
