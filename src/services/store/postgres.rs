//! PostgreSQL session store.

use super::SessionStore;
use crate::config::DatabaseConfig;
use crate::database::DbPool;
use crate::error::{Error, Result};
use crate::queries::conversation_states;
use crate::services::dialogue::DialogueState;
use async_trait::async_trait;
use secrecy::ExposeSecret;

/// Keeps states in the `conversation_states` table.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Connects to the configured database and applies pending migrations.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = DbPool::connect(config.connection_string().expose_secret()).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| Error::StoreUnavailable(format!("Migration failed: {}", e)))?;

        tracing::info!(host = %config.host, database = %config.database, "Session store connected");
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn get(&self, conversation_id: &str) -> Result<Option<DialogueState>> {
        let mut conn = self.pool.acquire().await?;
        match conversation_states::get_state(conn.as_mut(), conversation_id).await? {
            Some(raw) => DialogueState::from_persisted(&raw).map(Some),
            None => Ok(None),
        }
    }

    async fn set(&self, conversation_id: &str, state: DialogueState) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        conversation_states::upsert_state(conn.as_mut(), conversation_id, state.as_ref()).await
    }
}
