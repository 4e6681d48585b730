//! In-process session store backed by the TTL cache.

use super::SessionStore;
use crate::cache::Cache;
use crate::error::Result;
use crate::services::dialogue::DialogueState;
use async_trait::async_trait;

/// Cache key holding the state of a conversation.
pub fn state_key(conversation_id: &str) -> String {
    format!("dialogue_state:{}", conversation_id)
}

/// Keeps states in a [`Cache`]. With a TTL, idle conversations fall back to
/// `START` once their entry expires.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    cache: Cache<String>,
    ttl_seconds: Option<u64>,
}

impl MemoryStore {
    pub fn new(cache: Cache<String>, ttl_seconds: Option<u64>) -> Self {
        Self { cache, ttl_seconds }
    }

    /// The underlying cache, shared with every clone of this store.
    pub fn cache(&self) -> &Cache<String> {
        &self.cache
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get(&self, conversation_id: &str) -> Result<Option<DialogueState>> {
        match self.cache.get(&state_key(conversation_id)).await? {
            Some(raw) => DialogueState::from_persisted(&raw).map(Some),
            None => Ok(None),
        }
    }

    async fn set(&self, conversation_id: &str, state: DialogueState) -> Result<()> {
        let key = state_key(conversation_id);
        let value = state.to_string();
        match self.ttl_seconds {
            Some(ttl) => self.cache.set_ex(&key, value, ttl).await,
            None => self.cache.set(&key, value).await,
        }
    }
}
