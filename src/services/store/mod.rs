//! Per-conversation dialogue state persistence.
//!
//! A store keeps exactly one [`DialogueState`] per conversation id, written
//! as its upper snake case name. Reads and writes are independent calls; the
//! dispatcher reads once and writes once per event.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::error::Result;
use crate::services::dialogue::DialogueState;
use async_trait::async_trait;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the persisted state, or `None` for a conversation never seen.
    ///
    /// # Errors
    ///
    /// `Error::UnknownState` when the persisted value is not a state name,
    /// `Error::StoreUnavailable` when the store cannot be read.
    async fn get(&self, conversation_id: &str) -> Result<Option<DialogueState>>;

    /// Replaces the persisted state of a conversation.
    async fn set(&self, conversation_id: &str, state: DialogueState) -> Result<()>;
}
