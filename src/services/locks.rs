//! Per-conversation serialization.
//!
//! Events of the same conversation are processed one at a time so that the
//! read-handle-write cycle of one event never interleaves with another.
//! Different conversations proceed in parallel.

use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per conversation with an event in flight.
pub struct ConversationLocks {
    locks: scc::HashMap<String, Arc<Mutex<()>>>,
}

/// Holds a conversation's lock. Dropping it, including when the owning
/// future is cancelled, unlocks and forgets the conversation once nobody
/// else is waiting on it.
pub struct ConversationGuard<'a> {
    locks: &'a ConversationLocks,
    conversation_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ConversationGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map holds it: no event is waiting for this conversation
        let _ = self
            .locks
            .locks
            .remove_if_sync(&self.conversation_id, |lock| Arc::strong_count(lock) == 1);
    }
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self {
            locks: scc::HashMap::new(),
        }
    }

    /// Waits until no other event of this conversation is being processed.
    pub async fn acquire(&self, conversation_id: &str) -> ConversationGuard<'_> {
        let lock = self
            .locks
            .entry_async(conversation_id.to_string())
            .await
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .get()
            .clone();

        // Built before waiting so a waiter cancelled here still cleans up
        let mut held = ConversationGuard {
            locks: self,
            conversation_id: conversation_id.to_string(),
            guard: None,
        };
        held.guard = Some(lock.lock_owned().await);
        held
    }

    /// Number of conversations currently holding or waiting for a lock.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ConversationLocks {
    fn default() -> Self {
        Self::new()
    }
}
