//! Event dispatcher: the shell around the dialogue engine.
//!
//! For each inbound event the dispatcher normalizes it, loads the
//! conversation's state, runs the engine and persists the new state. A
//! failed event leaves the persisted state untouched.

use crate::error::{Error, Result};
use crate::models::requests::{InboundEventRequest, InboundEventResponse};
use crate::services::catalog::{CatalogClient, CredentialProvider};
use crate::services::dialogue::{DialogueEngine, DialogueState, Event};
use crate::services::locks::ConversationLocks;
use crate::services::store::SessionStore;
use crate::validation::validate_conversation_id;
use std::sync::Arc;
use uuid::Uuid;

/// Turns a request into a conversation id and a dialogue event.
///
/// # Errors
///
/// `Error::MalformedEvent` for an empty conversation id or when the request
/// does not carry exactly one of `text` and `payload`.
pub fn normalize(request: InboundEventRequest) -> Result<(String, Event)> {
    let conversation_id = validate_conversation_id(&request.conversation_id)?;

    let event = match (request.text, request.payload) {
        (Some(text), None) => Event::message(text),
        (None, Some(payload)) => Event::selection(payload),
        (Some(_), Some(_)) => {
            return Err(Error::MalformedEvent(
                "event carries both text and payload".to_string(),
            ));
        }
        (None, None) => {
            return Err(Error::MalformedEvent(
                "event carries neither text nor payload".to_string(),
            ));
        }
    };

    Ok((conversation_id, event))
}

pub struct Dispatcher {
    engine: DialogueEngine,
    store: Arc<dyn SessionStore>,
    catalog: Arc<dyn CatalogClient>,
    credentials: Arc<dyn CredentialProvider>,
    locks: Option<ConversationLocks>,
}

impl Dispatcher {
    pub fn new(
        engine: DialogueEngine,
        store: Arc<dyn SessionStore>,
        catalog: Arc<dyn CatalogClient>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        let locks = engine
            .settings()
            .serialize_conversations
            .then(ConversationLocks::new);

        Self {
            engine,
            store,
            catalog,
            credentials,
            locks,
        }
    }

    /// Processes one inbound event to completion.
    ///
    /// # Errors
    ///
    /// Returns the first failure of normalization, the store or the engine.
    /// The conversation keeps its previous state in every error case.
    #[tracing::instrument(
        name = "dispatch",
        skip_all,
        fields(conversation_id = %request.conversation_id, event_id = %Uuid::now_v7())
    )]
    pub async fn dispatch(&self, request: InboundEventRequest) -> Result<InboundEventResponse> {
        let result = match normalize(request) {
            Ok((conversation_id, event)) => self.dispatch_serialized(&conversation_id, &event).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            match e {
                Error::MalformedEvent(_) | Error::NotFound(_) => {
                    tracing::warn!(error = %e, code = e.code(), "Event rejected");
                }
                _ => {
                    tracing::error!(error = %e, code = e.code(), "Event processing failed");
                }
            }
        }

        result
    }

    async fn dispatch_serialized(
        &self,
        conversation_id: &str,
        event: &Event,
    ) -> Result<InboundEventResponse> {
        let Some(locks) = &self.locks else {
            return self.process(conversation_id, event).await;
        };

        let _guard = locks.acquire(conversation_id).await;
        self.process(conversation_id, event).await
    }

    async fn process(&self, conversation_id: &str, event: &Event) -> Result<InboundEventResponse> {
        let current = self.load_state(conversation_id).await?;

        let transition = self
            .engine
            .handle(
                conversation_id,
                current,
                event,
                self.catalog.as_ref(),
                self.credentials.as_ref(),
            )
            .await?;

        self.store.set(conversation_id, transition.next).await?;

        Ok(InboundEventResponse {
            state: transition.next,
            reply: transition.reply,
        })
    }

    /// Loads the current state; an unrecognised persisted value restarts the
    /// conversation.
    async fn load_state(&self, conversation_id: &str) -> Result<DialogueState> {
        match self.store.get(conversation_id).await {
            Ok(Some(state)) => Ok(state),
            Ok(None) => Ok(DialogueState::initial()),
            Err(Error::UnknownState(raw)) => {
                tracing::warn!(persisted = %raw, "Unknown persisted state, restarting conversation");
                Ok(DialogueState::initial())
            }
            Err(e) => Err(e),
        }
    }
}
