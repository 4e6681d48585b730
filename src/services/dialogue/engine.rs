//! The dialogue engine: one event in, one transition out.

use super::event::Event;
use super::state::DialogueState;
use super::states::{StateHandlerRegistry, TransitionContext};
use super::transition::{Transition, is_allowed};
use crate::config::DialogueConfig;
use crate::error::{Error, Result};
use crate::services::catalog::{CatalogClient, CredentialProvider};

/// Maps (current state, event) to the next state and reply.
///
/// The engine holds no per-conversation data; the caller loads the current
/// state and persists the returned one.
pub struct DialogueEngine {
    handlers: StateHandlerRegistry,
    settings: DialogueConfig,
}

impl DialogueEngine {
    pub fn new(settings: DialogueConfig) -> Self {
        Self {
            handlers: StateHandlerRegistry::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &DialogueConfig {
        &self.settings
    }

    /// Handles one event.
    ///
    /// The reset command is processed as if the conversation were in
    /// `START`, whatever its current state.
    ///
    /// # Errors
    ///
    /// Any handler failure is returned unchanged; the caller must then keep
    /// the previous state.
    pub async fn handle(
        &self,
        conversation_id: &str,
        current: DialogueState,
        event: &Event,
        catalog: &dyn CatalogClient,
        credentials: &dyn CredentialProvider,
    ) -> Result<Transition> {
        let from = if event.is_reset(&self.settings.reset_command) {
            DialogueState::Start
        } else {
            current
        };

        let ctx = TransitionContext {
            conversation_id,
            catalog,
            credentials,
            settings: &self.settings,
        };

        let transition = self
            .handlers
            .get_handler(from)
            .handle_event(event, &ctx)
            .await?;

        if !is_allowed(from, transition.next) {
            return Err(Error::Internal(format!(
                "handler for {} produced a transition to {}",
                from, transition.next
            )));
        }

        tracing::info!(
            from = %current,
            to = %transition.next,
            event = event.event_type_name(),
            "Dialogue transition"
        );

        Ok(transition)
    }
}
