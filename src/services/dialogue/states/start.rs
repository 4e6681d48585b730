//! Start state handler.
//!
//! `START` is where a conversation without persisted state begins and where
//! the reset command sends it. Whatever the event, the menu is shown.

use super::{StateHandler, TransitionContext, show_menu};
use crate::error::Result;
use crate::services::dialogue::event::Event;
use crate::services::dialogue::state::DialogueState;
use crate::services::dialogue::transition::Transition;
use async_trait::async_trait;

/// Handler for the Start state.
#[derive(Debug, Clone)]
pub struct StartState;

impl StartState {
    /// Creates a new StartState handler.
    pub fn new() -> Self {
        Self
    }
}

impl Default for StartState {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateHandler for StartState {
    fn state(&self) -> DialogueState {
        DialogueState::Start
    }

    async fn handle_event(&self, _event: &Event, ctx: &TransitionContext<'_>) -> Result<Transition> {
        show_menu(ctx).await
    }
}
