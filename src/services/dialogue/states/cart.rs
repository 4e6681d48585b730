//! Cart state handler.
//!
//! The cart is on screen with one remove button per line. Removing a line
//! re-renders the remaining cart.

use super::{StateHandler, TransitionContext, show_cart, show_menu};
use crate::error::{Error, Result};
use crate::services::dialogue::event::{Event, Selection};
use crate::services::dialogue::render;
use crate::services::dialogue::state::DialogueState;
use crate::services::dialogue::transition::Transition;
use async_trait::async_trait;

/// Handler for the Cart state.
#[derive(Debug, Clone)]
pub struct CartState;

impl CartState {
    /// Creates a new CartState handler.
    pub fn new() -> Self {
        Self
    }

    async fn remove_line(&self, ctx: &TransitionContext<'_>, line_id: &str) -> Result<Transition> {
        let credential = ctx.credential().await?;
        let cart = ctx
            .catalog
            .remove_cart_item(&credential, ctx.conversation_id, line_id)
            .await?;

        tracing::info!(line_id, remaining = cart.lines.len(), "Removed cart line");
        Ok(Transition::to(
            DialogueState::Cart,
            render::cart(&cart, ctx.settings),
        ))
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateHandler for CartState {
    fn state(&self) -> DialogueState {
        DialogueState::Cart
    }

    async fn handle_event(&self, event: &Event, ctx: &TransitionContext<'_>) -> Result<Transition> {
        match event.expect_selection()? {
            Selection::BackToMenu => show_menu(ctx).await,
            Selection::ShowCart => show_cart(ctx).await,
            Selection::Checkout => Ok(Transition::to(
                DialogueState::AwaitingEmail,
                render::email_prompt(),
            )),
            Selection::Item(line_id) => self.remove_line(ctx, &line_id).await,
            other => Err(Error::MalformedEvent(format!(
                "{:?} is not available in the cart",
                other
            ))),
        }
    }
}
