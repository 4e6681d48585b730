//! Menu state handler.
//!
//! The product list is on screen. A product button opens its detail screen,
//! the cart button opens the cart.

use super::{StateHandler, TransitionContext, show_cart, show_product};
use crate::error::{Error, Result};
use crate::services::dialogue::event::{Event, Selection};
use crate::services::dialogue::state::DialogueState;
use crate::services::dialogue::transition::Transition;
use async_trait::async_trait;

/// Handler for the Menu state.
#[derive(Debug, Clone)]
pub struct MenuState;

impl MenuState {
    /// Creates a new MenuState handler.
    pub fn new() -> Self {
        Self
    }
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateHandler for MenuState {
    fn state(&self) -> DialogueState {
        DialogueState::Menu
    }

    async fn handle_event(&self, event: &Event, ctx: &TransitionContext<'_>) -> Result<Transition> {
        match event.expect_selection()? {
            Selection::ShowCart => show_cart(ctx).await,
            Selection::Item(product_id) => show_product(ctx, &product_id).await,
            other => Err(Error::MalformedEvent(format!(
                "{:?} is not available in the menu",
                other
            ))),
        }
    }
}
