//! Product detail state handler.
//!
//! A product with its quantity buttons is on screen. A quantity button adds
//! a cart line; where the conversation goes afterwards is set by
//! `dialogue.after_add`.

use super::{StateHandler, TransitionContext, show_cart, show_menu, show_product};
use crate::config::AfterAddPolicy;
use crate::error::{Error, Result};
use crate::services::dialogue::event::{Event, Selection};
use crate::services::dialogue::render;
use crate::services::dialogue::state::DialogueState;
use crate::services::dialogue::transition::Transition;
use async_trait::async_trait;

/// Handler for the ProductDetail state.
#[derive(Debug, Clone)]
pub struct ProductDetailState;

impl ProductDetailState {
    /// Creates a new ProductDetailState handler.
    pub fn new() -> Self {
        Self
    }

    async fn add_to_cart(
        &self,
        ctx: &TransitionContext<'_>,
        product_id: &str,
        quantity: u32,
    ) -> Result<Transition> {
        let credential = ctx.credential().await?;
        let line = ctx
            .catalog
            .add_cart_item(&credential, ctx.conversation_id, product_id, quantity)
            .await?;

        tracing::info!(
            product_id,
            quantity,
            line_id = %line.id,
            "Added product to cart"
        );

        let notice = render::added_notice(quantity, &line.name, ctx.settings);
        let transition = match ctx.settings.after_add {
            AfterAddPolicy::ProductDetail => show_product(ctx, product_id).await?,
            AfterAddPolicy::Cart => show_cart(ctx).await?,
            AfterAddPolicy::Menu => show_menu(ctx).await?,
        };

        Ok(Transition::to(
            transition.next,
            render::with_notice(transition.reply, &notice),
        ))
    }
}

impl Default for ProductDetailState {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateHandler for ProductDetailState {
    fn state(&self) -> DialogueState {
        DialogueState::ProductDetail
    }

    async fn handle_event(&self, event: &Event, ctx: &TransitionContext<'_>) -> Result<Transition> {
        match event.expect_selection()? {
            Selection::BackToMenu => show_menu(ctx).await,
            Selection::ShowCart => show_cart(ctx).await,
            Selection::Quantity {
                product_id,
                quantity,
            } => self.add_to_cart(ctx, &product_id, quantity).await,
            other => Err(Error::MalformedEvent(format!(
                "{:?} is not available on the product screen",
                other
            ))),
        }
    }
}
