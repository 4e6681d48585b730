//! Awaiting email state handler.
//!
//! Checkout was requested. A text message is taken as the user's email and
//! turned into a customer record; the conversation stays here until the
//! user goes back to the menu or resets.

use super::{StateHandler, TransitionContext, show_menu};
use crate::error::{Error, Result};
use crate::services::dialogue::event::{Event, Selection};
use crate::services::dialogue::render;
use crate::services::dialogue::state::DialogueState;
use crate::services::dialogue::transition::Transition;
use crate::validation::validate_email;
use async_trait::async_trait;

/// Handler for the AwaitingEmail state.
#[derive(Debug, Clone)]
pub struct AwaitingEmailState;

impl AwaitingEmailState {
    /// Creates a new AwaitingEmailState handler.
    pub fn new() -> Self {
        Self
    }

    async fn register_customer(&self, ctx: &TransitionContext<'_>, text: &str) -> Result<Transition> {
        let email = text.trim();
        validate_email(email)?;

        let credential = ctx.credential().await?;
        let customer = ctx.catalog.create_customer(&credential, email).await?;

        tracing::info!(customer_id = %customer.id, "Customer created at checkout");
        Ok(Transition::to(
            DialogueState::AwaitingEmail,
            render::customer_created(&customer),
        ))
    }
}

impl Default for AwaitingEmailState {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateHandler for AwaitingEmailState {
    fn state(&self) -> DialogueState {
        DialogueState::AwaitingEmail
    }

    async fn handle_event(&self, event: &Event, ctx: &TransitionContext<'_>) -> Result<Transition> {
        match event {
            Event::Message { text } => self.register_customer(ctx, text).await,
            Event::Selection { .. } => match event.expect_selection()? {
                Selection::BackToMenu => show_menu(ctx).await,
                other => Err(Error::MalformedEvent(format!(
                    "{:?} is not available while waiting for an email",
                    other
                ))),
            },
        }
    }
}
