//! Per-state event handlers for the dialogue state machine.
//!
//! Each state has one handler implementing [`StateHandler`]. A handler
//! interprets the event for its state, makes the catalog calls the screen
//! needs and returns the [`Transition`]. Handlers never persist anything and
//! never swallow a failure: any error aborts the transition.

use super::event::Event;
use super::render;
use super::state::DialogueState;
use super::transition::Transition;
use crate::config::DialogueConfig;
use crate::error::Result;
use crate::services::catalog::{CatalogClient, Credential, CredentialProvider};
use async_trait::async_trait;

pub mod awaiting_email;
pub mod cart;
pub mod menu;
pub mod product_detail;
pub mod start;

/// Trait for handling state-specific behavior in the dialogue.
#[async_trait]
pub trait StateHandler: Send + Sync {
    /// Returns the DialogueState this handler is responsible for.
    fn state(&self) -> DialogueState;

    /// Handles an event while in this state.
    async fn handle_event(&self, event: &Event, ctx: &TransitionContext<'_>) -> Result<Transition>;
}

/// Everything a handler may use while processing one event.
pub struct TransitionContext<'a> {
    /// Conversation id, also the backend cart id
    pub conversation_id: &'a str,
    pub catalog: &'a dyn CatalogClient,
    pub credentials: &'a dyn CredentialProvider,
    pub settings: &'a DialogueConfig,
}

impl TransitionContext<'_> {
    /// Fetches a credential for the next catalog call.
    pub async fn credential(&self) -> Result<Credential> {
        self.credentials.credential().await
    }
}

/// Lists the products and shows the menu.
pub(crate) async fn show_menu(ctx: &TransitionContext<'_>) -> Result<Transition> {
    let credential = ctx.credential().await?;
    let products = ctx.catalog.list_products(&credential).await?;
    tracing::debug!(count = products.len(), "Rendering menu");
    Ok(Transition::to(DialogueState::Menu, render::menu(&products)))
}

/// Fetches the conversation's cart and shows it.
pub(crate) async fn show_cart(ctx: &TransitionContext<'_>) -> Result<Transition> {
    let credential = ctx.credential().await?;
    let cart = ctx.catalog.get_cart(&credential, ctx.conversation_id).await?;
    tracing::debug!(lines = cart.lines.len(), total = %cart.total, "Rendering cart");
    if cart.lines_amount() != cart.total_amount {
        // Rendered as returned; the backend total stays authoritative
        tracing::warn!(
            lines_amount = cart.lines_amount(),
            total_amount = cart.total_amount,
            "Cart total differs from the sum of its lines"
        );
    }
    Ok(Transition::to(
        DialogueState::Cart,
        render::cart(&cart, ctx.settings),
    ))
}

/// Fetches a product and its main image and shows the detail screen.
pub(crate) async fn show_product(ctx: &TransitionContext<'_>, product_id: &str) -> Result<Transition> {
    let credential = ctx.credential().await?;
    let product = ctx.catalog.get_product(&credential, product_id).await?;

    let image_url = match &product.image_id {
        Some(image_id) => {
            let credential = ctx.credential().await?;
            Some(ctx.catalog.resolve_image_url(&credential, image_id).await?)
        }
        None => None,
    };

    Ok(Transition::to(
        DialogueState::ProductDetail,
        render::product_detail(&product, image_url, ctx.settings),
    ))
}

/// Registry of state handlers.
///
/// Provides access to the appropriate handler for each state.
pub struct StateHandlerRegistry {
    start: start::StartState,
    menu: menu::MenuState,
    product_detail: product_detail::ProductDetailState,
    cart: cart::CartState,
    awaiting_email: awaiting_email::AwaitingEmailState,
}

impl StateHandlerRegistry {
    /// Creates a new state handler registry.
    pub fn new() -> Self {
        Self {
            start: start::StartState::new(),
            menu: menu::MenuState::new(),
            product_detail: product_detail::ProductDetailState::new(),
            cart: cart::CartState::new(),
            awaiting_email: awaiting_email::AwaitingEmailState::new(),
        }
    }

    /// Gets the handler for the given state.
    pub fn get_handler(&self, state: DialogueState) -> &dyn StateHandler {
        match state {
            DialogueState::Start => &self.start,
            DialogueState::Menu => &self.menu,
            DialogueState::ProductDetail => &self.product_detail,
            DialogueState::Cart => &self.cart,
            DialogueState::AwaitingEmail => &self.awaiting_email,
        }
    }
}

impl Default for StateHandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
