//! Event definitions for the dialogue state machine.
//!
//! An inbound event is either a free-text message or a button selection.
//! Selection payloads are opaque to the channel and interpreted here.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Payload of the "back to menu" button.
pub const BACK_TO_MENU: &str = "back-to-menu";

/// Payload of the "cart" button.
pub const SHOW_CART: &str = "cart_items";

/// Payload of the "checkout" button.
pub const CHECKOUT: &str = "waiting_email";

/// Separates the product id from the quantity in quantity-button payloads.
pub const QUANTITY_DELIMITER: char = '/';

/// Events that can trigger transitions of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// The user typed a message
    Message { text: String },

    /// The user pressed a button carrying this payload
    Selection { payload: String },
}

impl Event {
    pub fn message(text: impl Into<String>) -> Self {
        Self::Message { text: text.into() }
    }

    pub fn selection(payload: impl Into<String>) -> Self {
        Self::Selection {
            payload: payload.into(),
        }
    }

    /// Returns a human-readable name for the event type.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            Self::Message { .. } => "message",
            Self::Selection { .. } => "selection",
        }
    }

    /// The raw text or payload.
    pub fn raw(&self) -> &str {
        match self {
            Self::Message { text } => text,
            Self::Selection { payload } => payload,
        }
    }

    /// The reset command restarts the flow whether it was typed or sent as a
    /// button payload.
    pub fn is_reset(&self, reset_command: &str) -> bool {
        self.raw().trim() == reset_command
    }

    /// Interprets the event as a button selection.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedEvent` for free-text messages and for
    /// payloads that do not parse (see [`Selection::parse`]).
    pub fn expect_selection(&self) -> Result<Selection> {
        match self {
            Self::Selection { payload } => Selection::parse(payload),
            Self::Message { .. } => Err(Error::MalformedEvent(
                "expected a button selection, got a text message".to_string(),
            )),
        }
    }
}

/// A parsed selection payload.
///
/// `Item` is context dependent: a product id in the menu, a cart-line id in
/// the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    BackToMenu,
    ShowCart,
    Checkout,
    Quantity { product_id: String, quantity: u32 },
    Item(String),
}

impl Selection {
    /// Parses a payload.
    ///
    /// Payloads containing the quantity delimiter must be exactly
    /// `<productId>/<quantity>` with a non-empty id and a positive integer
    /// quantity.
    pub fn parse(payload: &str) -> Result<Self> {
        let payload = payload.trim();
        if payload.is_empty() {
            return Err(Error::MalformedEvent("empty selection payload".to_string()));
        }

        match payload {
            BACK_TO_MENU => return Ok(Self::BackToMenu),
            SHOW_CART => return Ok(Self::ShowCart),
            CHECKOUT => return Ok(Self::Checkout),
            _ => {}
        }

        if !payload.contains(QUANTITY_DELIMITER) {
            return Ok(Self::Item(payload.to_string()));
        }

        let parts: Vec<&str> = payload.split(QUANTITY_DELIMITER).collect();
        let [product_id, quantity] = parts.as_slice() else {
            return Err(Error::MalformedEvent(format!(
                "quantity payload '{}' must look like <productId>/<quantity>",
                payload
            )));
        };

        if product_id.is_empty() {
            return Err(Error::MalformedEvent(format!(
                "quantity payload '{}' has no product id",
                payload
            )));
        }

        Ok(Self::Quantity {
            product_id: product_id.to_string(),
            quantity: parse_quantity(quantity)?,
        })
    }

    /// Payload that parses back to a quantity selection.
    pub fn quantity_payload(product_id: &str, quantity: u32) -> String {
        format!("{}{}{}", product_id, QUANTITY_DELIMITER, quantity)
    }
}

/// Parses a positive quantity.
fn parse_quantity(raw: &str) -> Result<u32> {
    match raw.parse::<u32>() {
        Ok(0) => Err(Error::MalformedEvent("quantity must be positive".to_string())),
        Ok(quantity) => Ok(quantity),
        Err(_) => Err(Error::MalformedEvent(format!(
            "quantity '{}' is not a positive integer",
            raw
        ))),
    }
}
