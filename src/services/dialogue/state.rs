//! Dialogue state definitions.
//!
//! This module defines the DialogueState enum, the value persisted per
//! conversation in the session store.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// The step of the shopping flow a conversation is in.
///
/// Persisted as its upper snake case name (`PRODUCT_DETAIL`). There is no
/// terminal state: every state accepts the reset command.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DialogueState {
    /// No conversation yet, or the user asked to start over
    Start,

    /// The product list is on screen
    Menu,

    /// A single product with quantity buttons is on screen
    ProductDetail,

    /// The cart with per-line remove buttons is on screen
    Cart,

    /// Checkout was requested; the next free-text message is an email
    AwaitingEmail,
}

impl DialogueState {
    /// State for conversations that have nothing persisted.
    pub fn initial() -> Self {
        Self::Start
    }

    /// Parses a persisted state name.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownState` carrying the raw value when the name is
    /// not one of the recognised states.
    pub fn from_persisted(raw: &str) -> Result<Self> {
        Self::from_str(raw).map_err(|_| Error::UnknownState(raw.to_string()))
    }
}
