//! Dialogue state machine for the storefront conversation.
//!
//! # Architecture
//!
//! - **States** ([DialogueState]): Start, Menu, ProductDetail, Cart, AwaitingEmail
//! - **Events** ([Event]): free-text messages and button selections
//! - **Handlers** ([states]): one transition function per state
//! - **Engine** ([DialogueEngine]): picks the handler, checks the result
//!   against the transition table and logs it
//!
//! # State Transition Diagram
//!
//! ```text
//!  ┌───────┐  any event   ┌──────┐  product id   ┌────────────────┐
//!  │ Start │ ───────────> │ Menu │ ────────────> │ ProductDetail  │ <──┐ <id>/<qty>
//!  └───────┘              └──────┘ <──────────── └────────────────┘ ───┘
//!                          │    ▲   back-to-menu         │
//!               cart_items │    │ back-to-menu           │ cart_items
//!                          ▼    │                        ▼
//!                         ┌──────────────────────────────────┐
//!                         │               Cart               │ <──┐ remove line
//!                         └──────────────────────────────────┘ ───┘
//!                                          │ waiting_email
//!                                          ▼
//!                                 ┌────────────────┐
//!                                 │ AwaitingEmail  │ <──┐ email text
//!                                 └────────────────┘ ───┘
//! ```
//!
//! The reset command takes every state through `Start` back to `Menu`.
//! There is no terminal state.

pub mod engine;
pub mod event;
pub mod render;
pub mod state;
pub mod states;
pub mod transition;

pub use engine::DialogueEngine;
pub use event::{Event, Selection};
pub use state::DialogueState;
pub use transition::Transition;
