//! Transition results and the table of allowed state changes.

use super::state::DialogueState;
use crate::models::reply::Reply;

/// The outcome of handling one event: where the conversation goes next and
/// what to show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: DialogueState,
    pub reply: Reply,
}

impl Transition {
    pub fn to(next: DialogueState, reply: Reply) -> Self {
        Self { next, reply }
    }
}

/// States reachable from `from` with a single event.
///
/// The reset command is handled as if the conversation were in `START`, so
/// it does not appear here.
pub fn allowed_targets(from: DialogueState) -> &'static [DialogueState] {
    use DialogueState::*;

    match from {
        Start => &[Menu],
        Menu => &[ProductDetail, Cart],
        ProductDetail => &[ProductDetail, Menu, Cart],
        Cart => &[Cart, Menu, AwaitingEmail],
        AwaitingEmail => &[AwaitingEmail, Menu],
    }
}

/// Checks whether a transition from `from` to `to` is allowed.
pub fn is_allowed(from: DialogueState, to: DialogueState) -> bool {
    allowed_targets(from).contains(&to)
}
