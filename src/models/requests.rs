use crate::models::reply::Reply;
use crate::services::dialogue::DialogueState;
use serde::{Deserialize, Serialize};

/// Inbound event as posted by the channel bridge.
///
/// Exactly one of `text` (free-text message) or `payload` (button selection)
/// must be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEventRequest {
    pub conversation_id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub payload: Option<String>,
}

impl InboundEventRequest {
    pub fn text(conversation_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            text: Some(text.into()),
            payload: None,
        }
    }

    pub fn selection(conversation_id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            text: None,
            payload: Some(payload.into()),
        }
    }
}

/// What the channel bridge should render, plus the state the conversation
/// is now in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEventResponse {
    pub state: DialogueState,
    pub reply: Reply,
}
