//! Inbound event handler
//!
//! The channel bridge posts every user message or button press here and
//! renders the returned reply.

use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::{
    error::{Error, Result},
    models::requests::{InboundEventRequest, InboundEventResponse},
    state::AppState,
};

/// Processes one inbound event
///
/// # Example
/// ```bash
/// curl -X POST http://localhost:3000/api/v1/events \
///   -H "Content-Type: application/json" \
///   -d '{"conversation_id": "42", "payload": "cart_items"}'
/// ```
///
/// # Response
/// ```json
/// {
///   "state": "CART",
///   "reply": {
///     "text": "Your cart is empty.",
///     "image_url": null,
///     "options": [[{"label": "Back to menu", "payload": "back-to-menu"}]]
///   }
/// }
/// ```
pub async fn post_event(
    State(state): State<AppState>,
    body: std::result::Result<Json<InboundEventRequest>, JsonRejection>,
) -> Result<Json<InboundEventResponse>> {
    let Json(request) = body.map_err(|e| Error::MalformedEvent(e.body_text()))?;
    let response = state.dispatcher.dispatch(request).await?;
    Ok(Json(response))
}
