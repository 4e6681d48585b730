//! Input validation for inbound events.
//!
//! Everything rejected here surfaces as `Error::MalformedEvent`.

use crate::error::{Error, Result};

/// Longest conversation id accepted from a channel.
const MAX_CONVERSATION_ID_LEN: usize = 128;

/// Characters that never appear in an address we hand to the catalog backend.
const FORBIDDEN_EMAIL_CHARS: [char; 12] = ['<', '>', '(', ')', '[', ']', '\\', ',', ';', ':', '"', ' '];

fn malformed(reason: impl Into<String>) -> Error {
    Error::MalformedEvent(reason.into())
}

/// Checks that text typed at checkout looks like an email address.
///
/// # Examples
/// ```
/// use storefront::validation::validate_email;
///
/// validate_email("user@example.com").unwrap();
/// assert!(validate_email("user at example dot com").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(malformed("email address is empty"));
    }
    if email.len() > 254 {
        return Err(malformed("email address is longer than 254 characters"));
    }
    if let Some(c) = email.chars().find(|c| FORBIDDEN_EMAIL_CHARS.contains(c)) {
        return Err(malformed(format!("email address cannot contain '{}'", c)));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(malformed("email address has no '@'"));
    };
    if domain.contains('@') {
        return Err(malformed("email address has more than one '@'"));
    }
    if local.is_empty() || local.len() > 64 {
        return Err(malformed("email local part must be 1 to 64 characters"));
    }
    if domain.is_empty() || domain.len() > 253 || !domain.contains('.') {
        return Err(malformed("email domain must be a dotted host name"));
    }
    if email.contains("..") || domain.starts_with('.') || domain.ends_with('.') {
        return Err(malformed("email address has an empty dot-separated label"));
    }

    Ok(())
}

/// Checks a channel-assigned conversation id and returns it trimmed.
pub fn validate_conversation_id(conversation_id: &str) -> Result<String> {
    let id = conversation_id.trim();
    if id.is_empty() {
        return Err(malformed("conversation_id cannot be empty"));
    }
    if id.len() > MAX_CONVERSATION_ID_LEN {
        return Err(malformed(format!(
            "conversation_id is longer than {} characters",
            MAX_CONVERSATION_ID_LEN
        )));
    }
    if id.chars().any(char::is_control) {
        return Err(malformed("conversation_id contains control characters"));
    }
    Ok(id.to_string())
}
