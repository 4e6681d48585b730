//! Rendering instructions produced by the dialogue engine.
//!
//! A reply is channel-neutral: the channel bridge decides how text, image
//! and options turn into widgets.

use serde::{Deserialize, Serialize};

/// A selectable option: the label shown to the user and the opaque payload
/// that comes back when it is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyOption {
    pub label: String,
    pub payload: String,
}

impl ReplyOption {
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            payload: payload.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub image_url: Option<String>,
    /// Rows of options; each inner vector is rendered side by side
    pub options: Vec<Vec<ReplyOption>>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Appends a row with a single option.
    pub fn with_option(mut self, option: ReplyOption) -> Self {
        self.options.push(vec![option]);
        self
    }

    /// Appends a row of options rendered side by side.
    pub fn with_row(mut self, row: Vec<ReplyOption>) -> Self {
        if !row.is_empty() {
            self.options.push(row);
        }
        self
    }

    /// All options in display order, flattened across rows.
    pub fn all_options(&self) -> impl Iterator<Item = &ReplyOption> {
        self.options.iter().flatten()
    }

    pub fn payloads(&self) -> Vec<&str> {
        self.all_options().map(|o| o.payload.as_str()).collect()
    }
}
