//! Outbound reply values.
//!
//! The engine never talks to a chat transport directly; every handler
//! returns a [`FlowReply`] and the caller dispatches it. Button constraints
//! (at most 3 per message, bounded id/title lengths) are channel limits and
//! are enforced at construction so no reply can violate them.

use serde::{Deserialize, Serialize};

/// Maximum quick-reply buttons a single message may carry.
pub const MAX_BUTTONS: usize = 3;
/// Maximum button id length in characters.
pub const MAX_BUTTON_ID_LEN: usize = 128;
/// Maximum button title length in characters.
pub const MAX_BUTTON_TITLE_LEN: usize = 20;

/// A quick-reply button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub id: String,
    pub title: String,
}

impl Button {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// A reply for the transport layer: text plus optional quick-reply buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowReply {
    pub text: String,
    #[serde(default)]
    pub buttons: Vec<Button>,
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.trim().chars().take(max).collect()
}

impl FlowReply {
    /// A plain text reply.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    /// A reply with quick-reply buttons.
    ///
    /// Buttons with an empty id or title are dropped, ids and titles are
    /// truncated to the channel limits, and at most [`MAX_BUTTONS`] survive.
    pub fn with_buttons(text: impl Into<String>, buttons: Vec<Button>) -> Self {
        let mut safe = Vec::new();
        for button in buttons {
            let id = truncate_chars(&button.id, MAX_BUTTON_ID_LEN);
            let title = truncate_chars(&button.title, MAX_BUTTON_TITLE_LEN);
            if id.is_empty() || title.is_empty() {
                continue;
            }
            safe.push(Button { id, title });
            if safe.len() == MAX_BUTTONS {
                break;
            }
        }
        Self {
            text: text.into(),
            buttons: safe,
        }
    }

    pub fn has_buttons(&self) -> bool {
        !self.buttons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_are_capped_at_three() {
        let reply = FlowReply::with_buttons(
            "pick",
            (1..=5).map(|i| Button::new(i.to_string(), format!("option {i}"))).collect(),
        );
        assert_eq!(reply.buttons.len(), 3);
        assert_eq!(reply.buttons[0].id, "1");
    }

    #[test]
    fn test_empty_and_oversized_buttons_sanitized() {
        let reply = FlowReply::with_buttons(
            "pick",
            vec![
                Button::new("", "missing id"),
                Button::new("ok", "a very long title that overflows the limit"),
            ],
        );
        assert_eq!(reply.buttons.len(), 1);
        assert_eq!(reply.buttons[0].title.chars().count(), 20);
    }

    #[test]
    fn test_plain_text_reply() {
        let reply = FlowReply::text("hello");
        assert!(!reply.has_buttons());
    }
}
