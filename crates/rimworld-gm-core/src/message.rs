//! In-game message types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Seconds an in-game message stays on screen
pub const MESSAGE_DURATION_SECS: u32 = 5;

/// Presentation style of an in-game message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStyle {
    #[default]
    Info,
    Positive,
    Negative,
    Dramatic,
}

impl MessageStyle {
    pub const ALL: [MessageStyle; 4] = [
        MessageStyle::Info,
        MessageStyle::Positive,
        MessageStyle::Negative,
        MessageStyle::Dramatic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MessageStyle::Info => "info",
            MessageStyle::Positive => "positive",
            MessageStyle::Negative => "negative",
            MessageStyle::Dramatic => "dramatic",
        }
    }
}

/// Body of `POST /message`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePayload {
    /// Forwarded as given; the remote rejects missing or empty text
    pub text: Option<Value>,
    /// Style name, forwarded without local validation
    #[serde(rename = "type")]
    pub style: Value,
    pub duration: u32,
}

impl MessagePayload {
    pub fn new(text: Option<Value>, style: Option<Value>) -> Self {
        Self {
            text,
            style: style.unwrap_or_else(|| MessageStyle::default().as_str().into()),
            duration: MESSAGE_DURATION_SECS,
        }
    }
}

/// Successful `POST /message` reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageAccepted {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let payload = MessagePayload::new(Some("Winter is coming".into()), None);
        assert_eq!(payload.style, "info");
        assert_eq!(payload.duration, 5);
    }

    #[test]
    fn test_wire_field_names() {
        let payload = MessagePayload::new(Some("hi".into()), Some("dramatic".into()));
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "text": "hi", "type": "dramatic", "duration": 5 })
        );
    }

    #[test]
    fn test_missing_text_is_null() {
        let json = serde_json::to_value(MessagePayload::new(None, None)).unwrap();
        assert!(json["text"].is_null());
    }
}
