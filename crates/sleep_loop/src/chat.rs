//! User-facing text channel.

use serde::Serialize;

/// Color used for loop notices.
pub const NOTICE_COLOR: [u8; 3] = [80, 255, 80];

/// A single chat line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// Text as shown to the player.
    pub text: String,
    /// RGB color.
    pub color: [u8; 3],
}

impl ChatMessage {
    /// A notice in the loop's color.
    pub fn notice(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: NOTICE_COLOR,
        }
    }
}

/// Destination for chat lines.
pub trait ChatSink {
    /// Deliver one message.
    fn post(&mut self, message: ChatMessage);
}

/// In-memory chat history.
#[derive(Debug, Default, Clone)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages posted so far.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Message texts, oldest first.
    pub fn texts(&self) -> Vec<&str> {
        self.messages.iter().map(|m| m.text.as_str()).collect()
    }

    /// Most recent message text.
    pub fn last_text(&self) -> Option<&str> {
        self.messages.last().map(|m| m.text.as_str())
    }

    /// Take every message, leaving the log empty.
    pub fn drain(&mut self) -> Vec<ChatMessage> {
        std::mem::take(&mut self.messages)
    }
}

impl ChatSink for ChatLog {
    fn post(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }
}
