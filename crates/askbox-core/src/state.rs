//! UI-agnostic chat state types
//!
//! The transcript is append-only: messages are never edited, removed or
//! reordered once they land, so a message's index is its identity.

use serde::{Deserialize, Serialize};

/// A single chat bubble
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Bot,
            text: text.into(),
        }
    }
}

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Bot,
}

impl ChatRole {
    pub fn label(&self) -> &'static str {
        match self {
            ChatRole::User => "You",
            ChatRole::Bot => "Bot",
        }
    }
}

/// Ordered, append-only list of chat messages
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.messages.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a ChatMessage;
    type IntoIter = std::slice::Iter<'a, ChatMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
