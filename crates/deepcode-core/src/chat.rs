//! Chat transcript

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const GREETING: &str =
    "Hi! Import a project (device or GitHub) and tell me what you want to change.";
const CLEARED: &str = "Chat cleared. What do you want to do next?";

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The person typing
    User,
    /// The model
    Assistant,
    /// Local notices
    System,
}

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique id
    pub id: String,
    /// Author
    pub role: ChatRole,
    /// Text
    pub content: String,
    /// Epoch millis
    pub ts: i64,
}

impl ChatMessage {
    /// Create a message stamped with the current time
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: format!("m_{}", Uuid::new_v4().simple()),
            role,
            content: content.into(),
            ts: Utc::now().timestamp_millis(),
        }
    }

    /// User message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    /// Assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// Ordered messages, starting with an assistant greeting
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    /// New transcript with the greeting
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(GREETING)],
        }
    }

    /// Append a message
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Reset to a single "cleared" notice
    pub fn clear(&mut self) {
        self.messages = vec![ChatMessage::assistant(CLEARED)];
    }

    /// All messages, oldest first
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Most recent message
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether there are no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_starts_with_greeting() {
        let transcript = Transcript::new();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].role, ChatRole::Assistant);
        assert!(transcript.messages()[0].content.starts_with("Hi!"));
    }

    #[test]
    fn test_clear_leaves_notice() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("explain main.rs"));
        transcript.push(ChatMessage::assistant("It starts the server."));
        transcript.clear();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.last().unwrap().content, CLEARED);
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = ChatMessage::user("a");
        let b = ChatMessage::user("a");
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("m_"));
    }
}
