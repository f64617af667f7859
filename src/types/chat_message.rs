use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Who authored a chat message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    /// The person using the app.
    User,

    /// The assistant.
    Assistant,
}

/// A per-message reaction the user can toggle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    /// Mark the answer as liked.
    Like,

    /// Bookmark the answer for later.
    Save,
}

/// One turn in a conversation.
///
/// Messages are append-only once in the session log; the `liked` and
/// `saved` flags are the only fields ever mutated in place, and only
/// on assistant-authored messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Unique identifier, strictly increasing in creation order.
    pub id: u64,

    /// The message text.
    pub content: String,

    /// Who wrote the message.
    pub author: Author,

    /// Creation time.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,

    /// Whether the user liked this answer.
    pub liked: bool,

    /// Whether the user saved this answer.
    pub saved: bool,
}

impl ChatMessage {
    /// Create a new `ChatMessage` stamped with the current time.
    pub fn new(id: u64, content: impl Into<String>, author: Author) -> Self {
        Self {
            id,
            content: content.into(),
            author,
            timestamp: OffsetDateTime::now_utc(),
            liked: false,
            saved: false,
        }
    }

    /// Create a new user message.
    pub fn user(id: u64, content: impl Into<String>) -> Self {
        Self::new(id, content, Author::User)
    }

    /// Create a new assistant message.
    pub fn assistant(id: u64, content: impl Into<String>) -> Self {
        Self::new(id, content, Author::Assistant)
    }

    /// Returns true if the assistant authored this message.
    pub fn is_assistant(&self) -> bool {
        self.author == Author::Assistant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_author() {
        let user = ChatMessage::user(1, "hi");
        assert_eq!(user.author, Author::User);
        assert!(!user.is_assistant());
        assert!(!user.liked);
        assert!(!user.saved);

        let assistant = ChatMessage::assistant(2, "hello");
        assert!(assistant.is_assistant());
    }

    #[test]
    fn author_serializes_lowercase() {
        let json = serde_json::to_value(Author::Assistant).unwrap();
        assert_eq!(json, serde_json::json!("assistant"));
    }

    #[test]
    fn message_round_trips() {
        let message = ChatMessage::assistant(42, "staking locks coins");
        let json = serde_json::to_string(&message).unwrap();
        let back: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, message);
    }
}
