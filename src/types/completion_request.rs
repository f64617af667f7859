use serde::{Deserialize, Serialize};

/// Role type for a completion request message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionRole {
    /// The fixed system instruction.
    System,

    /// The user's turn.
    User,
}

/// One message in a completion request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionMessage {
    /// The role of the message.
    pub role: CompletionRole,

    /// The message text.
    pub content: String,
}

impl CompletionMessage {
    /// Create the fixed system-instruction message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: CompletionRole::System,
            content: content.into(),
        }
    }

    /// Create the single user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: CompletionRole::User,
            content: content.into(),
        }
    }
}

/// Request body for the chat-completion endpoint.
///
/// Sampling parameters are constants chosen for a beginner-friendly
/// educator persona, not user-configurable knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier.
    pub model: String,

    /// System instruction plus the single user turn. No multi-turn
    /// context window is maintained server-side.
    pub messages: Vec<CompletionMessage>,

    /// Sampling temperature.
    pub temperature: f32,

    /// Nucleus sampling value.
    pub top_p: f32,

    /// Maximum output length in tokens.
    pub max_tokens: u32,

    /// Whether to include images in responses.
    pub return_images: bool,

    /// Whether to include follow-up question suggestions.
    pub return_related_questions: bool,

    /// Domains the provider may search.
    pub search_domain_filter: Vec<String>,

    /// Recency window for search results.
    pub search_recency_filter: String,

    /// Frequency penalty.
    pub frequency_penalty: f32,

    /// Presence penalty.
    pub presence_penalty: f32,
}
