use serde::{Deserialize, Serialize};

/// Response body from the chat-completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionResponse {
    /// Generated choices; only the first is used.
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

/// One generated choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionChoice {
    /// The generated message.
    pub message: ChoiceMessage,
}

/// The message payload of a choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChoiceMessage {
    /// The generated text.
    pub content: String,
}

impl CompletionResponse {
    /// The first generated message's text, if the response carried one.
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .map(|choice| choice.message.content.as_str())
    }
}
