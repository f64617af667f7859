//! Single-shot chat completion against the language-model endpoint.
//!
//! Unlike the quotes fetcher there is no multi-route fallback here:
//! the endpoint is directly reachable in the deployment context, so
//! the responder makes exactly one attempt. What it shares with the
//! quotes side is the absorption policy: every failure kind collapses
//! into a designed fallback reply, so the conversation log always
//! receives a message and nothing ever propagates to the presentation
//! layer as an error.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client as ReqwestClient;
use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::credentials::{Credential, CredentialStore};
use crate::error::{Error, Result};
use crate::observability::{CHAT_FALLBACKS, CHAT_REQUESTS};
use crate::types::{CompletionMessage, CompletionRequest, CompletionResponse};

const DEFAULT_CHAT_API_URL: &str = "https://api.perplexity.ai/chat/completions";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const CHAT_MODEL: &str = "llama-3.1-sonar-small-128k-online";
const SYSTEM_INSTRUCTION: &str = "You are a helpful crypto education assistant. Provide clear, \
     accurate, and beginner-friendly explanations about cryptocurrency topics. Keep responses \
     concise but informative.";

/// The guidance shown in place of an answer when the request fails.
pub const FALLBACK_REPLY: &str = "I'm currently unable to connect to the AI service. Please \
     check your API key in the profile settings and ensure you have a stable internet \
     connection. You can get a Perplexity API key from perplexity.ai.";

/// The outcome of a completion request.
///
/// A degraded reply is still a reply; the two variants let callers
/// badge fallback answers differently even though both land in the
/// conversation log the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    /// Text generated by the model.
    Answer(String),

    /// The fixed guidance text served after a failure.
    Degraded(String),
}

impl ChatReply {
    /// The reply text, whichever kind it is.
    pub fn text(&self) -> &str {
        match self {
            ChatReply::Answer(text) => text,
            ChatReply::Degraded(text) => text,
        }
    }

    /// Returns true if this reply is the failure fallback.
    pub fn is_degraded(&self) -> bool {
        matches!(self, ChatReply::Degraded(_))
    }
}

/// The seam the session controller depends on.
///
/// Implementations never fail; a failed request becomes a
/// [`ChatReply::Degraded`].
#[async_trait::async_trait]
pub trait RespondToChat: Send + Sync {
    /// Produce the assistant's reply to a single user message.
    async fn complete(&self, user_message: &str) -> ChatReply;
}

/// Client for the chat-completion endpoint.
pub struct ChatResponder {
    store: Arc<dyn CredentialStore>,
    http: ReqwestClient,
    base_url: String,
}

impl ChatResponder {
    /// Create a new responder reading its credential from `store`.
    pub fn new(store: Arc<dyn CredentialStore>) -> Result<Self> {
        Self::with_options(store, None, None)
    }

    /// Create a new responder with custom settings.
    pub fn with_options(
        store: Arc<dyn CredentialStore>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let http = ReqwestClient::builder()
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|e| {
                Error::network(format!("failed to build HTTP client: {}", e), Some(Box::new(e)))
            })?;
        Ok(Self {
            store,
            http,
            base_url: base_url.unwrap_or_else(|| DEFAULT_CHAT_API_URL.to_string()),
        })
    }

    fn request_body(user_message: &str) -> CompletionRequest {
        CompletionRequest {
            model: CHAT_MODEL.to_string(),
            messages: vec![
                CompletionMessage::system(SYSTEM_INSTRUCTION),
                CompletionMessage::user(user_message),
            ],
            temperature: 0.2,
            top_p: 0.9,
            max_tokens: 1000,
            return_images: false,
            return_related_questions: false,
            search_domain_filter: vec![
                "coinmarketcap.com".to_string(),
                "coingecko.com".to_string(),
                "ethereum.org".to_string(),
            ],
            search_recency_filter: "month".to_string(),
            frequency_penalty: 1.0,
            presence_penalty: 0.0,
        }
    }

    fn default_headers(api_key: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|err| {
            Error::network(
                format!("credential not usable as a header value: {err}"),
                Some(Box::new(err)),
            )
        })?;
        headers.insert(header::AUTHORIZATION, bearer);
        Ok(headers)
    }

    /// The fallible request path; `complete` absorbs its errors.
    async fn try_complete(&self, user_message: &str) -> Result<String> {
        let api_key = self
            .store
            .get(Credential::ChatKey)
            .ok_or_else(|| Error::missing_credential(Credential::ChatKey.key()))?;

        let response = self
            .http
            .post(&self.base_url)
            .headers(Self::default_headers(&api_key)?)
            .json(&Self::request_body(user_message))
            .send()
            .await
            .map_err(Error::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::http(
                status.as_u16(),
                format!("chat endpoint returned {status}"),
            ));
        }

        let completion: CompletionResponse = response.json().await.map_err(|err| {
            Error::malformed_response(
                format!("completion body did not parse: {err}"),
                Some(Box::new(err)),
            )
        })?;

        match completion.first_text() {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => Err(Error::malformed_response(
                "completion carried no generated text",
                None,
            )),
        }
    }
}

#[async_trait::async_trait]
impl RespondToChat for ChatResponder {
    /// Issue one completion request and return the reply.
    ///
    /// Missing credential, transport failures, non-2xx statuses, and
    /// malformed bodies all produce [`ChatReply::Degraded`] with the
    /// fixed guidance text; no error kind escapes.
    async fn complete(&self, user_message: &str) -> ChatReply {
        CHAT_REQUESTS.click();
        match self.try_complete(user_message).await {
            Ok(text) => ChatReply::Answer(text),
            Err(_) => {
                CHAT_FALLBACKS.click();
                ChatReply::Degraded(FALLBACK_REPLY.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::MemoryStore;

    #[tokio::test]
    async fn missing_credential_yields_degraded_guidance() {
        let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::new());
        let responder = ChatResponder::new(store).unwrap();

        let reply = responder.complete("What is staking?").await;
        assert!(reply.is_degraded());
        assert!(reply.text().contains("profile settings"));
        assert!(reply.text().contains("API key"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_degraded_guidance() {
        let store: Arc<dyn CredentialStore> =
            Arc::new(MemoryStore::with_keys("pplx-abc", "cmc-123"));
        // A port nothing listens on; the connect error must be absorbed.
        let responder = ChatResponder::with_options(
            store,
            Some("http://127.0.0.1:9/chat/completions".to_string()),
            Some(Duration::from_millis(250)),
        )
        .unwrap();

        let reply = responder.complete("What is staking?").await;
        assert!(reply.is_degraded());
        assert_eq!(reply.text(), FALLBACK_REPLY);
    }

    #[test]
    fn request_body_is_fixed() {
        let body = ChatResponder::request_body("Explain what staking means");
        assert_eq!(body.model, CHAT_MODEL);
        assert_eq!(body.messages.len(), 2);
        assert_eq!(body.messages[1].content, "Explain what staking means");
        assert_eq!(body.temperature, 0.2);
        assert_eq!(body.top_p, 0.9);
        assert_eq!(body.max_tokens, 1000);
        assert!(!body.return_images);
        assert_eq!(body.search_recency_filter, "month");
        assert_eq!(body.search_domain_filter.len(), 3);
    }

    #[test]
    fn reply_text_accessor() {
        assert_eq!(ChatReply::Answer("hi".to_string()).text(), "hi");
        assert!(!ChatReply::Answer("hi".to_string()).is_degraded());
        assert_eq!(ChatReply::Degraded("oops".to_string()).text(), "oops");
    }
}
