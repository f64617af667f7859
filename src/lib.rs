// Public modules
pub mod chat;
pub mod credentials;
pub mod error;
pub mod notify;
pub mod quotes;
pub mod responder;
pub mod types;

mod observability;

// Re-exports
pub use chat::{ChatSession, Submission};
pub use credentials::{Credential, CredentialStore, JsonFileStore, MemoryStore};
pub use error::{Error, Result};
pub use notify::{NullNotify, Notify};
pub use observability::register_biometrics;
pub use quotes::{FetchRoute, QuoteFeed, QuotesClient, sample_quotes};
pub use responder::{ChatReply, ChatResponder, RespondToChat};
pub use types::*;
