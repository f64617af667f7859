// Public modules
pub mod chat_message;
pub mod completion_request;
pub mod completion_response;
pub mod listing_response;
pub mod market_snapshot;
pub mod quote;

// Re-exports
pub use chat_message::{Author, ChatMessage, Reaction};
pub use completion_request::{CompletionMessage, CompletionRequest, CompletionRole};
pub use completion_response::{ChoiceMessage, CompletionChoice, CompletionResponse};
pub use listing_response::{AssetRecord, ListingResponse, QuoteEnvelope, UsdQuote};
pub use market_snapshot::{MarketSnapshot, SnapshotSource};
pub use quote::{Quote, format_market_cap};
