//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the
//! ordered message log and drives the request/response cycle against
//! a [`RespondToChat`] implementation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use time::OffsetDateTime;

use crate::notify::{NullNotify, Notify};
use crate::observability::{SESSION_REACTIONS, SESSION_REJECTED_SUBMITS, SESSION_TURNS};
use crate::responder::{ChatReply, RespondToChat};
use crate::types::{ChatMessage, Reaction};

/// The assistant greeting every session starts with.
pub const GREETING: &str = "Hi! I'm your Zennfy AI assistant. I can help you understand crypto \
     concepts, explain market trends, and guide your investment decisions. What would you like \
     to learn about today?";

/// Curated prompts offered as suggested-question affordances.
pub const QUICK_PROMPTS: [&str; 3] = [
    "What's happening with Bitcoin today?",
    "Explain what staking means",
    "Should I invest in Ethereum?",
];

/// Why a submission was not accepted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The text was empty after trimming.
    Empty,

    /// A previous turn is still awaiting its reply.
    Busy,
}

/// The outcome of a full submit cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Submission {
    /// A user message and an assistant reply were appended.
    Completed {
        /// Whether the reply was the failure fallback.
        degraded: bool,
    },

    /// Nothing was appended; the input was empty.
    RejectedEmpty,

    /// Nothing was appended; a turn was already in flight.
    RejectedBusy,
}

/// A one-shot ticket for an accepted turn.
///
/// Produced by [`ChatSession::begin_turn`] and consumed by
/// [`ChatSession::complete_turn`]; holding it is proof that exactly
/// one user message is awaiting its reply. The ticket is tied to the
/// session that issued it and is refused by any other.
#[derive(Debug)]
pub struct PendingTurn {
    session: u64,
    text: String,
}

impl PendingTurn {
    /// The trimmed text to send to the responder.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A chat session that owns the conversation log and its state machine.
///
/// The session has two externally visible states: idle, and awaiting
/// a reply (`is_composing`). At most one turn is in flight at a time;
/// a submit while composing is rejected without touching the log. The
/// log is append-only and never reordered; the `liked`/`saved` flags
/// are the only in-place mutation, and only on assistant messages.
pub struct ChatSession<R: RespondToChat> {
    responder: R,
    notifier: Arc<dyn Notify>,
    messages: Vec<ChatMessage>,
    composing: bool,
    last_id: u64,
    session_id: u64,
}

/// Source of session identities, so tickets cannot cross sessions.
static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

impl<R: RespondToChat> ChatSession<R> {
    /// Creates a new session seeded with the assistant greeting.
    pub fn new(responder: R) -> Self {
        Self::with_notifier(responder, Arc::new(NullNotify))
    }

    /// Creates a new session with a custom notifier.
    pub fn with_notifier(responder: R, notifier: Arc<dyn Notify>) -> Self {
        let mut session = Self {
            responder,
            notifier,
            messages: Vec::new(),
            composing: false,
            last_id: 0,
            session_id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
        };
        let id = session.next_message_id();
        session.messages.push(ChatMessage::assistant(id, GREETING));
        session
    }

    /// Allocates the next message identifier.
    ///
    /// Identifiers are derived from wall-clock milliseconds but
    /// bumped past the previous id, so they stay strictly increasing
    /// even when two messages land within the same millisecond or the
    /// clock steps backwards.
    fn next_message_id(&mut self) -> u64 {
        let now_millis = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64;
        let id = now_millis.max(self.last_id + 1);
        self.last_id = id;
        id
    }

    /// Start a turn: append the user message and enter the awaiting state.
    ///
    /// The text is trimmed first; empty input and input arriving while
    /// a turn is already in flight are rejected with the log untouched.
    pub fn begin_turn(&mut self, text: &str) -> std::result::Result<PendingTurn, Rejection> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            SESSION_REJECTED_SUBMITS.click();
            return Err(Rejection::Empty);
        }
        if self.composing {
            SESSION_REJECTED_SUBMITS.click();
            return Err(Rejection::Busy);
        }

        let id = self.next_message_id();
        self.messages.push(ChatMessage::user(id, trimmed));
        self.composing = true;
        Ok(PendingTurn {
            session: self.session_id,
            text: trimmed.to_string(),
        })
    }

    /// Finish a turn: append the assistant reply and return to idle.
    ///
    /// Returns whether the turn was completed. A ticket issued by a
    /// different session is refused with the log untouched.
    pub fn complete_turn(&mut self, turn: PendingTurn, reply: &ChatReply) -> bool {
        if turn.session != self.session_id {
            return false;
        }
        let id = self.next_message_id();
        self.messages.push(ChatMessage::assistant(id, reply.text()));
        self.composing = false;
        SESSION_TURNS.click();
        true
    }

    /// Submit a user message and await the assistant's reply.
    ///
    /// Drives the full cycle: begin the turn, invoke the responder
    /// with only the latest message (no multi-turn context window is
    /// maintained server-side), and append the reply. The responder
    /// never fails, so an accepted turn always completes; the returned
    /// flag says whether the reply was the failure fallback.
    pub async fn submit(&mut self, text: &str) -> Submission {
        let turn = match self.begin_turn(text) {
            Ok(turn) => turn,
            Err(Rejection::Empty) => return Submission::RejectedEmpty,
            Err(Rejection::Busy) => return Submission::RejectedBusy,
        };
        let reply = self.responder.complete(turn.text()).await;
        let degraded = reply.is_degraded();
        self.complete_turn(turn, &reply);
        Submission::Completed { degraded }
    }

    /// Submit one of the curated quick prompts.
    ///
    /// An out-of-range index sends nothing and is rejected as empty.
    pub async fn quick_prompt(&mut self, index: usize) -> Submission {
        match QUICK_PROMPTS.get(index) {
            Some(prompt) => self.submit(prompt).await,
            None => Submission::RejectedEmpty,
        }
    }

    /// Toggle a reaction on an assistant-authored message.
    ///
    /// Allowed in any state. Returns whether a flag was toggled;
    /// unknown ids and user-authored messages are a no-op. Turning
    /// the saved flag on emits a non-blocking confirmation.
    pub fn react(&mut self, id: u64, reaction: Reaction) -> bool {
        let Some(message) = self
            .messages
            .iter_mut()
            .find(|message| message.id == id && message.is_assistant())
        else {
            return false;
        };

        SESSION_REACTIONS.click();
        match reaction {
            Reaction::Like => {
                message.liked = !message.liked;
            }
            Reaction::Save => {
                message.saved = !message.saved;
                if message.saved {
                    self.notifier
                        .notify("Saved", "Added to your saved learnings.");
                }
            }
        }
        true
    }

    /// Clears the conversation back to the seed greeting.
    pub fn clear(&mut self) {
        self.messages.truncate(1);
    }

    /// The ordered message log.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Returns true while a reply is outstanding.
    pub fn is_composing(&self) -> bool {
        self.composing
    }
}
