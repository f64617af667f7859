//! Chat session layer: the message log and its state machine.
//!
//! This module owns the conversational side of the client core. It
//! supports:
//!
//! - An append-only, strictly ordered message log seeded with a
//!   greeting
//! - One request/response cycle in flight at a time, with defensive
//!   rejection of concurrent submits
//! - Per-message like/save reactions on assistant answers
//! - Curated quick prompts for suggested questions
//!
//! # Architecture
//!
//! The module is organized into two components:
//!
//! - [`session`]: the session state machine and message log
//! - [`commands`]: slash command parsing for the REPL binary

mod commands;
mod session;

pub use commands::{ChatCommand, help_text, parse_command};
pub use session::{ChatSession, GREETING, PendingTurn, QUICK_PROMPTS, Rejection, Submission};
