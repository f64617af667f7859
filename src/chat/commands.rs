//! Slash command parsing for the REPL binary.
//!
//! This module handles parsing of special commands that start with
//! `/`, letting users manage keys, quotes, and reactions without
//! sending a chat message.

use crate::credentials::Credential;
use crate::types::Reaction;

/// A parsed chat command.
///
/// These commands control the session and are never sent to the API.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Fetch and display the current market quotes.
    Markets,

    /// Store a credential.
    SetKey(Credential, String),

    /// Toggle a reaction on the message with the given id.
    React(u64, Reaction),

    /// Clear the conversation back to the greeting.
    Clear,

    /// Display session statistics.
    Stats,

    /// Display help information.
    Help,

    /// Exit the application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None`
/// if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use zennfy::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/markets").is_some());
/// assert!(parse_command("What is staking?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "markets" | "quotes" => ChatCommand::Markets,
        "keys" | "key" => parse_keys_command(argument),
        "like" => parse_react_command(argument, Reaction::Like, "/like"),
        "save" => parse_react_command(argument, Reaction::Save, "/save"),
        "clear" => ChatCommand::Clear,
        "stats" | "status" => ChatCommand::Stats,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_keys_command(argument: Option<&str>) -> ChatCommand {
    let Some(arg) = argument else {
        return ChatCommand::Invalid("/keys requires 'chat <value>' or 'quotes <value>'".to_string());
    };

    let mut parts = arg.splitn(2, ' ');
    let which = parts.next().unwrap_or_default().to_lowercase();
    let value = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let credential = match which.as_str() {
        "chat" => Credential::ChatKey,
        "quotes" => Credential::QuotesKey,
        _ => {
            return ChatCommand::Invalid(
                "Unrecognized /keys target (use chat or quotes)".to_string(),
            );
        }
    };

    match value {
        Some(value) => ChatCommand::SetKey(credential, value.to_string()),
        None => ChatCommand::Invalid(format!("/keys {which} requires a key value")),
    }
}

fn parse_react_command(argument: Option<&str>, reaction: Reaction, name: &str) -> ChatCommand {
    match argument {
        Some(arg) => match arg.parse::<u64>() {
            Ok(id) => ChatCommand::React(id, reaction),
            Err(_) => ChatCommand::Invalid(format!("{name} expects a message id")),
        },
        None => ChatCommand::Invalid(format!("{name} requires a message id")),
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /markets               Fetch and display current market quotes
  /keys chat <value>     Store the chat API key
  /keys quotes <value>   Store the quotes API key
  /like <id>             Toggle like on an assistant message
  /save <id>             Toggle save on an assistant message
  /clear                 Clear conversation back to the greeting
  /stats                 Show session statistics
  /help                  Show this help message
  /quit                  Exit the chat"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_markets() {
        assert_eq!(parse_command("/markets"), Some(ChatCommand::Markets));
        assert_eq!(parse_command("/quotes"), Some(ChatCommand::Markets));
        assert_eq!(parse_command("/MARKETS"), Some(ChatCommand::Markets));
    }

    #[test]
    fn parse_keys() {
        assert_eq!(
            parse_command("/keys chat pplx-abc123"),
            Some(ChatCommand::SetKey(
                Credential::ChatKey,
                "pplx-abc123".to_string()
            ))
        );
        assert_eq!(
            parse_command("/keys quotes cmc-456"),
            Some(ChatCommand::SetKey(
                Credential::QuotesKey,
                "cmc-456".to_string()
            ))
        );
        assert!(matches!(
            parse_command("/keys"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("requires")
        ));
        assert!(matches!(
            parse_command("/keys chat"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("key value")
        ));
        assert!(matches!(
            parse_command("/keys other abc"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("chat or quotes")
        ));
    }

    #[test]
    fn parse_reactions() {
        assert_eq!(
            parse_command("/like 1718000000000"),
            Some(ChatCommand::React(1718000000000, Reaction::Like))
        );
        assert_eq!(
            parse_command("/save 42"),
            Some(ChatCommand::React(42, Reaction::Save))
        );
        assert!(matches!(
            parse_command("/like"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("requires")
        ));
        assert!(matches!(
            parse_command("/save soon"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("expects")
        ));
    }

    #[test]
    fn parse_stats_and_clear() {
        assert_eq!(parse_command("/stats"), Some(ChatCommand::Stats));
        assert_eq!(parse_command("/status"), Some(ChatCommand::Stats));
        assert_eq!(parse_command("/clear"), Some(ChatCommand::Clear));
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("What is staking?"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
    }

    #[test]
    fn help_text_not_empty() {
        let help = help_text();
        assert!(!help.is_empty());
        assert!(help.contains("/quit"));
        assert!(help.contains("/markets"));
        assert!(help.contains("/keys"));
    }
}
