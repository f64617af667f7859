//! Interactive terminal front-end for the Zennfy client core.
//!
//! This binary drives the chat session and quote fetcher from a REPL.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage with the default key store next to the binary
//! zennfy-chat
//!
//! # Point at a specific key store file
//! zennfy-chat --store ~/.config/zennfy/keys.json
//!
//! # Fetch more quotes per /markets call
//! zennfy-chat --limit 20
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/markets` - Fetch and display market quotes
//! - `/keys chat|quotes <value>` - Store an API key
//! - `/like <id>` / `/save <id>` - React to an answer
//! - `/quit` - Exit the application

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use arrrg_derive::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use zennfy::chat::{ChatCommand, ChatSession, help_text, parse_command};
use zennfy::{
    ChatResponder, CredentialStore, JsonFileStore, MarketSnapshot, Notify, QuotesClient,
    SnapshotSource,
};

/// Command-line arguments for the zennfy-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
struct ChatArgs {
    /// Path to the JSON key store.
    #[arrrg(optional, "Path to the JSON key store (default: zennfy_keys.json)", "PATH")]
    store: Option<String>,

    /// Override the chat-completion endpoint.
    #[arrrg(optional, "Chat-completion endpoint URL", "URL")]
    chat_url: Option<String>,

    /// Override the quotes listing endpoint.
    #[arrrg(optional, "Quotes listing endpoint URL", "URL")]
    quotes_url: Option<String>,

    /// Number of quotes to request per fetch.
    #[arrrg(optional, "Quotes per fetch (default: 10)", "N")]
    limit: Option<u32>,
}

/// Prints confirmations inline, the terminal stand-in for a toast.
struct TerminalNotify;

impl Notify for TerminalNotify {
    fn notify(&self, title: &str, body: &str) {
        println!("[{title}] {body}");
    }
}

fn print_snapshot(snapshot: &MarketSnapshot) {
    match snapshot.source {
        SnapshotSource::Live => {}
        SnapshotSource::Sample => {
            println!("(demo data: add a quotes key with /keys quotes <value> for live prices)");
        }
        SnapshotSource::Degraded => {
            println!("(live quotes unreachable right now, showing demo data)");
        }
    }
    for quote in &snapshot.quotes {
        println!(
            "  {:<8} {:<12} {:>14}  {:>7.2}%  cap {}",
            quote.symbol,
            quote.name,
            quote.price_display(),
            quote.percent_change_24h,
            quote.market_cap_display(),
        );
    }
}

/// Main entry point for the zennfy-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("zennfy-chat [OPTIONS]");

    let store_path = args.store.unwrap_or_else(|| "zennfy_keys.json".to_string());
    let store: Arc<dyn CredentialStore> = Arc::new(JsonFileStore::open(&store_path)?);

    let responder = ChatResponder::with_options(store.clone(), args.chat_url, None)?;
    let quotes = QuotesClient::with_options(store.clone(), args.quotes_url, None, args.limit)?;
    let mut session = ChatSession::with_notifier(responder, Arc::new(TerminalNotify));
    let mut rl = DefaultEditor::new()?;

    // Flag for interrupt handling
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    if !store.onboarding_complete() {
        println!("Welcome to Zennfy! Add your keys with /keys chat <value> and /keys quotes <value>.");
        store.set_onboarding_complete(true)?;
    }

    println!("Zennfy (key store: {store_path})");
    println!("Type /help for commands, /quit to exit\n");
    println!("Assistant: {}\n", session.messages()[0].content);

    loop {
        if interrupted.load(Ordering::Relaxed) {
            println!("Goodbye!");
            break;
        }

        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Markets => {
                            let snapshot = quotes.fetch_top_quotes().await;
                            print_snapshot(&snapshot);
                        }
                        ChatCommand::SetKey(credential, value) => {
                            match store.set(credential, &value) {
                                Ok(()) => println!("Stored {}.", credential.key()),
                                Err(err) => println!("Could not store the key: {err}"),
                            }
                        }
                        ChatCommand::React(id, reaction) => {
                            if !session.react(id, reaction) {
                                println!("No assistant message with id {id}.");
                            }
                        }
                        ChatCommand::Clear => {
                            session.clear();
                            println!("Conversation cleared.");
                        }
                        ChatCommand::Stats => {
                            println!("Messages: {}", session.message_count());
                            println!("Composing: {}", session.is_composing());
                            let saved = session
                                .messages()
                                .iter()
                                .filter(|message| message.saved)
                                .count();
                            println!("Saved answers: {saved}");
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            println!("{message}");
                        }
                    }
                    continue;
                }

                session.submit(line).await;
                if let Some(message) = session.messages().last() {
                    println!("\nAssistant [{}]: {}\n", message.id, message.content);
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                println!("Error reading input: {err}");
                break;
            }
        }
    }

    Ok(())
}
