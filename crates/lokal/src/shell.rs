// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interactive REPL for chatting with the local model.
//!
//! Each line goes through the bridge with the configured routing mode; a
//! leading `:code ` or `:chat ` pins the model for that one message. All
//! turns of one shell run share a session id in the memory service.

use colored::Colorize;
use lokal_bridge::{BridgeHandle, ChatOutcome, ChatParams};
use lokal_config::LokalConfig;
use lokal_core::{LokalError, QueryType};
use lokal_router::{ModelRouter, parse_mode_prefix};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::ask::describe_route;
use crate::backend::start_backend;

/// A classified line of shell input.
#[derive(Debug, PartialEq, Eq)]
enum ShellInput<'a> {
    Exit,
    Help,
    Empty,
    Message {
        forced: Option<QueryType>,
        text: &'a str,
    },
}

fn parse_input(line: &str) -> ShellInput<'_> {
    let trimmed = line.trim();
    match trimmed {
        "" => ShellInput::Empty,
        "exit" | "quit" | "q" | "/quit" | "/exit" => ShellInput::Exit,
        "help" | "/help" => ShellInput::Help,
        _ => {
            let (forced, text) = parse_mode_prefix(trimmed);
            let text = text.trim();
            if text.is_empty() {
                ShellInput::Empty
            } else {
                ShellInput::Message { forced, text }
            }
        }
    }
}

/// Run the interactive shell until the user exits.
pub async fn run_shell(config: &LokalConfig) -> Result<(), LokalError> {
    let router = ModelRouter::from_config(&config.inference, &config.routing)?;
    let handle = start_backend(config, router.clone()).await?;
    let session_id = uuid::Uuid::new_v4().to_string();

    let mut rl = DefaultEditor::new()
        .map_err(|e| LokalError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "lokal shell".bold().green());
    println!(
        "Type {} for commands, {} to exit.\n",
        "help".yellow(),
        "quit".yellow()
    );

    let prompt = format!("{}> ", "lokal".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => match parse_input(&line) {
                ShellInput::Exit => break,
                ShellInput::Help => print_help(),
                ShellInput::Empty => continue,
                ShellInput::Message { forced, text } => {
                    let _ = rl.add_history_entry(line.as_str());
                    let params = ChatParams::new(text, router.mode_for(forced))
                        .with_forced(forced)
                        .with_session_id(Some(session_id.clone()));
                    send_message(&handle, params).await;
                }
            },
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                break;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                break;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    handle.flush(std::time::Duration::from_secs(3)).await;
    println!("{}", "goodbye".dimmed());
    Ok(())
}

async fn send_message(handle: &BridgeHandle, params: ChatParams) {
    match handle.ai_chat(params).await {
        ChatOutcome::Success {
            response,
            model,
            query_type,
            auto_detected,
        } => {
            println!(
                "{}",
                describe_route(&model, query_type, auto_detected).cyan()
            );
            println!("{response}\n");
        }
        ChatOutcome::Failure { error } => {
            eprintln!("{}: {error}\n", "error".red());
        }
    }
}

fn print_help() {
    println!("{}", "commands".bold());
    println!("  {:<16} send a message with the configured routing mode", "<message>");
    println!("  {:<16} send a message to the code model", ":code <message>");
    println!("  {:<16} send a message to the chat model", ":chat <message>");
    println!("  {:<16} show this help", "help");
    println!("  {:<16} leave the shell", "quit, exit, q");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_words() {
        for word in ["exit", "quit", "q", "/quit", "/exit", "  quit  "] {
            assert_eq!(parse_input(word), ShellInput::Exit, "{word}");
        }
    }

    #[test]
    fn help_and_empty() {
        assert_eq!(parse_input("help"), ShellInput::Help);
        assert_eq!(parse_input("   "), ShellInput::Empty);
    }

    #[test]
    fn prefixes_pin_query_type() {
        assert_eq!(
            parse_input(":code sort a vec"),
            ShellInput::Message {
                forced: Some(QueryType::Code),
                text: "sort a vec"
            }
        );
        assert_eq!(
            parse_input(":chat hello"),
            ShellInput::Message {
                forced: Some(QueryType::Chat),
                text: "hello"
            }
        );
    }

    #[test]
    fn plain_message_is_unforced() {
        assert_eq!(
            parse_input("  what is rust?  "),
            ShellInput::Message {
                forced: None,
                text: "what is rust?"
            }
        );
    }

    #[test]
    fn quit_inside_sentence_is_a_message() {
        assert!(matches!(
            parse_input("how do I quit vim"),
            ShellInput::Message { .. }
        ));
    }
}
