// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! lokal - a terminal front-end for a locally hosted language model server.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod ask;
mod backend;
mod memory;
mod shell;
mod status;
mod tools;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

/// lokal - chat with a locally hosted language model.
#[derive(Parser, Debug)]
#[command(name = "lokal", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Send one message and print the answer.
    Ask(ask::AskArgs),
    /// Show which model a message would be routed to.
    Route(ask::RouteArgs),
    /// Launch an interactive chat session.
    Shell,
    /// Show inference, tool, and memory service status.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Work with the tool-execution service.
    Tools {
        #[command(subcommand)]
        command: tools::ToolsCommand,
    },
    /// Search and maintain conversation memory.
    Memory {
        #[command(subcommand)]
        command: memory::MemoryCommand,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => lokal_config::load_and_validate_path(path),
        None => lokal_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            lokal_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    let result = match cli.command {
        Some(Commands::Ask(args)) => ask::run_ask(&config, args).await,
        Some(Commands::Route(args)) => ask::run_route(&config, args).map(|()| true),
        Some(Commands::Status { json, plain }) => {
            status::run_status(&config, json, plain).await.map(|()| true)
        }
        Some(Commands::Tools { command }) => tools::run_tools(&config, command).await.map(|()| true),
        Some(Commands::Memory { command }) => {
            memory::run_memory(&config, command).await.map(|()| true)
        }
        Some(Commands::Shell) | None => shell::run_shell(&config).await.map(|()| true),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {e}", "error".red());
            std::process::exit(1);
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so answers on stdout stay pipeable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lokal={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = lokal_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.agent.log_level, "info");
    }

    #[test]
    fn cli_parses_ask_flags() {
        let cli = Cli::try_parse_from(["lokal", "ask", "--code", "--tokens", "64", "sort", "a", "list"])
            .unwrap();
        match cli.command {
            Some(Commands::Ask(args)) => {
                assert!(args.code);
                assert_eq!(args.tokens, Some(64));
                assert_eq!(args.query, vec!["sort", "a", "list"]);
            }
            other => panic!("expected ask, got {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_conflicting_model_flags() {
        assert!(Cli::try_parse_from(["lokal", "ask", "--code", "--chat", "hi"]).is_err());
        assert!(Cli::try_parse_from(["lokal", "ask", "--model", "m", "--auto", "hi"]).is_err());
    }

    #[test]
    fn cli_without_subcommand_starts_shell() {
        let cli = Cli::try_parse_from(["lokal"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_accepts_global_config_path() {
        let cli = Cli::try_parse_from(["lokal", "status", "--config", "/tmp/lokal.toml", "--json"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/lokal.toml")));
    }
}
