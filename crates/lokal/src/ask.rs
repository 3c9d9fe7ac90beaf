// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lokal ask` and `lokal route` command implementations.

use std::time::Duration;

use clap::{Args, ValueEnum};
use colored::Colorize;
use lokal_bridge::{ChatOutcome, ChatParams};
use lokal_config::LokalConfig;
use lokal_core::{LokalError, QueryType};
use lokal_router::{ModelRouter, RoutingMode, parse_mode_prefix};

use crate::backend::start_backend;

/// How long a single-shot query waits for its memory save before exiting.
const SAVE_GRACE: Duration = Duration::from_secs(3);

/// Arguments of `lokal ask`.
#[derive(Args, Debug)]
pub struct AskArgs {
    /// The message to send. A leading `:code ` or `:chat ` pins the model.
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Use the code model.
    #[arg(long, conflicts_with_all = ["chat", "model", "auto"])]
    pub code: bool,

    /// Use the chat model.
    #[arg(long, conflicts_with_all = ["model", "auto"])]
    pub chat: bool,

    /// Use this model identifier.
    #[arg(long, conflicts_with = "auto")]
    pub model: Option<String>,

    /// Pick the model from the message content.
    #[arg(long)]
    pub auto: bool,

    /// Maximum completion length in tokens.
    #[arg(long)]
    pub tokens: Option<u32>,

    /// Output the outcome as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Routing mode names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Auto,
    Manual,
    Default,
}

/// Arguments of `lokal route`.
#[derive(Args, Debug)]
pub struct RouteArgs {
    /// The message to route.
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Routing mode. Defaults to the configured mode.
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Model for manual mode.
    #[arg(long)]
    pub model: Option<String>,
}

/// Run `lokal ask`. Returns whether the query succeeded.
pub async fn run_ask(config: &LokalConfig, args: AskArgs) -> Result<bool, LokalError> {
    let router = ModelRouter::from_config(&config.inference, &config.routing)?;

    let query = args.query.join(" ");
    let (prefix, text) = parse_mode_prefix(&query);
    let forced = forced_type(&args, prefix);
    let mode = resolve_ask_mode(&router, &args, prefix);

    let handle = start_backend(config, router).await?;
    let params = ChatParams::new(text, mode)
        .with_forced(forced)
        .with_max_tokens(args.tokens);
    let outcome = handle.ai_chat(params).await;
    handle.flush(SAVE_GRACE).await;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).unwrap_or_else(|_| "{}".to_string())
        );
        return Ok(outcome.is_success());
    }

    match &outcome {
        ChatOutcome::Success {
            response,
            model,
            query_type,
            auto_detected,
        } => {
            eprintln!(
                "{}",
                describe_route(model, *query_type, *auto_detected).dimmed()
            );
            println!("{response}");
        }
        ChatOutcome::Failure { error } => {
            eprintln!("{}: {error}", "error".red());
        }
    }
    Ok(outcome.is_success())
}

/// Run `lokal route`: print the routing decision as JSON.
pub fn run_route(config: &LokalConfig, args: RouteArgs) -> Result<(), LokalError> {
    let router = ModelRouter::from_config(&config.inference, &config.routing)?;
    let mode = resolve_route_mode(&router, args.mode, args.model);
    let decision = router.route(&args.query.join(" "), &mode);

    let json = serde_json::to_string_pretty(&decision)
        .map_err(|e| LokalError::Internal(format!("failed to serialize decision: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Mode for `lokal ask`: explicit flags win over an inline prefix, which
/// wins over the configured mode.
fn resolve_ask_mode(router: &ModelRouter, args: &AskArgs, prefix: Option<QueryType>) -> RoutingMode {
    if let Some(model) = &args.model {
        return RoutingMode::Manual {
            selected_model: Some(model.clone()),
        };
    }
    if args.code {
        return router.mode_for(Some(QueryType::Code));
    }
    if args.chat {
        return router.mode_for(Some(QueryType::Chat));
    }
    if args.auto {
        return RoutingMode::Auto;
    }
    router.mode_for(prefix)
}

/// Query type pinned by `--code`/`--chat` or an inline prefix. An explicit
/// `--model` or `--auto` pins none.
fn forced_type(args: &AskArgs, prefix: Option<QueryType>) -> Option<QueryType> {
    if args.model.is_some() || args.auto {
        None
    } else if args.code {
        Some(QueryType::Code)
    } else if args.chat {
        Some(QueryType::Chat)
    } else {
        prefix
    }
}

fn resolve_route_mode(
    router: &ModelRouter,
    mode: Option<ModeArg>,
    model: Option<String>,
) -> RoutingMode {
    match (mode, model) {
        (Some(ModeArg::Auto), _) => RoutingMode::Auto,
        (Some(ModeArg::Default), _) => RoutingMode::Default,
        (Some(ModeArg::Manual), selected_model) | (None, selected_model @ Some(_)) => {
            RoutingMode::Manual { selected_model }
        }
        (None, None) => router.default_mode().clone(),
    }
}

/// One-line description of where a message went, e.g. `code-7b (auto: code)`.
pub fn describe_route(model: &str, query_type: Option<QueryType>, auto_detected: bool) -> String {
    match (auto_detected, query_type) {
        (true, Some(query_type)) => format!("{model} (auto: {query_type})"),
        _ => model.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(flags: impl FnOnce(&mut AskArgs)) -> AskArgs {
        let mut args = AskArgs {
            query: vec!["hello".to_string()],
            code: false,
            chat: false,
            model: None,
            auto: false,
            tokens: None,
            json: false,
        };
        flags(&mut args);
        args
    }

    fn router() -> ModelRouter {
        ModelRouter::new("chat-7b", "code-7b")
    }

    #[test]
    fn explicit_model_pins_manual_mode() {
        let mode = resolve_ask_mode(&router(), &args(|a| a.model = Some("big".into())), None);
        assert_eq!(
            mode,
            RoutingMode::Manual {
                selected_model: Some("big".into())
            }
        );
    }

    #[test]
    fn code_flag_pins_code_model() {
        let mode = resolve_ask_mode(&router(), &args(|a| a.code = true), None);
        let decision = router().route("tell me a story", &mode);
        assert_eq!(decision.target_model, "code-7b");
        assert!(!decision.auto_detected);
    }

    #[test]
    fn flags_win_over_prefix() {
        let mode = resolve_ask_mode(&router(), &args(|a| a.chat = true), Some(QueryType::Code));
        assert_eq!(router().route("x", &mode).target_model, "chat-7b");
    }

    #[test]
    fn prefix_applies_without_flags() {
        let mode = resolve_ask_mode(&router(), &args(|_| {}), Some(QueryType::Code));
        assert_eq!(router().route("x", &mode).target_model, "code-7b");
    }

    #[test]
    fn no_flags_uses_configured_mode() {
        let mode = resolve_ask_mode(&router(), &args(|_| {}), None);
        assert_eq!(mode, RoutingMode::Default);
        let mode = resolve_ask_mode(&router(), &args(|a| a.auto = true), None);
        assert_eq!(mode, RoutingMode::Auto);
    }

    #[test]
    fn pinned_type_follows_flags_and_prefix() {
        assert_eq!(forced_type(&args(|a| a.code = true), None), Some(QueryType::Code));
        assert_eq!(
            forced_type(&args(|a| a.chat = true), Some(QueryType::Code)),
            Some(QueryType::Chat)
        );
        assert_eq!(forced_type(&args(|_| {}), Some(QueryType::Code)), Some(QueryType::Code));
        assert_eq!(
            forced_type(&args(|a| a.model = Some("big".into())), Some(QueryType::Code)),
            None
        );
        assert_eq!(forced_type(&args(|a| a.auto = true), None), None);
    }

    #[test]
    fn route_mode_from_flags() {
        let r = router();
        assert_eq!(resolve_route_mode(&r, Some(ModeArg::Auto), None), RoutingMode::Auto);
        assert_eq!(
            resolve_route_mode(&r, None, Some("m".into())),
            RoutingMode::Manual {
                selected_model: Some("m".into())
            }
        );
        assert_eq!(
            resolve_route_mode(&r, Some(ModeArg::Manual), None),
            RoutingMode::Manual {
                selected_model: None
            }
        );
        assert_eq!(resolve_route_mode(&r, None, None), RoutingMode::Default);
    }

    #[test]
    fn describe_route_mentions_auto_detection() {
        assert_eq!(
            describe_route("code-7b", Some(QueryType::Code), true),
            "code-7b (auto: code)"
        );
        assert_eq!(describe_route("chat-7b", None, false), "chat-7b");
    }
}
