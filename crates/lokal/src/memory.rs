// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lokal memory` command implementation.

use clap::Subcommand;
use colored::{ColoredString, Colorize};
use lokal_config::LokalConfig;
use lokal_core::LokalError;
use lokal_memory::{Conversation, ImportanceLevel, MemoryClient, SearchQuery};
use serde::Serialize;

use crate::backend::connect_memory;

/// Characters of a stored answer shown in listings.
const PREVIEW_CHARS: usize = 160;

/// Subcommands of `lokal memory`.
#[derive(Subcommand, Debug)]
pub enum MemoryCommand {
    /// Search stored conversations.
    Search {
        /// Search text.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Use semantic search when the service supports it.
        #[arg(long)]
        vector: bool,
        /// Only conversations with at least this importance (1-10).
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
        min_importance: Option<u8>,
        /// Maximum number of results.
        #[arg(long, default_value_t = lokal_memory::types::DEFAULT_SEARCH_LIMIT)]
        limit: u32,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show conversation statistics.
    Stats {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Delete expired conversations.
    Cleanup,
    /// Push pending embeddings to the vector store.
    Sync,
    /// Show one stored conversation.
    Show {
        id: i64,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Run a `lokal memory` subcommand.
pub async fn run_memory(config: &LokalConfig, command: MemoryCommand) -> Result<(), LokalError> {
    let Some(client) = connect_memory(&config.memory).await? else {
        return Err(LokalError::Config(
            "memory is disabled ([memory] enabled = false)".to_string(),
        ));
    };
    if !client.memory_enabled() {
        return Err(LokalError::memory(format!(
            "memory storage unavailable at {}",
            config.memory.base_url
        )));
    }
    execute(&client, command).await
}

async fn execute(client: &MemoryClient, command: MemoryCommand) -> Result<(), LokalError> {
    match command {
        MemoryCommand::Search {
            query,
            vector,
            min_importance,
            limit,
            json,
        } => {
            let query = SearchQuery::new(query.join(" "))
                .with_vector(vector)
                .with_importance_min(min_importance)
                .with_limit(limit);
            let results = client.search(&query).await?;
            if json {
                print_json(&results)?;
            } else if results.results.is_empty() {
                println!("No matching conversations.");
            } else {
                println!(
                    "{} result(s) ({} search)\n",
                    results.total,
                    results.search_type.as_deref().unwrap_or("keyword")
                );
                for conversation in &results.results {
                    print_conversation(conversation, Some(PREVIEW_CHARS));
                }
            }
        }
        MemoryCommand::Stats { json } => {
            let Some(stats) = client.stats().await? else {
                return Ok(());
            };
            if json {
                return print_json(&stats);
            }
            println!("  Project:        {}", stats.project_id);
            println!("  Conversations:  {}", stats.total_conversations);
            println!("  Avg importance: {:.1}", stats.avg_importance);
            if let Some(latest) = &stats.latest_conversation {
                println!("  Latest:         {latest}");
            }
            println!(
                "  Vector search:  {}",
                if stats.vector_enabled { "enabled" } else { "disabled" }
            );
            if !stats.model_usage.is_empty() {
                println!("  Models:");
                for (model, count) in &stats.model_usage {
                    println!("    {model:<20} {count}");
                }
            }
        }
        MemoryCommand::Cleanup => {
            if let Some(result) = client.cleanup().await? {
                println!("Deleted {} expired conversation(s).", result.deleted_count);
            }
        }
        MemoryCommand::Sync => match client.sync_vectors().await? {
            Some(result) => {
                println!("Synced {}, failed {}.", result.synced, result.failed);
                if let Some(message) = result.message {
                    println!("{message}");
                }
            }
            None => println!("Vector search is not enabled on the memory service."),
        },
        MemoryCommand::Show { id, json } => match client.get_conversation(id).await? {
            Some(conversation) if json => print_json(&conversation)?,
            Some(conversation) => print_conversation(&conversation, None),
            None => {
                return Err(LokalError::memory(format!("conversation {id} not found")));
            }
        },
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), LokalError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| LokalError::Internal(format!("failed to serialize output: {e}")))?;
    println!("{json}");
    Ok(())
}

fn print_conversation(conversation: &Conversation, preview: Option<usize>) {
    let answer = match preview {
        Some(max) => truncate(&conversation.ai_response, max),
        None => conversation.ai_response.clone(),
    };
    println!(
        "{} {} {}",
        format!("#{}", conversation.id).bold(),
        importance_label(conversation.importance()),
        conversation
            .timestamp
            .as_deref()
            .unwrap_or_default()
            .dimmed()
    );
    if let Some(model) = &conversation.model_used {
        println!("  {} {model}", "model:".dimmed());
    }
    println!("  {} {}", "Q:".cyan(), conversation.user_query);
    println!("  {} {answer}", "A:".green());
    println!();
}

fn importance_label(level: ImportanceLevel) -> ColoredString {
    let label = format!("[{level}]");
    match level {
        ImportanceLevel::Critical => label.red().bold(),
        ImportanceLevel::High => label.yellow(),
        ImportanceLevel::Medium => label.normal(),
        ImportanceLevel::Low => label.dimmed(),
    }
}

/// Cut `text` to at most `max` characters, marking the cut with `...`.
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lokal_config::model::MemoryConfig;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("héllo wörld", 4), "héll...");
    }

    async fn healthy_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "healthy",
                "storage_available": true,
                "vector_enabled": false
            })))
            .mount(&server)
            .await;
        server
    }

    fn config_for(server: &MockServer) -> LokalConfig {
        LokalConfig {
            memory: MemoryConfig {
                base_url: server.uri(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn search_sends_keyword_query_when_vectors_unavailable() {
        let server = healthy_server().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_partial_json(serde_json::json!({
                "query": "sort a list",
                "use_vector": false,
                "importance_min": 7,
                "limit": 5
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [],
                "total": 0,
                "search_type": "keyword"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let command = MemoryCommand::Search {
            query: vec!["sort".into(), "a".into(), "list".into()],
            vector: true,
            min_importance: Some(7),
            limit: 5,
            json: true,
        };
        run_memory(&config_for(&server), command).await.unwrap();
    }

    #[tokio::test]
    async fn show_missing_conversation_is_an_error() {
        let server = healthy_server().await;
        Mock::given(method("GET"))
            .and(path("/conversation/99"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = run_memory(&config_for(&server), MemoryCommand::Show { id: 99, json: false })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn unavailable_service_is_reported() {
        let config = LokalConfig {
            memory: MemoryConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                timeout_secs: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = run_memory(&config, MemoryCommand::Cleanup).await.unwrap_err();
        assert!(matches!(err, LokalError::Memory { .. }));
    }

    #[tokio::test]
    async fn disabled_memory_is_a_config_error() {
        let mut config = LokalConfig::default();
        config.memory.enabled = false;
        let err = run_memory(&config, MemoryCommand::Stats { json: false })
            .await
            .unwrap_err();
        assert!(matches!(err, LokalError::Config(_)));
    }
}
