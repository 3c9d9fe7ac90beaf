// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lokal tools` command implementation.

use clap::Subcommand;
use colored::Colorize;
use lokal_config::LokalConfig;
use lokal_core::LokalError;
use lokal_mcp_client::McpClient;
use serde_json::Value;

/// Subcommands of `lokal tools`.
#[derive(Subcommand, Debug)]
pub enum ToolsCommand {
    /// List the tools the service offers.
    List {
        /// Print the raw JSON response.
        #[arg(long)]
        json: bool,
    },
    /// Call a tool and print its result.
    Call {
        /// Tool name.
        name: String,
        /// Arguments as a JSON object.
        #[arg(long)]
        args: Option<String>,
    },
}

/// Run a `lokal tools` subcommand.
pub async fn run_tools(config: &LokalConfig, command: ToolsCommand) -> Result<(), LokalError> {
    if !config.mcp.enabled {
        return Err(LokalError::Config(
            "tool service is disabled ([mcp] enabled = false)".to_string(),
        ));
    }
    let client = McpClient::new(&config.mcp)?;

    match command {
        ToolsCommand::List { json } => {
            let tools = client.list_tools().await?;
            if json {
                println!("{}", pretty(&tools));
                return Ok(());
            }
            let summaries = tool_summaries(&tools);
            if summaries.is_empty() {
                println!("{}", pretty(&tools));
            }
            for (name, description) in summaries {
                println!("  {:<24} {}", name.bold(), description);
            }
        }
        ToolsCommand::Call { name, args } => {
            let arguments = parse_arguments(args.as_deref())?;
            let result = client.call_tool(&name, arguments).await?;
            println!("{}", pretty(&result));
        }
    }
    Ok(())
}

fn parse_arguments(raw: Option<&str>) -> Result<Value, LokalError> {
    let Some(raw) = raw else {
        return Ok(Value::Null);
    };
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| LokalError::Config(format!("--args is not valid JSON: {e}")))?;
    if !value.is_object() {
        return Err(LokalError::Config(
            "--args must be a JSON object".to_string(),
        ));
    }
    Ok(value)
}

/// `(name, description)` pairs from a tool listing, which is either an
/// array of tools or an object with a `tools` array.
fn tool_summaries(tools: &Value) -> Vec<(String, String)> {
    let list = match tools {
        Value::Array(list) => list,
        Value::Object(map) => match map.get("tools") {
            Some(Value::Array(list)) => list,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    list.iter()
        .filter_map(|tool| match tool {
            Value::String(name) => Some((name.clone(), String::new())),
            Value::Object(map) => {
                let name = map.get("name")?.as_str()?.to_string();
                let description = map
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                Some((name, description))
            }
            _ => None,
        })
        .collect()
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summaries_from_wrapped_list() {
        let tools = json!({"tools": [
            {"name": "web_scrape", "description": "Scrape a page"},
            {"name": "read_file"}
        ]});
        assert_eq!(
            tool_summaries(&tools),
            vec![
                ("web_scrape".to_string(), "Scrape a page".to_string()),
                ("read_file".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn summaries_from_bare_names() {
        let tools = json!(["web_screenshot", "notion_search"]);
        assert_eq!(tool_summaries(&tools).len(), 2);
    }

    #[test]
    fn summaries_of_unknown_shape_are_empty() {
        assert!(tool_summaries(&json!({"status": "ok"})).is_empty());
        assert!(tool_summaries(&json!(42)).is_empty());
    }

    #[test]
    fn arguments_must_be_an_object() {
        assert_eq!(parse_arguments(None).unwrap(), Value::Null);
        assert_eq!(
            parse_arguments(Some(r#"{"url": "https://example.com"}"#)).unwrap(),
            json!({"url": "https://example.com"})
        );
        assert!(parse_arguments(Some("[1, 2]")).is_err());
        assert!(parse_arguments(Some("{not json")).is_err());
    }

    #[tokio::test]
    async fn disabled_service_is_a_config_error() {
        let mut config = LokalConfig::default();
        config.mcp.enabled = false;
        let err = run_tools(&config, ToolsCommand::List { json: false })
            .await
            .unwrap_err();
        assert!(matches!(err, LokalError::Config(_)));
    }
}
