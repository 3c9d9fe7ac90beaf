// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lokal status` command implementation.
//!
//! Probes the inference server, the tool service, and the memory service,
//! and prints one line per service plus the loaded model list.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use lokal_config::LokalConfig;
use lokal_core::{HealthStatus, LokalError, ServiceAdapter};
use lokal_inference::InferenceClient;
use lokal_mcp_client::McpClient;
use lokal_memory::MemoryClient;
use serde::Serialize;

/// Status of a service check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
    /// Service disabled in config.
    Skip,
}

/// Result of probing one service.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
}

impl CheckResult {
    fn from_health(name: &str, health: HealthStatus, duration: Duration) -> Self {
        let (status, message) = match health {
            HealthStatus::Healthy => (CheckStatus::Pass, "healthy".to_string()),
            HealthStatus::Degraded(reason) => (CheckStatus::Warn, reason),
            HealthStatus::Unhealthy(reason) => (CheckStatus::Fail, reason),
        };
        Self {
            name: name.to_string(),
            status,
            message,
            duration,
        }
    }

    fn skipped(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Skip,
            message: "disabled".to_string(),
            duration: Duration::ZERO,
        }
    }
}

fn as_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub services: Vec<CheckResult>,
    pub models: Vec<String>,
}

/// Run the `lokal status` command.
///
/// If `--json` is passed, outputs structured JSON for scripting.
/// If `--plain` is passed or stdout is not a TTY, disables colors.
pub async fn run_status(config: &LokalConfig, json: bool, plain: bool) -> Result<(), LokalError> {
    let report = collect_status(config).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_report(&report, use_color);
    }
    Ok(())
}

/// Probe every configured service.
pub async fn collect_status(config: &LokalConfig) -> Result<StatusReport, LokalError> {
    let mut services = Vec::with_capacity(3);

    let inference = InferenceClient::new(&config.inference)?;
    let start = Instant::now();
    let models = match inference.list_models().await {
        Ok(list) => {
            let health = if list.data.is_empty() {
                HealthStatus::Degraded("no models loaded".to_string())
            } else {
                HealthStatus::Healthy
            };
            services.push(CheckResult::from_health("inference", health, start.elapsed()));
            list.data.into_iter().map(|m| m.id).collect()
        }
        Err(e) => {
            services.push(CheckResult::from_health(
                "inference",
                HealthStatus::Unhealthy(e.to_string()),
                start.elapsed(),
            ));
            Vec::new()
        }
    };

    if config.mcp.enabled {
        services.push(check_adapter(&McpClient::new(&config.mcp)?).await);
    } else {
        services.push(CheckResult::skipped("mcp"));
    }

    if config.memory.enabled {
        services.push(check_adapter(&MemoryClient::new(&config.memory)?).await);
    } else {
        services.push(CheckResult::skipped("memory"));
    }

    Ok(StatusReport { services, models })
}

async fn check_adapter(adapter: &dyn ServiceAdapter) -> CheckResult {
    let start = Instant::now();
    let health = adapter
        .health_check()
        .await
        .unwrap_or_else(|e| HealthStatus::Unhealthy(e.to_string()));
    CheckResult::from_health(adapter.name(), health, start.elapsed())
}

fn print_report(report: &StatusReport, use_color: bool) {
    use colored::Colorize;

    println!();
    println!("  lokal status");
    println!("  {}", "-".repeat(50));

    for result in &report.services {
        let duration_ms = result.duration.as_millis();
        let line = match (result.status, use_color) {
            (CheckStatus::Pass, true) => format!(
                "    {} {:<12} {} ({duration_ms}ms)",
                "✓".green(),
                result.name,
                result.message
            ),
            (CheckStatus::Warn, true) => format!(
                "    {} {:<12} {} ({duration_ms}ms)",
                "!".yellow(),
                result.name,
                result.message.yellow()
            ),
            (CheckStatus::Fail, true) => format!(
                "    {} {:<12} {} ({duration_ms}ms)",
                "✗".red(),
                result.name,
                result.message.red()
            ),
            (CheckStatus::Skip, true) => format!(
                "    {} {:<12} {}",
                "-".dimmed(),
                result.name,
                result.message.dimmed()
            ),
            (status, false) => {
                let tag = match status {
                    CheckStatus::Pass => "[OK]  ",
                    CheckStatus::Warn => "[WARN]",
                    CheckStatus::Fail => "[FAIL]",
                    CheckStatus::Skip => "[SKIP]",
                };
                format!(
                    "    {tag} {:<12} {} ({duration_ms}ms)",
                    result.name, result.message
                )
            }
        };
        println!("{line}");
    }

    println!();
    if report.models.is_empty() {
        println!("  No models reported.");
    } else {
        println!("  Models:");
        for model in &report.models {
            println!("    {model}");
        }
    }
    println!();
}
