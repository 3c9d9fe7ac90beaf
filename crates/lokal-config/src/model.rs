// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for lokal.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level lokal configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to a local single-machine setup.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LokalConfig {
    /// Process-wide behavior (logging).
    #[serde(default)]
    pub agent: AgentConfig,

    /// Completion service settings.
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Chat/code model routing settings.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Tool-execution (MCP) service settings.
    #[serde(default)]
    pub mcp: McpConfig,

    /// Memory service settings.
    #[serde(default)]
    pub memory: MemoryConfig,
}

/// Process-wide behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Completion service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InferenceConfig {
    /// Base URL of the OpenAI-compatible server (without `/v1/...`).
    #[serde(default = "default_inference_url")]
    pub base_url: String,

    /// Model identifier used for general conversation.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Model identifier used for programming queries.
    #[serde(default = "default_code_model")]
    pub code_model: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds.
    #[serde(default = "default_inference_timeout")]
    pub timeout_secs: u64,

    /// System prompt prepended to messages routed as code. `None` sends the
    /// user message alone.
    #[serde(default)]
    pub code_system_prompt: Option<String>,

    /// Temperature override for messages routed as code.
    #[serde(default)]
    pub code_temperature: Option<f32>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_inference_url(),
            chat_model: default_chat_model(),
            code_model: default_code_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_inference_timeout(),
            code_system_prompt: None,
            code_temperature: None,
        }
    }
}

fn default_inference_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_chat_model() -> String {
    "chat-7b".to_string()
}

fn default_code_model() -> String {
    "code-7b".to_string()
}

fn default_max_tokens() -> u32 {
    512
}

fn default_temperature() -> f32 {
    0.3
}

fn default_inference_timeout() -> u64 {
    60
}

/// How the model for a message is chosen when the caller does not force one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingModeSetting {
    /// Classify every message and pick the chat or code model.
    #[default]
    Auto,
    /// Always use `routing.selected_model`.
    Manual,
    /// Always use the chat model.
    Default,
}

/// Model routing configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Routing mode applied when no per-message override is given.
    #[serde(default)]
    pub mode: RoutingModeSetting,

    /// Model used in manual mode. Manual mode without a selection falls back
    /// to the chat model.
    #[serde(default)]
    pub selected_model: Option<String>,

    /// Replaces the built-in code keyword table. Order is preserved.
    #[serde(default)]
    pub code_keywords: Option<Vec<String>>,

    /// Replaces the built-in code pattern table (regular expressions,
    /// matched case-insensitively). Order is preserved.
    #[serde(default)]
    pub code_patterns: Option<Vec<String>>,
}

/// Tool-execution (MCP) service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct McpConfig {
    /// Enable the tool service client.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of the tool service.
    #[serde(default = "default_mcp_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_service_timeout")]
    pub timeout_secs: u64,

    /// Caller identity sent as `X-User-ID` for the service's RBAC checks.
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_mcp_url(),
            timeout_secs: default_service_timeout(),
            user_id: None,
        }
    }
}

fn default_mcp_url() -> String {
    "http://localhost:8020".to_string()
}

/// Memory service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Enable conversation persistence. The client still probes the service
    /// health before saving.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of the memory API, including the `/v1/memory` prefix.
    #[serde(default = "default_memory_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_service_timeout")]
    pub timeout_secs: u64,

    /// Project path sent with saved conversations. `None` uses the
    /// service's default project.
    #[serde(default)]
    pub project_path: Option<String>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_memory_url(),
            timeout_secs: default_service_timeout(),
            project_path: None,
        }
    }
}

fn default_memory_url() -> String {
    "http://localhost:8005/v1/memory".to_string()
}

fn default_service_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}
