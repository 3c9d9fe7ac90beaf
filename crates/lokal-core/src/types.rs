// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the router, the service clients, and the bridge.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Kind of query a message was classified as.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum QueryType {
    /// Programming-related query, served by the code model.
    Code,
    /// General conversation, served by the chat model.
    Chat,
}

/// Identifies which external collaborator a client talks to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum ServiceKind {
    Inference,
    Tools,
    Memory,
}

/// Health status reported by service health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Service is fully operational.
    Healthy,
    /// Service answers but with reduced capability.
    Degraded(String),
    /// Service is not reachable or not operational.
    Unhealthy(String),
}

/// A single chat message in OpenAI-compatible `{role, content}` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// A request to the completion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Target model identifier, usually chosen by the router.
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Token accounting reported by the completion service, when present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// The assistant's answer to a completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    /// Model that produced the answer (echoed by the server, or the requested one).
    pub model: String,
    pub content: String,
    pub usage: Option<TokenUsage>,
}

/// One entry of the model status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub owned_by: Option<String>,
}
