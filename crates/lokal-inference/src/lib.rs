// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion service client for lokal.
//!
//! This crate implements [`CompletionProvider`] for OpenAI-compatible
//! inference servers (`/v1/chat/completions` and `/v1/models`), and builds
//! completion requests for routed messages.

pub mod client;
pub mod types;

use async_trait::async_trait;
use lokal_config::model::InferenceConfig;
use lokal_core::{
    ChatMessage, CompletionProvider, CompletionRequest, CompletionResponse, HealthStatus,
    LokalError, ModelInfo, QueryType, ServiceAdapter, ServiceKind,
};
use tracing::debug;

pub use client::InferenceClient;
pub use types::ModelList;

/// Build the completion request for one user message.
///
/// The request carries the message as a single user turn. Code queries get
/// the configured code system prompt and code temperature when those are
/// set; otherwise both query types are sent identically.
pub fn request_for_query(
    config: &InferenceConfig,
    model: &str,
    query: &str,
    query_type: Option<QueryType>,
) -> CompletionRequest {
    let is_code = query_type == Some(QueryType::Code);

    let mut messages = Vec::with_capacity(2);
    if is_code {
        if let Some(prompt) = &config.code_system_prompt {
            messages.push(ChatMessage::system(prompt.clone()));
        }
    }
    messages.push(ChatMessage::user(query));

    let temperature = match (is_code, config.code_temperature) {
        (true, Some(t)) => t,
        _ => config.temperature,
    };

    CompletionRequest {
        model: model.to_string(),
        messages,
        max_tokens: config.max_tokens,
        temperature,
    }
}

#[async_trait]
impl ServiceAdapter for InferenceClient {
    fn name(&self) -> &str {
        "inference"
    }

    fn kind(&self) -> ServiceKind {
        ServiceKind::Inference
    }

    async fn health_check(&self) -> Result<HealthStatus, LokalError> {
        match InferenceClient::list_models(self).await {
            Ok(list) if list.data.is_empty() => {
                Ok(HealthStatus::Degraded("no models loaded".to_string()))
            }
            Ok(list) => {
                debug!(models = list.data.len(), "inference server healthy");
                Ok(HealthStatus::Healthy)
            }
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl CompletionProvider for InferenceClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LokalError> {
        self.chat_completion(&request).await
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, LokalError> {
        Ok(InferenceClient::list_models(self).await?.data)
    }
}
