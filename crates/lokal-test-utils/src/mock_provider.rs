// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion provider for deterministic testing.
//!
//! `MockProvider` implements `CompletionProvider` with pre-configured
//! responses and records every request it receives.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use lokal_core::{
    CompletionProvider, CompletionRequest, CompletionResponse, HealthStatus, LokalError,
    ModelInfo, ServiceAdapter, ServiceKind, TokenUsage,
};

/// A queued outcome: response text or provider error message.
type Outcome = Result<String, String>;

/// A mock completion provider that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned.
#[derive(Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<Outcome>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    models: Vec<String>,
}

impl MockProvider {
    /// Create a new mock provider with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            models: vec!["chat-7b".to_string(), "code-7b".to_string()],
        }
    }

    /// Create a mock provider pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        let provider = Self::new();
        Self {
            responses: Arc::new(Mutex::new(responses.into_iter().map(Ok).collect())),
            ..provider
        }
    }

    /// Replace the model list reported by `list_models`.
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    /// Add a response to the end of the queue.
    pub async fn add_response(&self, text: String) {
        self.responses.lock().await.push_back(Ok(text));
    }

    /// Queue a provider failure.
    pub async fn add_failure(&self, message: String) {
        self.responses.lock().await.push_back(Err(message));
    }

    /// Every request received so far, in order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    async fn next_response(&self) -> Outcome {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("mock response".to_string()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn kind(&self) -> ServiceKind {
        ServiceKind::Inference
    }

    async fn health_check(&self) -> Result<HealthStatus, LokalError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LokalError> {
        self.requests.lock().await.push(request.clone());
        let content = self.next_response().await.map_err(LokalError::provider)?;
        Ok(CompletionResponse {
            model: request.model,
            content,
            usage: Some(TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 20,
                total_tokens: 30,
            }),
        })
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, LokalError> {
        Ok(self
            .models
            .iter()
            .map(|id| ModelInfo {
                id: id.clone(),
                object: Some("model".to_string()),
                owned_by: Some("mock".to_string()),
            })
            .collect())
    }
}
