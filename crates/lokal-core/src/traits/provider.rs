// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion provider trait for OpenAI-compatible inference servers.

use async_trait::async_trait;

use crate::error::LokalError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{CompletionRequest, CompletionResponse, ModelInfo};

/// Adapter for a chat-completions endpoint.
///
/// One call per user action; implementations do not retry.
#[async_trait]
pub trait CompletionProvider: ServiceAdapter {
    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LokalError>;

    /// Lists the models the server currently serves.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, LokalError>;
}
