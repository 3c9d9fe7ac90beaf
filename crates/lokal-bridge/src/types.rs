// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messages exchanged over the bridge.

use lokal_core::{ModelInfo, QueryType};
use lokal_router::RoutingMode;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// A request sent from the front-end to the backend task.
#[derive(Debug)]
pub enum BridgeRequest {
    /// Route and answer one chat message.
    AiChat {
        params: ChatParams,
        reply: oneshot::Sender<ChatOutcome>,
    },
    /// List the models the inference server has loaded.
    ModelStatus {
        reply: oneshot::Sender<ModelStatusOutcome>,
    },
}

/// Parameters of one chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatParams {
    pub message: String,
    #[serde(default)]
    pub mode: RoutingMode,
    /// Overrides the configured completion length.
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Session the turn is stored under in the memory service.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Query type the caller pinned (`--code`, `:code `). Selects the code
    /// prompt and temperature when routing itself did not classify.
    #[serde(default)]
    pub forced: Option<QueryType>,
}

impl ChatParams {
    pub fn new(message: impl Into<String>, mode: RoutingMode) -> Self {
        Self {
            message: message.into(),
            mode,
            max_tokens: None,
            session_id: None,
            forced: None,
        }
    }

    pub fn with_forced(mut self, forced: Option<QueryType>) -> Self {
        self.forced = forced;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_session_id(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }
}

/// Result of a chat request, as rendered by the front-end.
///
/// Serialized as `{"success": true, "response", "model", "queryType",
/// "autoDetected"}` or `{"success": false, "error"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ChatOutcomeWire", try_from = "ChatOutcomeWire")]
pub enum ChatOutcome {
    Success {
        response: String,
        model: String,
        query_type: Option<QueryType>,
        auto_detected: bool,
    },
    Failure {
        error: String,
    },
}

impl ChatOutcome {
    pub fn failure(error: impl Into<String>) -> Self {
        ChatOutcome::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ChatOutcome::Success { .. })
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatOutcomeWire {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(default, skip_serializing_if = "skip_query_type")]
    query_type: Option<Option<QueryType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auto_detected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// `queryType` is written as `null` on success and omitted on failure.
fn skip_query_type(query_type: &Option<Option<QueryType>>) -> bool {
    query_type.is_none()
}

impl From<ChatOutcome> for ChatOutcomeWire {
    fn from(outcome: ChatOutcome) -> Self {
        match outcome {
            ChatOutcome::Success {
                response,
                model,
                query_type,
                auto_detected,
            } => ChatOutcomeWire {
                success: true,
                response: Some(response),
                model: Some(model),
                query_type: Some(query_type),
                auto_detected: Some(auto_detected),
                error: None,
            },
            ChatOutcome::Failure { error } => ChatOutcomeWire {
                success: false,
                response: None,
                model: None,
                query_type: None,
                auto_detected: None,
                error: Some(error),
            },
        }
    }
}

impl TryFrom<ChatOutcomeWire> for ChatOutcome {
    type Error = String;

    fn try_from(wire: ChatOutcomeWire) -> Result<Self, Self::Error> {
        if !wire.success {
            return Ok(ChatOutcome::Failure {
                error: wire.error.unwrap_or_default(),
            });
        }
        let response = wire
            .response
            .ok_or_else(|| "successful outcome without `response`".to_string())?;
        Ok(ChatOutcome::Success {
            response,
            model: wire.model.unwrap_or_default(),
            query_type: wire.query_type.flatten(),
            auto_detected: wire.auto_detected.unwrap_or(false),
        })
    }
}

/// Result of a model status request.
///
/// Serialized as `{"success": true, "data": [...]}` or `{"success": false, "error"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelStatusOutcome {
    Success { success: bool, data: Vec<ModelInfo> },
    Failure { success: bool, error: String },
}

impl ModelStatusOutcome {
    pub fn models(data: Vec<ModelInfo>) -> Self {
        ModelStatusOutcome::Success {
            success: true,
            data,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        ModelStatusOutcome::Failure {
            success: false,
            error: error.into(),
        }
    }
}
