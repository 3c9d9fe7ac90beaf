// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the tool service's HTTP API.

use serde::{Deserialize, Serialize};

/// Message used when a tool reports failure without saying why.
pub const DEFAULT_TOOL_ERROR: &str = "tool execution failed";

/// Response body of `POST /tools/{name}/call`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ToolCallResponse {
    /// Split into the tool's result or its failure message.
    pub fn into_result(self) -> Result<serde_json::Value, String> {
        if self.success {
            Ok(self.result.unwrap_or(serde_json::Value::Null))
        } else {
            Err(self
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| DEFAULT_TOOL_ERROR.to_string()))
        }
    }
}

/// Error body returned by the service's middleware (e.g. RBAC denials).
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
}
