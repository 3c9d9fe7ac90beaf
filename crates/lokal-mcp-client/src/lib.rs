// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool-execution service client for lokal.
//!
//! Talks to the local MCP tool server over its plain HTTP API: tool
//! discovery, tool calls, and typed wrappers for the built-in tools.

pub mod client;
pub mod tools;
pub mod types;

use async_trait::async_trait;
use lokal_core::{HealthStatus, LokalError, ServiceAdapter, ServiceKind};

pub use client::McpClient;
pub use types::{DEFAULT_TOOL_ERROR, ToolCallResponse};

#[async_trait]
impl ServiceAdapter for McpClient {
    fn name(&self) -> &str {
        "mcp"
    }

    fn kind(&self) -> ServiceKind {
        ServiceKind::Tools
    }

    async fn health_check(&self) -> Result<HealthStatus, LokalError> {
        match self.ping().await {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}
