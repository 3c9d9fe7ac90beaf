// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the tool-execution service.
//!
//! The service exposes `GET /tools` for discovery and
//! `POST /tools/{name}/call` for execution, with the tool's argument object
//! as the request body.

use std::time::Duration;

use lokal_config::model::McpConfig;
use lokal_core::LokalError;
use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tracing::debug;

use crate::types::{ServiceErrorBody, ToolCallResponse};

/// Header the service's RBAC middleware reads the caller identity from.
const USER_ID_HEADER: &str = "x-user-id";

/// Pseudo tool name used in errors from the discovery endpoint.
const LIST_TOOLS: &str = "tools/list";

/// HTTP client for the tool service.
#[derive(Debug, Clone)]
pub struct McpClient {
    client: reqwest::Client,
    base_url: String,
}

impl McpClient {
    /// Creates a client for the service configured in `[mcp]`.
    pub fn new(config: &McpConfig) -> Result<Self, LokalError> {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        if let Some(user_id) = &config.user_id {
            headers.insert(
                HeaderName::from_static(USER_ID_HEADER),
                HeaderValue::from_str(user_id).map_err(|e| {
                    LokalError::Config(format!("invalid mcp.user_id header value: {e}"))
                })?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LokalError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lists the tools the service offers, returned as the service sent them.
    pub async fn list_tools(&self) -> Result<Value, LokalError> {
        let url = format!("{}/tools", self.base_url);
        debug!(url = %url, "listing tools");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| request_failed(LIST_TOOLS, e))?;

        let response = check_status(LIST_TOOLS, response).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| invalid_body(LIST_TOOLS, e))
    }

    /// Executes a tool and returns its result.
    ///
    /// `Value::Null` arguments are sent as an empty object. A response with
    /// `success: false` becomes [`LokalError::Tool`] carrying the service's
    /// message.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value, LokalError> {
        let url = self.tool_call_url(name)?;
        let body = if arguments.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            arguments
        };
        debug!(tool = name, "calling tool");

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| request_failed(name, e))?;

        let response = check_status(name, response).await?;
        let parsed: ToolCallResponse = response.json().await.map_err(|e| invalid_body(name, e))?;

        parsed.into_result().map_err(|message| LokalError::Tool {
            tool: name.to_string(),
            message,
        })
    }

    /// `{base}/tools/{name}/call` with `name` encoded as a single segment.
    fn tool_call_url(&self, name: &str) -> Result<Url, LokalError> {
        let invalid = |message: String| LokalError::Tool {
            tool: name.to_string(),
            message,
        };
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| invalid(format!("invalid base URL `{}`: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| invalid(format!("base URL `{}` cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(["tools", name, "call"]);
        Ok(url)
    }

    /// `GET /health` returned a 2xx status.
    pub async fn ping(&self) -> Result<(), LokalError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| request_failed("health", e))?;
        check_status("health", response).await.map(|_| ())
    }
}

async fn check_status(
    tool: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, LokalError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ServiceErrorBody>(&body) {
        Ok(err) => format!("HTTP {}: {}", status.as_u16(), err.error),
        Err(_) => format!("HTTP {}", status.as_u16()),
    };
    Err(LokalError::Tool {
        tool: tool.to_string(),
        message,
    })
}

fn request_failed(tool: &str, e: reqwest::Error) -> LokalError {
    LokalError::Tool {
        tool: tool.to_string(),
        message: format!("request failed: {e}"),
    }
}

fn invalid_body(tool: &str, e: reqwest::Error) -> LokalError {
    LokalError::Tool {
        tool: tool.to_string(),
        message: format!("invalid response body: {e}"),
    }
}
