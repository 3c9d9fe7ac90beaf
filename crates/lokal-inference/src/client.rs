// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for an OpenAI-compatible inference server.
//!
//! Provides [`InferenceClient`] which handles request construction and
//! response decoding for the chat completions and models endpoints.
//! Requests are sent exactly once; there is no retry.

use std::time::Duration;

use lokal_config::model::InferenceConfig;
use lokal_core::{CompletionRequest, CompletionResponse, LokalError};
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::types::{ApiErrorResponse, ChatCompletionResponse, ModelList};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";
const MODELS_PATH: &str = "/v1/models";

/// HTTP client for the completion service.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl InferenceClient {
    /// Creates a client for the server configured in `[inference]`.
    pub fn new(config: &InferenceConfig) -> Result<Self, LokalError> {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| LokalError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a chat completion request and returns the first choice.
    pub async fn chat_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LokalError> {
        let url = format!("{}{COMPLETIONS_PATH}", self.base_url);
        debug!(url = %url, model = %request.model, "sending completion request");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        debug!(status = %status, "completion response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LokalError::provider(error_message(status, &body)));
        }

        let body = response.text().await.map_err(|e| LokalError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|e| LokalError::Provider {
                message: format!("failed to parse completion response: {e}"),
                source: Some(Box::new(e)),
            })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LokalError::provider("completion response contained no choices"))?;

        Ok(CompletionResponse {
            model: parsed.model.unwrap_or_else(|| request.model.clone()),
            content: choice.message.content.unwrap_or_default(),
            usage: parsed.usage,
        })
    }

    /// Lists the models currently served.
    pub async fn list_models(&self) -> Result<ModelList, LokalError> {
        let url = format!("{}{MODELS_PATH}", self.base_url);
        debug!(url = %url, "listing models");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LokalError::provider(error_message(status, &body)));
        }

        response.json::<ModelList>().await.map_err(|e| LokalError::Provider {
            message: format!("failed to parse model list: {e}"),
            source: Some(Box::new(e)),
        })
    }

    fn request_error(&self, e: reqwest::Error) -> LokalError {
        if e.is_timeout() {
            LokalError::Timeout {
                duration: self.timeout,
            }
        } else {
            LokalError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            }
        }
    }
}

/// Builds an error message from a non-2xx response, preferring the server's
/// structured error when it sends one.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) => match api_err.error.type_ {
            Some(kind) => format!("server error ({kind}): {}", api_err.error.message),
            None => format!("server error: {}", api_err.error.message),
        },
        Err(_) => format!("server returned {status}: {body}"),
    }
}
