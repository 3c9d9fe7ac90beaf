// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the OpenAI-compatible chat completions and models endpoints.

use lokal_core::{ModelInfo, TokenUsage};
use serde::{Deserialize, Serialize};

// --- Response types ---

/// Response body of `POST /v1/chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,

    /// Model that served the request, when the server echoes it.
    #[serde(default)]
    pub model: Option<String>,

    pub choices: Vec<Choice>,

    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

/// One completion candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Assistant message inside a [`Choice`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    /// Some servers send `null` content for empty generations.
    #[serde(default)]
    pub content: Option<String>,
}

/// Response body of `GET /v1/models`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub data: Vec<ModelInfo>,
}

// --- Error types ---

/// OpenAI-style error envelope: `{"error": {"message": ..., "type": ...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_response_tolerates_minimal_body() {
        let body = r#"{"choices":[{"message":{"content":"hi"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("hi"));
        assert!(parsed.model.is_none());
        assert!(parsed.usage.is_none());
    }

    #[test]
    fn completion_response_reads_usage() {
        let body = r#"{
            "id": "cmpl-1",
            "model": "code-7b",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "x"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4}
        }"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.usage.unwrap().total_tokens, 4);
        assert_eq!(parsed.choices[0].finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn null_content_deserializes() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }

    #[test]
    fn model_list_parses_data() {
        let body = r#"{"object":"list","data":[{"id":"chat-7b","object":"model","owned_by":"local"},{"id":"code-7b"}]}"#;
        let parsed: ModelList = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.data[1].id, "code-7b");
        assert!(parsed.data[1].owned_by.is_none());
    }
}
