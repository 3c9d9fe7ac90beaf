// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for lokal.
//!
//! This crate provides the error type, the wire-neutral request/response
//! types, and the adapter traits shared by every other crate in the workspace.

pub mod error;
pub mod traits;
pub mod types;

pub use error::LokalError;
pub use types::{
    ChatMessage, CompletionRequest, CompletionResponse, HealthStatus, ModelInfo, QueryType,
    ServiceKind, TokenUsage,
};

pub use traits::{CompletionProvider, ServiceAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lokal_error_has_all_variants() {
        let _config = LokalError::Config("test".into());
        let _provider = LokalError::provider("test");
        let _tool = LokalError::Tool {
            tool: "read_file".into(),
            message: "denied".into(),
        };
        let _memory = LokalError::memory("test");
        let _bridge = LokalError::Bridge("closed".into());
        let _timeout = LokalError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = LokalError::Internal("test".into());
    }

    #[test]
    fn tool_error_names_the_tool() {
        let err = LokalError::Tool {
            tool: "run_command".into(),
            message: "Permission denied".into(),
        };
        assert_eq!(err.to_string(), "tool `run_command` failed: Permission denied");
    }

    #[test]
    fn query_type_display_and_parse() {
        use std::str::FromStr;

        assert_eq!(QueryType::Code.to_string(), "code");
        assert_eq!(QueryType::Chat.to_string(), "chat");
        assert_eq!(QueryType::from_str("CODE").unwrap(), QueryType::Code);
        assert!(QueryType::from_str("poetry").is_err());
    }

    #[test]
    fn query_type_serializes_lowercase() {
        let json = serde_json::to_string(&QueryType::Code).unwrap();
        assert_eq!(json, "\"code\"");
        let parsed: QueryType = serde_json::from_str("\"chat\"").unwrap();
        assert_eq!(parsed, QueryType::Chat);
    }

    #[test]
    fn chat_message_constructors() {
        assert_eq!(ChatMessage::user("hi").role, "user");
        assert_eq!(ChatMessage::system("be brief").role, "system");
    }

    #[test]
    fn model_info_tolerates_missing_fields() {
        let info: ModelInfo = serde_json::from_str(r#"{"id":"chat-7b"}"#).unwrap();
        assert_eq!(info.id, "chat-7b");
        assert!(info.owned_by.is_none());
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_service_adapter<T: ServiceAdapter>() {}
        fn _assert_completion_provider<T: CompletionProvider>() {}
    }
}
