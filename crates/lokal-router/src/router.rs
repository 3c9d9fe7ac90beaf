// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model routing with auto-detection and manual overrides.
//!
//! Orchestrates model selection: manual selection > classify (auto) > chat model fallback.

use lokal_config::model::{InferenceConfig, RoutingConfig, RoutingModeSetting};
use lokal_core::{LokalError, QueryType};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classifier::QueryClassifier;

/// How a message's target model is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RoutingMode {
    /// Classify the message and pick the chat or code model.
    Auto,
    /// Use the caller's model. Without a selection this behaves like `Default`.
    Manual {
        #[serde(default, rename = "selectedModel")]
        selected_model: Option<String>,
    },
    /// No mode given: always the chat model.
    #[default]
    Default,
}

impl RoutingMode {
    /// Build the mode described by the `[routing]` config section.
    pub fn from_config(config: &RoutingConfig) -> Self {
        match config.mode {
            RoutingModeSetting::Auto => RoutingMode::Auto,
            RoutingModeSetting::Manual => RoutingMode::Manual {
                selected_model: config.selected_model.clone(),
            },
            RoutingModeSetting::Default => RoutingMode::Default,
        }
    }
}

/// Outcome of routing one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingDecision {
    /// Classified query type; present only when the decision was auto-detected.
    pub query_type: Option<QueryType>,
    /// Model identifier the completion request is sent to.
    pub target_model: String,
    /// Whether the classifier chose the model.
    pub auto_detected: bool,
}

/// Selects a target model for each message.
///
/// Holds only immutable configuration, so one router can serve any number
/// of concurrent callers.
#[derive(Debug, Clone)]
pub struct ModelRouter {
    classifier: QueryClassifier,
    chat_model: String,
    code_model: String,
    default_mode: RoutingMode,
}

impl ModelRouter {
    /// Create a router with the built-in classifier tables and the given model identifiers.
    pub fn new(chat_model: impl Into<String>, code_model: impl Into<String>) -> Self {
        Self {
            classifier: QueryClassifier::new(),
            chat_model: chat_model.into(),
            code_model: code_model.into(),
            default_mode: RoutingMode::Default,
        }
    }

    /// Create a router from the inference and routing config sections.
    pub fn from_config(
        inference: &InferenceConfig,
        routing: &RoutingConfig,
    ) -> Result<Self, LokalError> {
        Ok(Self {
            classifier: QueryClassifier::from_config(routing)?,
            chat_model: inference.chat_model.clone(),
            code_model: inference.code_model.clone(),
            default_mode: RoutingMode::from_config(routing),
        })
    }

    /// Replace the classifier.
    pub fn with_classifier(mut self, classifier: QueryClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Route a message to a model.
    ///
    /// Priority order:
    /// 1. Manual mode with a selected model
    /// 2. Auto mode: classify and map code/chat to the code/chat model
    /// 3. Anything else: the chat model
    pub fn route(&self, query: &str, mode: &RoutingMode) -> RoutingDecision {
        let decision = match mode {
            RoutingMode::Manual {
                selected_model: Some(model),
            } => RoutingDecision {
                query_type: None,
                target_model: model.clone(),
                auto_detected: false,
            },
            RoutingMode::Auto => {
                let query_type = self.classifier.classify(query);
                RoutingDecision {
                    query_type: Some(query_type),
                    target_model: self.model_for(query_type).to_string(),
                    auto_detected: true,
                }
            }
            RoutingMode::Manual {
                selected_model: None,
            }
            | RoutingMode::Default => RoutingDecision {
                query_type: None,
                target_model: self.chat_model.clone(),
                auto_detected: false,
            },
        };

        info!(
            target_model = decision.target_model.as_str(),
            query_type = ?decision.query_type,
            auto_detected = decision.auto_detected,
            "routed message"
        );

        decision
    }

    /// Model identifier serving the given query type.
    pub fn model_for(&self, query_type: QueryType) -> &str {
        match query_type {
            QueryType::Code => &self.code_model,
            QueryType::Chat => &self.chat_model,
        }
    }

    /// Mode to use for one message.
    ///
    /// A forced query type pins the matching model; otherwise the configured
    /// mode applies.
    pub fn mode_for(&self, forced: Option<QueryType>) -> RoutingMode {
        match forced {
            Some(query_type) => RoutingMode::Manual {
                selected_model: Some(self.model_for(query_type).to_string()),
            },
            None => self.default_mode.clone(),
        }
    }

    /// The mode configured in `[routing]`.
    pub fn default_mode(&self) -> &RoutingMode {
        &self.default_mode
    }

    pub fn classifier(&self) -> &QueryClassifier {
        &self.classifier
    }
}

impl Default for ModelRouter {
    fn default() -> Self {
        let inference = InferenceConfig::default();
        Self::new(inference.chat_model, inference.code_model)
    }
}

/// Route a message with the default tables and model identifiers.
pub fn select_model(query: &str, mode: &RoutingMode) -> RoutingDecision {
    ModelRouter::default().route(query, mode)
}

/// Parse a per-message `:code ` or `:chat ` prefix from user input.
///
/// Returns `(Some(query_type), rest_of_message)` if a prefix is found,
/// or `(None, original_message)` otherwise. The prefix is stripped from the
/// returned text.
pub fn parse_mode_prefix(text: &str) -> (Option<QueryType>, &str) {
    let trimmed = text.trim_start();
    if let Some(rest) = trimmed.strip_prefix(":code ") {
        (Some(QueryType::Code), rest)
    } else if let Some(rest) = trimmed.strip_prefix(":chat ") {
        (Some(QueryType::Chat), rest)
    } else {
        (None, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manual(model: &str) -> RoutingMode {
        RoutingMode::Manual {
            selected_model: Some(model.to_string()),
        }
    }

    #[test]
    fn auto_routes_code_to_code_model() {
        let decision = select_model("def foo(): pass", &RoutingMode::Auto);
        assert_eq!(
            decision,
            RoutingDecision {
                query_type: Some(QueryType::Code),
                target_model: "code-7b".to_string(),
                auto_detected: true,
            }
        );
    }

    #[test]
    fn auto_routes_chat_to_chat_model() {
        let decision = select_model("What is the weather today?", &RoutingMode::Auto);
        assert_eq!(decision.target_model, "chat-7b");
        assert_eq!(decision.query_type, Some(QueryType::Chat));
        assert!(decision.auto_detected);
    }

    #[test]
    fn manual_ignores_message_content() {
        for query in ["def foo(): pass", "hello there", ""] {
            let decision = select_model(query, &manual("custom-model"));
            assert_eq!(decision.target_model, "custom-model");
            assert_eq!(decision.query_type, None);
            assert!(!decision.auto_detected);
        }
    }

    #[test]
    fn default_mode_uses_chat_model() {
        let decision = select_model("def foo(): pass", &RoutingMode::Default);
        assert_eq!(
            decision,
            RoutingDecision {
                query_type: None,
                target_model: "chat-7b".to_string(),
                auto_detected: false,
            }
        );
    }

    #[test]
    fn manual_without_selection_falls_back_to_chat_model() {
        let decision = select_model(
            "import os",
            &RoutingMode::Manual {
                selected_model: None,
            },
        );
        assert_eq!(decision.target_model, "chat-7b");
        assert!(!decision.auto_detected);
    }

    #[test]
    fn empty_query_in_auto_is_chat() {
        let decision = select_model("", &RoutingMode::Auto);
        assert_eq!(decision.query_type, Some(QueryType::Chat));
        assert_eq!(decision.target_model, "chat-7b");
    }

    #[test]
    fn decision_serializes_camel_case() {
        let decision = select_model("def foo(): pass", &RoutingMode::Auto);
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "queryType": "code",
                "targetModel": "code-7b",
                "autoDetected": true
            })
        );

        let pinned = serde_json::to_value(select_model("x", &manual("m"))).unwrap();
        assert_eq!(pinned["queryType"], serde_json::Value::Null);
    }

    #[test]
    fn routing_mode_serde_shape() {
        let mode: RoutingMode =
            serde_json::from_str(r#"{"mode":"manual","selectedModel":"custom-model"}"#).unwrap();
        assert_eq!(mode, manual("custom-model"));
        let mode: RoutingMode = serde_json::from_str(r#"{"mode":"auto"}"#).unwrap();
        assert_eq!(mode, RoutingMode::Auto);
        assert_eq!(RoutingMode::default(), RoutingMode::Default);
    }

    #[test]
    fn router_uses_configured_models() {
        let inference = InferenceConfig {
            chat_model: "llama-chat".to_string(),
            code_model: "deepseek-coder".to_string(),
            ..Default::default()
        };
        let router = ModelRouter::from_config(&inference, &RoutingConfig::default()).unwrap();
        assert_eq!(
            router.route("write a python script", &RoutingMode::Auto).target_model,
            "deepseek-coder"
        );
        assert_eq!(
            router.route("tell me a story", &RoutingMode::Auto).target_model,
            "llama-chat"
        );
        assert_eq!(router.default_mode(), &RoutingMode::Auto);
    }

    #[test]
    fn from_config_reads_manual_mode() {
        let routing = RoutingConfig {
            mode: RoutingModeSetting::Manual,
            selected_model: Some("pinned".to_string()),
            ..Default::default()
        };
        let router = ModelRouter::from_config(&InferenceConfig::default(), &routing).unwrap();
        assert_eq!(router.mode_for(None), manual("pinned"));
    }

    #[test]
    fn from_config_propagates_bad_pattern() {
        let routing = RoutingConfig {
            code_patterns: Some(vec!["[".to_string()]),
            ..Default::default()
        };
        assert!(ModelRouter::from_config(&InferenceConfig::default(), &routing).is_err());
    }

    #[test]
    fn mode_for_forced_type_pins_model() {
        let router = ModelRouter::default();
        assert_eq!(router.mode_for(Some(QueryType::Code)), manual("code-7b"));
        assert_eq!(router.mode_for(Some(QueryType::Chat)), manual("chat-7b"));
        assert_eq!(router.mode_for(None), RoutingMode::Default);
    }

    #[test]
    fn parse_prefix_code() {
        let (forced, rest) = parse_mode_prefix(":code sort a list");
        assert_eq!(forced, Some(QueryType::Code));
        assert_eq!(rest, "sort a list");
    }

    #[test]
    fn parse_prefix_chat() {
        let (forced, rest) = parse_mode_prefix("  :chat what is a class action lawsuit");
        assert_eq!(forced, Some(QueryType::Chat));
        assert_eq!(rest, "what is a class action lawsuit");
    }

    #[test]
    fn parse_prefix_none() {
        let (forced, rest) = parse_mode_prefix("normal message");
        assert!(forced.is_none());
        assert_eq!(rest, "normal message");

        let (forced, _) = parse_mode_prefix(":codex thing");
        assert!(forced.is_none());
    }

    #[test]
    fn router_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ModelRouter>();
    }

    #[test]
    #[tracing_test::traced_test]
    fn routing_decision_is_logged() {
        let router = ModelRouter::new("chat-7b", "code-7b");
        router.route("fix this bug", &RoutingMode::Auto);
        assert!(logs_contain("routed message"));
        assert!(logs_contain("code-7b"));
    }
}
