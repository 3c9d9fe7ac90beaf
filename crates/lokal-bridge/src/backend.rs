// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend task and the front-end handle that talks to it.
//!
//! The backend owns the router, the completion provider, and the optional
//! memory client. It runs as a single Tokio task draining an mpsc channel;
//! each chat request is handled on its own spawned task so a slow completion
//! never blocks a model status query.

use std::sync::Arc;
use std::time::{Duration, Instant};

use lokal_config::model::InferenceConfig;
use lokal_core::CompletionProvider;
use lokal_inference::request_for_query;
use lokal_memory::{MemoryClient, NewConversation};
use lokal_router::ModelRouter;
use tokio::sync::{mpsc, oneshot};
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::types::{BridgeRequest, ChatOutcome, ChatParams, ModelStatusOutcome};

/// Inbound request queue depth.
const CHANNEL_CAPACITY: usize = 64;

/// Message returned when the backend task is no longer running.
pub const BACKEND_UNAVAILABLE: &str = "backend unavailable";

/// Owns the collaborators that answer bridge requests.
pub struct Backend {
    router: ModelRouter,
    provider: Arc<dyn CompletionProvider>,
    memory: Option<Arc<MemoryClient>>,
    inference: InferenceConfig,
    saves: TaskTracker,
}

impl Backend {
    pub fn new(
        router: ModelRouter,
        provider: Arc<dyn CompletionProvider>,
        memory: Option<Arc<MemoryClient>>,
    ) -> Self {
        Self {
            router,
            provider,
            memory,
            inference: InferenceConfig::default(),
            saves: TaskTracker::new(),
        }
    }

    /// Use the given completion parameters (length, temperature, code prompt).
    pub fn with_inference_config(mut self, inference: InferenceConfig) -> Self {
        self.inference = inference;
        self
    }

    /// Start the backend task and return a handle to it.
    ///
    /// The task exits once every handle has been dropped.
    pub fn spawn(self) -> BridgeHandle {
        let (tx, mut rx) = mpsc::channel::<BridgeRequest>(CHANNEL_CAPACITY);
        let saves = self.saves.clone();
        let backend = Arc::new(self);

        tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                let backend = Arc::clone(&backend);
                tokio::spawn(async move {
                    backend.dispatch(request).await;
                });
            }
            debug!("bridge backend stopped");
        });

        BridgeHandle { tx, saves }
    }

    async fn dispatch(&self, request: BridgeRequest) {
        match request {
            BridgeRequest::AiChat { params, reply } => {
                let outcome = self.chat(params).await;
                if reply.send(outcome).is_err() {
                    debug!("chat caller went away before the reply");
                }
            }
            BridgeRequest::ModelStatus { reply } => {
                let outcome = self.model_status().await;
                if reply.send(outcome).is_err() {
                    debug!("model status caller went away before the reply");
                }
            }
        }
    }

    /// Route one message, ask the provider, and record the turn.
    pub async fn chat(&self, params: ChatParams) -> ChatOutcome {
        let decision = self.router.route(&params.message, &params.mode);

        // A pinned type still selects the code prompt and temperature.
        let request_type = decision.query_type.or(params.forced);
        let mut request = request_for_query(
            &self.inference,
            &decision.target_model,
            &params.message,
            request_type,
        );
        if let Some(max_tokens) = params.max_tokens {
            request.max_tokens = max_tokens;
        }

        let started = Instant::now();
        let response = match self.provider.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(model = %decision.target_model, error = %e, "completion failed");
                return ChatOutcome::failure(e.to_string());
            }
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            model = %response.model,
            elapsed_ms,
            "completion received"
        );

        if let Some(memory) = &self.memory {
            let conversation = NewConversation {
                user_query: params.message.clone(),
                ai_response: response.content.clone(),
                model_used: Some(response.model.clone()),
                session_id: params.session_id.clone(),
                response_time_ms: Some(elapsed_ms),
                token_count: response.usage.map(|u| u.total_tokens),
                project_path: None,
            };
            let memory = Arc::clone(memory);
            self.saves.spawn(async move {
                if let Err(e) = memory.save_conversation(&conversation).await {
                    warn!(error = %e, "failed to save conversation");
                }
            });
        }

        ChatOutcome::Success {
            response: response.content,
            model: response.model,
            query_type: decision.query_type,
            auto_detected: decision.auto_detected,
        }
    }

    /// List the models the inference server reports.
    pub async fn model_status(&self) -> ModelStatusOutcome {
        match self.provider.list_models().await {
            Ok(models) => ModelStatusOutcome::models(models),
            Err(e) => {
                warn!(error = %e, "model status request failed");
                ModelStatusOutcome::failure(e.to_string())
            }
        }
    }
}

/// Front-end side of the bridge. Cheap to clone.
#[derive(Debug, Clone)]
pub struct BridgeHandle {
    tx: mpsc::Sender<BridgeRequest>,
    saves: TaskTracker,
}

impl BridgeHandle {
    /// Send one chat message and wait for the outcome.
    pub async fn ai_chat(&self, params: ChatParams) -> ChatOutcome {
        let (reply, rx) = oneshot::channel();
        if self
            .tx
            .send(BridgeRequest::AiChat { params, reply })
            .await
            .is_err()
        {
            return ChatOutcome::failure(BACKEND_UNAVAILABLE);
        }
        rx.await
            .unwrap_or_else(|_| ChatOutcome::failure(BACKEND_UNAVAILABLE))
    }

    /// Ask the backend for the inference server's model list.
    pub async fn model_status(&self) -> ModelStatusOutcome {
        let (reply, rx) = oneshot::channel();
        if self
            .tx
            .send(BridgeRequest::ModelStatus { reply })
            .await
            .is_err()
        {
            return ModelStatusOutcome::failure(BACKEND_UNAVAILABLE);
        }
        rx.await
            .unwrap_or_else(|_| ModelStatusOutcome::failure(BACKEND_UNAVAILABLE))
    }

    /// Whether the backend task is still accepting requests.
    pub fn is_connected(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Wait up to `timeout` for pending memory saves to finish.
    ///
    /// Returns `false` if saves were still running when the timeout hit.
    pub async fn flush(&self, timeout: Duration) -> bool {
        self.saves.close();
        let done = tokio::time::timeout(timeout, self.saves.wait())
            .await
            .is_ok();
        self.saves.reopen();
        done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lokal_config::model::MemoryConfig;
    use lokal_core::QueryType;
    use lokal_router::RoutingMode;
    use lokal_test_utils::MockProvider;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn router() -> ModelRouter {
        ModelRouter::new("chat-7b", "code-7b")
    }

    #[tokio::test]
    async fn auto_mode_routes_code_to_code_model() {
        let provider = MockProvider::with_responses(vec!["fn main() {}".to_string()]);
        let handle = Backend::new(router(), Arc::new(provider.clone()), None).spawn();

        let outcome = handle
            .ai_chat(ChatParams::new("write a function in rust", RoutingMode::Auto))
            .await;

        assert_eq!(
            outcome,
            ChatOutcome::Success {
                response: "fn main() {}".into(),
                model: "code-7b".into(),
                query_type: Some(QueryType::Code),
                auto_detected: true,
            }
        );
        let seen = provider.requests().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, "code-7b");
    }

    #[tokio::test]
    async fn default_mode_uses_chat_model() {
        let provider = MockProvider::new();
        let handle = Backend::new(router(), Arc::new(provider), None).spawn();

        let outcome = handle
            .ai_chat(ChatParams::new("write a function", RoutingMode::Default))
            .await;

        match outcome {
            ChatOutcome::Success {
                model,
                query_type,
                auto_detected,
                ..
            } => {
                assert_eq!(model, "chat-7b");
                assert_eq!(query_type, None);
                assert!(!auto_detected);
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn max_tokens_override_reaches_provider() {
        let provider = MockProvider::new();
        let handle = Backend::new(router(), Arc::new(provider.clone()), None)
            .with_inference_config(InferenceConfig {
                max_tokens: 512,
                ..Default::default()
            })
            .spawn();

        handle
            .ai_chat(ChatParams::new("hello", RoutingMode::Default).with_max_tokens(Some(64)))
            .await;
        handle
            .ai_chat(ChatParams::new("hello again", RoutingMode::Default))
            .await;

        let seen = provider.requests().await;
        assert_eq!(seen[0].max_tokens, 64);
        assert_eq!(seen[1].max_tokens, 512);
    }

    #[tokio::test]
    async fn forced_code_uses_code_prompt_and_temperature() {
        let provider = MockProvider::new();
        let router = router();
        let handle = Backend::new(router.clone(), Arc::new(provider.clone()), None)
            .with_inference_config(InferenceConfig {
                code_system_prompt: Some("You are a coding assistant.".to_string()),
                code_temperature: Some(0.2),
                ..Default::default()
            })
            .spawn();

        let forced = Some(QueryType::Code);
        let outcome = handle
            .ai_chat(ChatParams::new("tell me a story", router.mode_for(forced)).with_forced(forced))
            .await;
        handle
            .ai_chat(ChatParams::new(
                "tell me a story",
                RoutingMode::Manual {
                    selected_model: Some("big-model".to_string()),
                },
            ))
            .await;

        match outcome {
            ChatOutcome::Success {
                model, query_type, ..
            } => {
                assert_eq!(model, "code-7b");
                assert_eq!(query_type, None);
            }
            other => panic!("expected success, got {other:?}"),
        }
        let seen = provider.requests().await;
        assert_eq!(seen[0].messages.len(), 2);
        assert_eq!(seen[0].messages[0].role, "system");
        assert_eq!(seen[0].temperature, 0.2);
        // An explicit model without a pinned type is a plain chat request.
        assert_eq!(seen[1].messages.len(), 1);
        assert_eq!(seen[1].temperature, 0.3);
    }

    #[tokio::test]
    async fn provider_error_becomes_failure_outcome() {
        let provider = MockProvider::new();
        provider.add_failure("HTTP 500".to_string()).await;
        let handle = Backend::new(router(), Arc::new(provider), None).spawn();

        let outcome = handle
            .ai_chat(ChatParams::new("hi", RoutingMode::Auto))
            .await;

        match outcome {
            ChatOutcome::Failure { error } => assert!(error.contains("HTTP 500")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn model_status_lists_provider_models() {
        let provider = MockProvider::new().with_models(vec!["llama".to_string()]);
        let handle = Backend::new(router(), Arc::new(provider), None).spawn();

        match handle.model_status().await {
            ModelStatusOutcome::Success { success, data } => {
                assert!(success);
                assert_eq!(data.len(), 1);
                assert_eq!(data[0].id, "llama");
            }
            other => panic!("expected models, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn handles_are_shared_across_tasks() {
        let provider = MockProvider::new();
        let handle = Backend::new(router(), Arc::new(provider.clone()), None).spawn();

        let mut tasks = Vec::new();
        for i in 0..8 {
            let handle = handle.clone();
            tasks.push(tokio::spawn(async move {
                handle
                    .ai_chat(ChatParams::new(format!("message {i}"), RoutingMode::Auto))
                    .await
            }));
        }
        for task in tasks {
            assert!(task.await.unwrap().is_success());
        }
        assert_eq!(provider.requests().await.len(), 8);
    }

    #[tokio::test]
    async fn completed_chat_is_saved_to_memory() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "healthy",
                "storage_available": true,
                "vector_enabled": false
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/conversations"))
            .and(body_partial_json(serde_json::json!({
                "user_query": "hello",
                "ai_response": "hi there",
                "model_used": "chat-7b",
                "session_id": "s-1",
                "token_count": 30
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "conversation_id": 1,
                "importance_score": 5
            })))
            .expect(1)
            .mount(&server)
            .await;

        let memory = MemoryClient::new(&MemoryConfig {
            base_url: server.uri(),
            ..Default::default()
        })
        .unwrap();
        assert!(memory.check_health().await);

        let provider = MockProvider::with_responses(vec!["hi there".to_string()]);
        let handle =
            Backend::new(router(), Arc::new(provider), Some(Arc::new(memory))).spawn();

        let outcome = handle
            .ai_chat(
                ChatParams::new("hello", RoutingMode::Default)
                    .with_session_id(Some("s-1".to_string())),
            )
            .await;
        assert!(outcome.is_success());

        assert!(handle.flush(Duration::from_secs(5)).await);
        server.verify().await;
    }

    #[tokio::test]
    async fn memory_failure_does_not_fail_chat() {
        let memory = MemoryClient::new(&MemoryConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..Default::default()
        })
        .unwrap();
        let provider = MockProvider::with_responses(vec!["answer".to_string()]);
        let handle =
            Backend::new(router(), Arc::new(provider), Some(Arc::new(memory))).spawn();

        let outcome = handle
            .ai_chat(ChatParams::new("question", RoutingMode::Auto))
            .await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn dropped_backend_reports_unavailable() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let handle = BridgeHandle {
            tx,
            saves: TaskTracker::new(),
        };

        assert!(!handle.is_connected());
        assert_eq!(
            handle.ai_chat(ChatParams::new("hi", RoutingMode::Auto)).await,
            ChatOutcome::failure(BACKEND_UNAVAILABLE)
        );
        assert_eq!(
            handle.model_status().await,
            ModelStatusOutcome::failure(BACKEND_UNAVAILABLE)
        );
    }
}
