// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the conversation memory service.
//!
//! The client starts disabled. [`MemoryClient::check_health`] probes the
//! service and enables persistence and vector search according to what the
//! service reports. Operations on a disabled client return empty results
//! without touching the network.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use lokal_config::model::MemoryConfig;
use lokal_core::LokalError;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::types::{
    CleanupResult, Conversation, HealthResponse, MemoryStats, NewConversation,
    SavedConversation, SearchQuery, SearchResults, SyncResult,
};

/// HTTP client for the memory service.
#[derive(Debug)]
pub struct MemoryClient {
    client: reqwest::Client,
    base_url: String,
    project_path: Option<String>,
    configured: bool,
    memory_enabled: AtomicBool,
    vector_enabled: AtomicBool,
}

impl MemoryClient {
    /// Creates a client for the service configured in `[memory]`.
    pub fn new(config: &MemoryConfig) -> Result<Self, LokalError> {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LokalError::Memory {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            project_path: config.project_path.clone(),
            configured: config.enabled,
            memory_enabled: AtomicBool::new(false),
            vector_enabled: AtomicBool::new(false),
        })
    }

    /// Whether conversations are currently persisted.
    pub fn memory_enabled(&self) -> bool {
        self.memory_enabled.load(Ordering::Relaxed)
    }

    /// Whether the service offers vector search.
    pub fn vector_enabled(&self) -> bool {
        self.vector_enabled.load(Ordering::Relaxed)
    }

    /// Probes `GET /health` and updates the enabled flags.
    ///
    /// Returns `true` when the service answered. Any failure clears both
    /// flags. A client disabled in config never probes.
    pub async fn check_health(&self) -> bool {
        if !self.configured {
            self.set_flags(false, false);
            return false;
        }

        match self.get_json::<HealthResponse>("health").await {
            Ok(health) => {
                self.set_flags(health.storage_available, health.vector_enabled);
                info!(
                    status = %health.status,
                    storage = health.storage_available,
                    vector = health.vector_enabled,
                    "memory service available"
                );
                true
            }
            Err(e) => {
                self.set_flags(false, false);
                warn!(error = %e, "memory service not available");
                false
            }
        }
    }

    /// Persists one conversation turn.
    ///
    /// Returns `Ok(None)` without a request when memory is disabled. A
    /// missing `project_path` is filled from config.
    pub async fn save_conversation(
        &self,
        conversation: &NewConversation,
    ) -> Result<Option<SavedConversation>, LokalError> {
        if !self.memory_enabled() {
            debug!("memory disabled, skipping save");
            return Ok(None);
        }

        let mut body = conversation.clone();
        if body.project_path.is_none() {
            body.project_path = self.project_path.clone();
        }

        let saved: SavedConversation = self.post_json("conversations", Some(&body)).await?;
        debug!(
            conversation_id = saved.conversation_id,
            importance = saved.importance_score,
            "conversation saved"
        );
        Ok(Some(saved))
    }

    /// Searches stored conversations.
    ///
    /// Vector search is only requested when the service reported it as
    /// available.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResults, LokalError> {
        if !self.memory_enabled() {
            return Ok(SearchResults::default());
        }

        let mut body = query.clone();
        body.use_vector = query.use_vector && self.vector_enabled();

        let results: SearchResults = self.post_json("search", Some(&body)).await?;
        debug!(
            total = results.total,
            search_type = results.search_type.as_deref().unwrap_or("unknown"),
            "memory search finished"
        );
        Ok(results)
    }

    pub async fn stats(&self) -> Result<Option<MemoryStats>, LokalError> {
        if !self.memory_enabled() {
            return Ok(None);
        }
        self.get_json("stats").await.map(Some)
    }

    /// Deletes conversations past their retention time.
    pub async fn cleanup(&self) -> Result<Option<CleanupResult>, LokalError> {
        if !self.memory_enabled() {
            return Ok(None);
        }
        let result: CleanupResult = self.post_json::<(), _>("cleanup", None).await?;
        info!(deleted = result.deleted_count, "memory cleanup completed");
        Ok(Some(result))
    }

    /// Pushes pending embeddings to the vector store.
    pub async fn sync_vectors(&self) -> Result<Option<SyncResult>, LokalError> {
        if !self.memory_enabled() || !self.vector_enabled() {
            debug!("vector sync not available");
            return Ok(None);
        }
        let result: SyncResult = self.post_json::<(), _>("sync-vectors", None).await?;
        info!(synced = result.synced, failed = result.failed, "vector sync completed");
        Ok(Some(result))
    }

    /// Fetches one conversation; `Ok(None)` when it does not exist.
    pub async fn get_conversation(&self, id: i64) -> Result<Option<Conversation>, LokalError> {
        if !self.memory_enabled() {
            return Ok(None);
        }

        let url = self.url(&format!("conversation/{id}"));
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| request_failed(&url, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(&url, response).await.map(Some)
    }

    fn set_flags(&self, memory: bool, vector: bool) {
        self.memory_enabled.store(memory, Ordering::Relaxed);
        self.vector_enabled.store(vector, Ordering::Relaxed);
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, LokalError> {
        let url = self.url(endpoint);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| request_failed(&url, e))?;
        decode(&url, response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, LokalError> {
        let url = self.url(endpoint);
        let mut request = self.client.post(&url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|e| request_failed(&url, e))?;
        decode(&url, response).await
    }
}

async fn decode<T: DeserializeOwned>(url: &str, response: reqwest::Response) -> Result<T, LokalError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(LokalError::memory(format!("{url} returned {status}: {body}")));
    }

    response.json::<T>().await.map_err(|e| LokalError::Memory {
        message: format!("invalid response from {url}: {e}"),
        source: Some(Box::new(e)),
    })
}

fn request_failed(url: &str, e: reqwest::Error) -> LokalError {
    LokalError::Memory {
        message: format!("request to {url} failed: {e}"),
        source: Some(Box::new(e)),
    }
}
