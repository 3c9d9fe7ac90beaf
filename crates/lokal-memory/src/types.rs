// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory service domain and wire types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::Display;

/// Default number of search results.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Response body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub storage_available: bool,
    #[serde(default)]
    pub vector_enabled: bool,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// A conversation turn to persist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewConversation {
    pub user_query: String,
    pub ai_response: String,
    pub model_used: Option<String>,
    pub session_id: Option<String>,
    pub response_time_ms: Option<u64>,
    pub token_count: Option<u32>,
    /// Project the conversation belongs to; `None` is the service's default project.
    pub project_path: Option<String>,
}

/// Response body of `POST /conversations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedConversation {
    pub conversation_id: i64,
    #[serde(default)]
    pub project_id: Option<String>,
    pub importance_score: u8,
    #[serde(default = "default_true")]
    pub success: bool,
}

/// A stored conversation as returned by search and lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub user_query: String,
    pub ai_response: String,
    #[serde(default)]
    pub model_used: Option<String>,
    #[serde(default = "default_importance")]
    pub importance_score: u8,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub token_count: Option<u32>,
    #[serde(default)]
    pub response_time_ms: Option<u64>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    /// Service-specific fields (tags, project context, search scores).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Conversation {
    pub fn importance(&self) -> ImportanceLevel {
        ImportanceLevel::from_score(self.importance_score)
    }
}

/// Request body of `POST /search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub use_vector: bool,
    pub importance_min: Option<u8>,
    pub limit: u32,
    pub offset: u32,
}

impl SearchQuery {
    /// Keyword search with the default limit.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            use_vector: false,
            importance_min: None,
            limit: DEFAULT_SEARCH_LIMIT,
            offset: 0,
        }
    }

    pub fn with_vector(mut self, use_vector: bool) -> Self {
        self.use_vector = use_vector;
        self
    }

    pub fn with_importance_min(mut self, min: Option<u8>) -> Self {
        self.importance_min = min;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// Response body of `POST /search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub results: Vec<Conversation>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub search_type: Option<String>,
}

/// Response body of `GET /stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStats {
    pub project_id: String,
    pub total_conversations: u64,
    pub avg_importance: f64,
    #[serde(default)]
    pub oldest_conversation: Option<String>,
    #[serde(default)]
    pub latest_conversation: Option<String>,
    /// Conversation count per importance score.
    #[serde(default)]
    pub importance_distribution: BTreeMap<u8, u64>,
    /// Conversation count per model identifier.
    #[serde(default)]
    pub model_usage: BTreeMap<String, u64>,
    #[serde(default)]
    pub vector_enabled: bool,
    #[serde(default)]
    pub storage_available: bool,
}

/// Response body of `POST /cleanup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupResult {
    #[serde(default)]
    pub project_id: Option<String>,
    pub deleted_count: u64,
}

/// Response body of `POST /sync-vectors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub synced: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub message: Option<String>,
}

/// Display bucket for a conversation's importance score (1-10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ImportanceLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl ImportanceLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            9.. => ImportanceLevel::Critical,
            7..=8 => ImportanceLevel::High,
            5..=6 => ImportanceLevel::Medium,
            _ => ImportanceLevel::Low,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_importance() -> u8 {
    5
}
