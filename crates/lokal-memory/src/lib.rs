// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation memory client for lokal.
//!
//! Persists finished chat turns to the local memory service and exposes its
//! search, statistics, and maintenance endpoints. Persistence is best-effort:
//! callers log failures and carry on.

pub mod client;
pub mod types;

use async_trait::async_trait;
use lokal_core::{HealthStatus, LokalError, ServiceAdapter, ServiceKind};

pub use client::MemoryClient;
pub use types::{
    CleanupResult, Conversation, ImportanceLevel, MemoryStats, NewConversation,
    SavedConversation, SearchQuery, SearchResults, SyncResult,
};

#[async_trait]
impl ServiceAdapter for MemoryClient {
    fn name(&self) -> &str {
        "memory"
    }

    fn kind(&self) -> ServiceKind {
        ServiceKind::Memory
    }

    async fn health_check(&self) -> Result<HealthStatus, LokalError> {
        if !self.check_health().await {
            return Ok(HealthStatus::Unhealthy(
                "memory service unavailable".to_string(),
            ));
        }
        if !self.memory_enabled() {
            return Ok(HealthStatus::Degraded("storage unavailable".to_string()));
        }
        if !self.vector_enabled() {
            return Ok(HealthStatus::Degraded("vector search disabled".to_string()));
        }
        Ok(HealthStatus::Healthy)
    }
}
