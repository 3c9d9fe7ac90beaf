// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait every service client implements.

use async_trait::async_trait;

use crate::error::LokalError;
use crate::types::{HealthStatus, ServiceKind};

/// Identity and health reporting for a service client.
#[async_trait]
pub trait ServiceAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this client instance.
    fn name(&self) -> &str;

    /// Returns which external service this client targets.
    fn kind(&self) -> ServiceKind;

    /// Performs a health check and returns the service's current status.
    async fn health_check(&self) -> Result<HealthStatus, LokalError>;
}
