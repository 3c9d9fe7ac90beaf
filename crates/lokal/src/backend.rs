// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring of the service clients behind the bridge.

use std::sync::Arc;

use lokal_bridge::{Backend, BridgeHandle};
use lokal_config::LokalConfig;
use lokal_config::model::MemoryConfig;
use lokal_core::LokalError;
use lokal_inference::InferenceClient;
use lokal_memory::MemoryClient;
use lokal_router::ModelRouter;
use tracing::debug;

/// Connect to the memory service if it is enabled.
///
/// The health probe sets the client's storage and vector flags; an
/// unreachable service still yields a client that skips every save.
pub async fn connect_memory(config: &MemoryConfig) -> Result<Option<Arc<MemoryClient>>, LokalError> {
    if !config.enabled {
        debug!("memory disabled in config");
        return Ok(None);
    }
    let client = MemoryClient::new(config)?;
    client.check_health().await;
    Ok(Some(Arc::new(client)))
}

/// Build the backend from config and start it.
pub async fn start_backend(
    config: &LokalConfig,
    router: ModelRouter,
) -> Result<BridgeHandle, LokalError> {
    let provider = InferenceClient::new(&config.inference)?;
    let memory = connect_memory(&config.memory).await?;
    Ok(Backend::new(router, Arc::new(provider), memory)
        .with_inference_config(config.inference.clone())
        .spawn())
}
