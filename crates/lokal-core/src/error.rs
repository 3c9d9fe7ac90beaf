// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for lokal.

use thiserror::Error;

/// The primary error type shared by the service clients, the router, and the bridge.
#[derive(Debug, Error)]
pub enum LokalError {
    /// Configuration errors (invalid TOML, bad routing tables, malformed URLs).
    #[error("configuration error: {0}")]
    Config(String),

    /// Completion service errors (connection failure, non-2xx status, malformed JSON).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Tool-execution service errors, including tools that reported `success: false`.
    #[error("tool `{tool}` failed: {message}")]
    Tool { tool: String, message: String },

    /// Memory service errors.
    #[error("memory error: {message}")]
    Memory {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The UI/backend bridge could not deliver a request or a reply.
    #[error("bridge error: {0}")]
    Bridge(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LokalError {
    /// Shorthand for a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        LokalError::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a memory error without an underlying source.
    pub fn memory(message: impl Into<String>) -> Self {
        LokalError::Memory {
            message: message.into(),
            source: None,
        }
    }
}
