// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed request/response bridge between the lokal front-end and its backend.
//!
//! The front-end holds a cloneable [`BridgeHandle`]; the [`Backend`] runs as a
//! Tokio task that routes each message, calls the completion provider, and
//! records finished turns in the memory service. Failures come back as
//! [`ChatOutcome::Failure`] values, never as errors or panics.

pub mod backend;
pub mod types;

pub use backend::{BACKEND_UNAVAILABLE, Backend, BridgeHandle};
pub use types::{BridgeRequest, ChatOutcome, ChatParams, ModelStatusOutcome};
