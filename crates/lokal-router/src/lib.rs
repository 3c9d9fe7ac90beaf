// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query classification and model routing for lokal.
//!
//! This crate provides:
//! - [`QueryClassifier`]: keyword and pattern based chat/code classification
//! - [`ModelRouter`]: mode-aware model selection producing a [`RoutingDecision`]
//!
//! The router runs before every completion call and decides which local
//! model receives the message. It holds no per-call state; every decision is
//! recomputed from the message and the requested mode.

pub mod classifier;
pub mod router;

pub use classifier::{DEFAULT_CODE_KEYWORDS, DEFAULT_CODE_PATTERNS, QueryClassifier};
pub use router::{ModelRouter, RoutingDecision, RoutingMode, parse_mode_prefix, select_model};
