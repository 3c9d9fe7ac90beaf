// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for lokal integration tests.
//!
//! Provides a mock completion provider for fast, deterministic tests
//! without a running inference server.

pub mod mock_provider;

pub use mock_provider::MockProvider;
