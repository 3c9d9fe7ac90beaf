// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits for the external services lokal talks to.
//!
//! All adapters extend [`ServiceAdapter`] and use `#[async_trait]` for
//! dynamic dispatch compatibility.

pub mod adapter;
pub mod provider;

pub use adapter::ServiceAdapter;
pub use provider::CompletionProvider;
