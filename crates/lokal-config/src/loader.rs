// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./lokal.toml` > `~/.config/lokal/lokal.toml` > `/etc/lokal/lokal.toml`
//! with environment variable overrides via `LOKAL_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::LokalConfig;

/// System-wide config file location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/lokal/lokal.toml";

/// Local (working directory) config file name.
pub const LOCAL_CONFIG_FILE: &str = "lokal.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/lokal/lokal.toml` (system-wide)
/// 3. `~/.config/lokal/lokal.toml` (user XDG config)
/// 4. `./lokal.toml` (local directory)
/// 5. `LOKAL_*` environment variables
pub fn load_config() -> Result<LokalConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<LokalConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LokalConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LokalConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LokalConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(LokalConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("lokal").join(LOCAL_CONFIG_FILE))
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `LOKAL_INFERENCE_CHAT_MODEL` must map to
/// `inference.chat_model`, not `inference.chat.model`.
fn env_provider() -> Env {
    Env::prefixed("LOKAL_").map(|key| env_key_to_path(key.as_str()).into())
}

/// Map an unprefixed env key (`INFERENCE_CHAT_MODEL`) to its config path
/// (`inference.chat_model`). Keys outside a known section pass through
/// lower-cased.
fn env_key_to_path(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ["agent", "inference", "routing", "mcp", "memory"] {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}
