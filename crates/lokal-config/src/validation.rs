// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints serde cannot express: URL schemes, non-empty model
//! identifiers, numeric ranges, and that routing patterns compile.

use crate::diagnostic::ConfigError;
use crate::model::{LokalConfig, RoutingModeSetting};

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &LokalConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "inference.base_url", &config.inference.base_url);
    check_url(&mut errors, "mcp.base_url", &config.mcp.base_url);
    check_url(&mut errors, "memory.base_url", &config.memory.base_url);

    check_non_empty(&mut errors, "inference.chat_model", &config.inference.chat_model);
    check_non_empty(&mut errors, "inference.code_model", &config.inference.code_model);

    if config.inference.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "inference.max_tokens must be greater than 0".to_string(),
        });
    }

    check_temperature(&mut errors, "inference.temperature", config.inference.temperature);
    if let Some(t) = config.inference.code_temperature {
        check_temperature(&mut errors, "inference.code_temperature", t);
    }

    for (key, secs) in [
        ("inference.timeout_secs", config.inference.timeout_secs),
        ("mcp.timeout_secs", config.mcp.timeout_secs),
        ("memory.timeout_secs", config.memory.timeout_secs),
    ] {
        if secs == 0 {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be at least 1"),
            });
        }
    }

    if config.routing.mode == RoutingModeSetting::Manual {
        if let Some(model) = &config.routing.selected_model {
            check_non_empty(&mut errors, "routing.selected_model", model);
        }
    }

    if let Some(keywords) = &config.routing.code_keywords {
        for (i, keyword) in keywords.iter().enumerate() {
            // An empty keyword is a substring of every query.
            if keyword.is_empty() {
                errors.push(ConfigError::Validation {
                    message: format!("routing.code_keywords[{i}] must not be empty"),
                });
            }
        }
    }

    if let Some(patterns) = &config.routing.code_patterns {
        for (i, pattern) in patterns.iter().enumerate() {
            if let Err(e) = regex::RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
            {
                errors.push(ConfigError::Validation {
                    message: format!("routing.code_patterns[{i}] `{pattern}` is not a valid regex: {e}"),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ConfigError>, key: &str, value: &str) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(ConfigError::Validation {
            message: format!("{key} must not be empty"),
        });
    } else if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        errors.push(ConfigError::Validation {
            message: format!("{key} `{trimmed}` must start with http:// or https://"),
        });
    }
}

fn check_non_empty(errors: &mut Vec<ConfigError>, key: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: format!("{key} must not be empty"),
        });
    }
}

fn check_temperature(errors: &mut Vec<ConfigError>, key: &str, value: f32) {
    if !(0.0..=2.0).contains(&value) {
        errors.push(ConfigError::Validation {
            message: format!("{key} must be between 0.0 and 2.0, got {value}"),
        });
    }
}
