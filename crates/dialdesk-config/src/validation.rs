// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as timezone names, bind addresses, and page size bounds.

use crate::diagnostic::ConfigError;
use crate::model::DialdeskConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &DialdeskConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.app.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.log_level `{}` must be one of: {}",
                config.app.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.app.tz().is_none() {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.timezone `{}` is not a known IANA timezone",
                config.app.timezone
            ),
        });
    }

    if config.storage.enabled && config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty when storage is enabled"
                .to_string(),
        });
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if let Some(token) = &config.gateway.bearer_token {
        if token.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "gateway.bearer_token must not be blank; omit it instead".to_string(),
            });
        }
    }

    if config.listing.page_size == 0 {
        errors.push(ConfigError::Validation {
            message: "listing.page_size must be at least 1".to_string(),
        });
    }

    if config.listing.page_size > config.listing.max_page_size {
        errors.push(ConfigError::Validation {
            message: format!(
                "listing.page_size ({}) must not exceed listing.max_page_size ({})",
                config.listing.page_size, config.listing.max_page_size
            ),
        });
    }

    if config.limits.max_text_len == 0 {
        errors.push(ConfigError::Validation {
            message: "limits.max_text_len must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
