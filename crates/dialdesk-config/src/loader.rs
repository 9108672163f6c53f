// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./dialdesk.toml` > `~/.config/dialdesk/dialdesk.toml` >
//! `/etc/dialdesk/dialdesk.toml`, with environment variable overrides via the
//! `DIALDESK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::DialdeskConfig;

/// Sections that environment variables may target, in match order.
const ENV_SECTIONS: &[&str] = &[
    "app",
    "storage",
    "gateway",
    "listing",
    "limits",
    "prometheus",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/dialdesk/dialdesk.toml` (system-wide)
/// 3. `~/.config/dialdesk/dialdesk.toml` (user XDG config)
/// 4. `./dialdesk.toml` (local directory)
/// 5. `DIALDESK_*` environment variables
pub fn load_config() -> Result<DialdeskConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<DialdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DialdeskConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DialdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DialdeskConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(DialdeskConfig::default()))
        .merge(Toml::file("/etc/dialdesk/dialdesk.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("dialdesk/dialdesk.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("dialdesk.toml"))
        .merge(env_provider())
}

/// Map `DIALDESK_<SECTION>_<KEY>` onto `section.key`.
///
/// Only the first underscore after the section name becomes a dot, so
/// `DIALDESK_STORAGE_DATABASE_PATH` maps to `storage.database_path`.
fn env_provider() -> Env {
    Env::prefixed("DIALDESK_").map(|key| map_env_key(key.as_str()).into())
}

pub(crate) fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
