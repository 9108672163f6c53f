// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Dialdesk configuration system.

use dialdesk_config::diagnostic::{ConfigError, suggest_key};
use serial_test::serial;
use dialdesk_config::model::DialdeskConfig;
use dialdesk_config::{
    load_and_validate_path, load_and_validate_str, load_config_from_path, load_config_from_str,
};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_dialdesk_config() {
    let toml = r#"
[app]
name = "north-floor"
log_level = "debug"
timezone = "America/Bogota"

[storage]
enabled = true
database_path = "/tmp/dialdesk-test.db"
wal_mode = false
snapshot_interval_secs = 5

[gateway]
host = "0.0.0.0"
port = 8088
bearer_token = "secret"

[listing]
page_size = 25
max_page_size = 50

[limits]
max_text_len = 500

[prometheus]
enabled = true
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.name, "north-floor");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.app.tz(), Some(chrono_tz::America::Bogota));
    assert_eq!(config.storage.database_path, "/tmp/dialdesk-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.storage.snapshot_interval_secs, 5);
    assert_eq!(config.gateway.host, "0.0.0.0");
    assert_eq!(config.gateway.port, 8088);
    assert_eq!(config.gateway.bearer_token.as_deref(), Some("secret"));
    assert_eq!(config.listing.page_size, 25);
    assert_eq!(config.listing.max_page_size, 50);
    assert_eq!(config.limits.max_text_len, 500);
    assert!(config.prometheus.enabled);
}

/// Empty input yields compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML is valid");
    let defaults = DialdeskConfig::default();
    assert_eq!(config.app.name, defaults.app.name);
    assert_eq!(config.app.timezone, "UTC");
    assert_eq!(config.gateway.port, 3180);
    assert_eq!(config.listing.page_size, 10);
    assert!(config.gateway.bearer_token.is_none());
    assert!(!config.prometheus.enabled);
}

/// Unknown field in [gateway] is rejected with a suggestion.
#[test]
fn unknown_gateway_key_suggests_port() {
    let toml = r#"
[gateway]
prot = 9000
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key,
            suggestion,
            valid_keys,
            ..
        } => {
            assert_eq!(key, "prot");
            assert_eq!(suggestion.as_deref(), Some("port"));
            assert!(valid_keys.contains("bearer_token"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[telephony]
provider = "acme"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown section");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("telephony"),
        "error should mention the unknown section, got: {err_str}"
    );
}

/// A string where a number belongs produces an InvalidType diagnostic.
#[test]
fn wrong_type_produces_invalid_type() {
    let toml = r#"
[gateway]
port = "eighty"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject wrong type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("port"))),
        "expected InvalidType for port, got: {errors:?}"
    );
}

/// Semantic validation runs after deserialization succeeds.
#[test]
fn semantic_errors_surface_through_load_and_validate() {
    let toml = r#"
[app]
timezone = "Nowhere/Special"

[listing]
page_size = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 2);
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}

/// Files on disk load with the same rules as inline strings.
#[test]
#[serial]
fn load_from_path_reads_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dialdesk.toml");
    std::fs::write(&path, "[listing]\npage_size = 15\n").expect("write config");

    let config = load_config_from_path(&path).expect("file should load");
    assert_eq!(config.listing.page_size, 15);
}

/// A file with a typo reports the unknown key against that file.
#[test]
#[serial]
fn validated_path_load_reports_unknown_keys() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dialdesk.toml");
    std::fs::write(&path, "[gateway]\nprot = 8080\n").expect("write config");

    let errors = load_and_validate_path(&path).expect_err("typo should fail");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::UnknownKey { key, .. } if key == "prot"))
    );
}

/// `DIALDESK_<SECTION>_<KEY>` overrides the file.
#[test]
#[serial]
fn env_overrides_file_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dialdesk.toml");
    std::fs::write(&path, "[storage]\ndatabase_path = \"from-file.db\"\n").expect("write config");

    // SAFETY: serialized with every other test that reads the environment.
    unsafe { std::env::set_var("DIALDESK_STORAGE_DATABASE_PATH", "from-env.db") };
    let loaded = load_and_validate_path(&path);
    unsafe { std::env::remove_var("DIALDESK_STORAGE_DATABASE_PATH") };

    let config = loaded.expect("config should load");
    assert_eq!(config.storage.database_path, "from-env.db");
}

/// Suggestions work for every section's keys.
#[test]
fn suggestions_cover_common_typos() {
    assert_eq!(
        suggest_key("timezon", &["name", "log_level", "timezone"]),
        Some("timezone".to_string())
    );
    assert_eq!(
        suggest_key("database_pth", &["enabled", "database_path", "wal_mode"]),
        Some("database_path".to_string())
    );
}
