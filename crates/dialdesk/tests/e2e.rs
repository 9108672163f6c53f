// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests running the `dialdesk` binary against a temporary database.

use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

fn dialdesk(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dialdesk"))
        .args(args)
        .current_dir(dir)
        .env("DIALDESK_STORAGE_DATABASE_PATH", dir.join("data/dialdesk.db"))
        .env("DIALDESK_APP_LOG_LEVEL", "warn")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run dialdesk binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn seed_then_stats_reports_the_demo_data() {
    let dir = tempfile::tempdir().unwrap();

    let seeded = dialdesk(dir.path(), &["seed"]);
    assert!(seeded.status.success(), "seed failed: {seeded:?}");
    assert!(stdout(&seeded).contains("created 5 users, 5 clients, 7 calls"));
    assert!(dir.path().join("data/dialdesk.db").exists());

    let again = dialdesk(dir.path(), &["seed"]);
    assert!(again.status.success());
    assert!(stdout(&again).contains("nothing to do"));

    let stats = dialdesk(dir.path(), &["stats", "--json"]);
    assert!(stats.status.success(), "stats failed: {stats:?}");
    let report: Value = serde_json::from_str(&stdout(&stats)).unwrap();

    let dashboard = &report["dashboard"];
    assert_eq!(dashboard["totalClients"], 5);
    assert_eq!(dashboard["activeClients"], 3);
    assert_eq!(dashboard["totalCalls"], 7);
    assert_eq!(dashboard["effectiveCalls"], 4);
    assert_eq!(dashboard["pendingAssignments"], 2);
    assert_eq!(dashboard["effectiveRatePercent"], 57);

    let team = report["team"].as_array().unwrap();
    assert_eq!(team.len(), 3);
    let mike = team
        .iter()
        .find(|row| row["userName"] == "Mike Johnson")
        .unwrap();
    assert_eq!(mike["totalCalls"], 2);
    assert_eq!(mike["clientsAssigned"], 1);
}

#[test]
fn stats_on_an_empty_store_prints_zeroes() {
    let dir = tempfile::tempdir().unwrap();
    let output = dialdesk(dir.path(), &["stats"]);
    assert!(output.status.success(), "stats failed: {output:?}");
    let text = stdout(&output);
    assert!(text.contains("0 total, 0 active"));
    assert!(text.contains("(no agents)"));
}

#[test]
fn invalid_config_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[listing]\npage_size = 0\n").unwrap();

    let output = dialdesk(dir.path(), &["--config", config.to_str().unwrap(), "stats"]);
    assert!(!output.status.success());
}
