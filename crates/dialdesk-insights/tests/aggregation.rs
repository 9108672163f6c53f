// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for dashboard statistics and agent performance.

use chrono::{Duration, TimeZone, Utc};
use dialdesk_core::{CallStatus, ClientStatus, ErrorKind, Role};
use dialdesk_service::ClientUpdate;
use dialdesk_test_utils::TestHarness;

#[test]
fn dashboard_counts_clients_calls_and_assignments() {
    let h = TestHarness::builder().build().unwrap();
    let agent = h.add_member("Jane Smith", Role::Agent).unwrap();
    let acme = h.add_client("Acme Corporation").unwrap();
    let wayne = h.add_client("Wayne Corp").unwrap();
    h.add_client("Stark Enterprises").unwrap();

    h.mutations
        .update_client(
            &h.admin,
            &acme.id,
            ClientUpdate {
                status: Some(ClientStatus::Active),
                ..Default::default()
            },
        )
        .unwrap();
    h.mutations
        .assign_client(&h.admin, &wayne.id, &agent.id)
        .unwrap();
    h.add_call(&acme.id, &agent.id, CallStatus::Effective, 120)
        .unwrap();
    h.add_call(&acme.id, &agent.id, CallStatus::Effective, 60)
        .unwrap();
    h.add_call(&wayne.id, &agent.id, CallStatus::HungUp, 10)
        .unwrap();

    let stats = h.insights.dashboard_stats();
    assert_eq!(stats.total_clients, 3);
    assert_eq!(stats.active_clients, 1);
    assert_eq!(stats.pending_assignments, 2);
    assert_eq!(stats.total_calls, 3);
    assert_eq!(stats.effective_calls, 2);
    assert_eq!(stats.calls_today, 3);
    assert_eq!(stats.effective_rate_percent, 67);
}

#[test]
fn calls_today_uses_reference_timezone() {
    // 2026-03-02 03:00 UTC is still 2026-03-01 in Bogota (UTC-5).
    let start = Utc.with_ymd_and_hms(2026, 3, 2, 3, 0, 0).unwrap();
    let h = TestHarness::builder()
        .with_clock_at(start)
        .with_timezone(chrono_tz::America::Bogota)
        .build()
        .unwrap();
    let agent = h.add_member("John Doe", Role::Agent).unwrap();
    let client = h.add_client("TechStart Inc").unwrap();

    h.add_call(&client.id, &agent.id, CallStatus::Effective, 30)
        .unwrap();
    // 06:00 UTC is 01:00 on 2026-03-02 in Bogota.
    h.clock.advance(Duration::hours(3));
    h.add_call(&client.id, &agent.id, CallStatus::Effective, 30)
        .unwrap();

    let stats = h.insights.dashboard_stats();
    assert_eq!(stats.total_calls, 2);
    assert_eq!(stats.calls_today, 1);
}

#[test]
fn agent_performance_averages_finished_calls_only() {
    let h = TestHarness::builder().build().unwrap();
    let agent = h.add_member("Mike Johnson", Role::Agent).unwrap();
    let client = h.add_client("Global Industries").unwrap();
    h.mutations
        .assign_client(&h.admin, &client.id, &agent.id)
        .unwrap();

    h.add_call(&client.id, &agent.id, CallStatus::Effective, 100)
        .unwrap();
    h.add_call(&client.id, &agent.id, CallStatus::HungUp, 50)
        .unwrap();
    h.add_call(&client.id, &agent.id, CallStatus::InProgress, 0)
        .unwrap();

    let perf = h.insights.agent_performance(&agent.id).unwrap();
    assert_eq!(perf.user_name, "Mike Johnson");
    assert_eq!(perf.total_calls, 3);
    assert_eq!(perf.effective_calls, 1);
    assert!((perf.effectiveness_rate - 1.0 / 3.0).abs() < 1e-9);
    assert!((perf.average_call_duration - 75.0).abs() < 1e-9);
    assert_eq!(perf.clients_assigned, 1);
}

#[test]
fn agent_without_calls_has_zero_rates() {
    let h = TestHarness::builder().build().unwrap();
    let agent = h.add_member("Sarah Williams", Role::Agent).unwrap();
    let perf = h.insights.agent_performance(&agent.id).unwrap();
    assert_eq!(perf.total_calls, 0);
    assert_eq!(perf.effectiveness_rate, 0.0);
    assert_eq!(perf.average_call_duration, 0.0);
}

#[test]
fn unknown_user_performance_is_a_validation_error() {
    let h = TestHarness::builder().build().unwrap();
    let err = h.insights.agent_performance("nobody").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn team_performance_lists_agents_in_insertion_order() {
    let h = TestHarness::builder().build().unwrap();
    h.add_member("John Doe", Role::Agent).unwrap();
    h.add_member("Sam Supervisor", Role::Supervisor).unwrap();
    h.add_member("Jane Smith", Role::Agent).unwrap();

    let names: Vec<String> = h
        .insights
        .team_performance()
        .into_iter()
        .map(|row| row.user_name)
        .collect();
    assert_eq!(names, ["John Doe", "Jane Smith"]);
}

#[test]
fn stats_serialize_with_dashboard_field_names() {
    let h = TestHarness::builder().build().unwrap();
    let json = serde_json::to_value(h.insights.dashboard_stats()).unwrap();
    for key in [
        "totalClients",
        "activeClients",
        "totalCalls",
        "effectiveCalls",
        "callsToday",
        "pendingAssignments",
        "effectiveRatePercent",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
}
