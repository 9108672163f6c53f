// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `dialdesk stats` command implementation.
//!
//! Hydrates the persisted store and prints the dashboard tiles followed by
//! one performance row per agent. `--json` emits the same data for scripting.

use std::fmt::Write as _;

use dialdesk_config::DialdeskConfig;
use dialdesk_core::DialdeskError;
use dialdesk_insights::{AgentPerformance, DashboardStats};
use serde::Serialize;

use crate::runtime::Runtime;

/// Structured output for `--json` mode.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub dashboard: DashboardStats,
    pub team: Vec<AgentPerformance>,
}

pub async fn run_stats(config: DialdeskConfig, json: bool) -> Result<(), DialdeskError> {
    let runtime = Runtime::open(&config).await?;
    let report = StatsReport {
        dashboard: runtime.insights.dashboard_stats(),
        team: runtime.insights.team_performance(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}

fn render_text(report: &StatsReport) -> String {
    let d = &report.dashboard;
    let mut out = String::new();
    let _ = writeln!(out, "Dashboard");
    let _ = writeln!(
        out,
        "  Clients:      {} total, {} active, {} awaiting assignment",
        d.total_clients, d.active_clients, d.pending_assignments
    );
    let _ = writeln!(
        out,
        "  Calls:        {} total, {} effective ({}%), {} today",
        d.total_calls, d.effective_calls, d.effective_rate_percent, d.calls_today
    );

    let _ = writeln!(out, "\nTeam performance");
    if report.team.is_empty() {
        let _ = writeln!(out, "  (no agents)");
    }
    for row in &report.team {
        let _ = writeln!(
            out,
            "  {:<20} {:>4} calls  {:>5.1}% effective  avg {}  {} clients",
            row.user_name,
            row.total_calls,
            row.effectiveness_rate * 100.0,
            format_duration(row.average_call_duration),
            row.clients_assigned
        );
    }
    out
}

/// `m:ss` from seconds.
fn format_duration(secs: f64) -> String {
    let secs = secs.round() as u64;
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formats_as_minutes_and_seconds() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(325.0), "5:25");
        assert_eq!(format_duration(261.5), "4:22");
    }

    #[test]
    fn text_lists_every_agent() {
        let report = StatsReport {
            dashboard: DashboardStats {
                total_clients: 5,
                active_clients: 3,
                total_calls: 7,
                effective_calls: 4,
                calls_today: 7,
                pending_assignments: 2,
                effective_rate_percent: 57,
            },
            team: vec![AgentPerformance {
                user_id: "u3".into(),
                user_name: "Mike Johnson".into(),
                total_calls: 2,
                effective_calls: 1,
                effectiveness_rate: 0.5,
                average_call_duration: 247.0,
                clients_assigned: 1,
            }],
        };
        let text = render_text(&report);
        assert!(text.contains("5 total, 3 active, 2 awaiting assignment"));
        assert!(text.contains("4 effective (57%)"));
        assert!(text.contains("Mike Johnson"));
        assert!(text.contains("50.0% effective"));
        assert!(text.contains("avg 4:07"));
    }

    #[test]
    fn json_report_uses_camel_case() {
        let report = StatsReport {
            dashboard: DashboardStats {
                total_clients: 0,
                active_clients: 0,
                total_calls: 0,
                effective_calls: 0,
                calls_today: 0,
                pending_assignments: 0,
                effective_rate_percent: 0,
            },
            team: Vec::new(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["dashboard"]["pendingAssignments"], 0);
        assert!(json["team"].as_array().unwrap().is_empty());
    }
}
