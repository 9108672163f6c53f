// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dashboard tiles.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use dialdesk_core::{Call, CallStatus, Client, ClientStatus};
use dialdesk_store::Collections;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_clients: usize,
    pub active_clients: usize,
    pub total_calls: usize,
    pub effective_calls: usize,
    /// Calls created on the current calendar day in the reference timezone.
    pub calls_today: usize,
    /// Clients with no assignee.
    pub pending_assignments: usize,
    /// `effective_calls / total_calls` as a rounded percentage; 0 with no calls.
    pub effective_rate_percent: u32,
}

/// Compute dashboard statistics from one consistent view of the store.
pub fn dashboard_stats(c: &Collections, now: DateTime<Utc>, tz: Tz) -> DashboardStats {
    let today = now.with_timezone(&tz).date_naive();

    let mut stats = DashboardStats {
        total_clients: 0,
        active_clients: 0,
        total_calls: 0,
        effective_calls: 0,
        calls_today: 0,
        pending_assignments: 0,
        effective_rate_percent: 0,
    };

    for client in c.iter::<Client>() {
        stats.total_clients += 1;
        if client.status == ClientStatus::Active {
            stats.active_clients += 1;
        }
        if client.assigned_to.is_none() {
            stats.pending_assignments += 1;
        }
    }

    for call in c.iter::<Call>() {
        stats.total_calls += 1;
        if call.status == CallStatus::Effective {
            stats.effective_calls += 1;
        }
        if call.created_at.with_timezone(&tz).date_naive() == today {
            stats.calls_today += 1;
        }
    }

    stats.effective_rate_percent = percent(stats.effective_calls, stats.total_calls);
    stats
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(5, 5), 100);
    }

    #[test]
    fn empty_store_has_zero_stats() {
        let stats = dashboard_stats(&Collections::default(), Utc::now(), chrono_tz::UTC);
        assert_eq!(stats.total_clients, 0);
        assert_eq!(stats.effective_rate_percent, 0);
    }
}
