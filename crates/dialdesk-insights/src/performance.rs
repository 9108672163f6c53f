// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-agent performance rows.

use dialdesk_core::{Call, CallStatus, Client, Role, User};
use dialdesk_store::Collections;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPerformance {
    pub user_id: String,
    pub user_name: String,
    pub total_calls: usize,
    pub effective_calls: usize,
    /// In `[0, 1]`; 0 when the agent has no calls.
    pub effectiveness_rate: f64,
    /// Mean duration in seconds over finished calls; 0 when there are none.
    pub average_call_duration: f64,
    pub clients_assigned: usize,
}

/// Performance of one user. Calls count by `agentId`, clients by `assignedTo`.
pub fn agent_performance(c: &Collections, user: &User) -> AgentPerformance {
    let mut total_calls = 0usize;
    let mut effective_calls = 0usize;
    let mut finished = 0usize;
    let mut finished_seconds = 0u64;

    for call in c.iter::<Call>().filter(|call| call.agent_id == user.id) {
        total_calls += 1;
        if call.status == CallStatus::Effective {
            effective_calls += 1;
        }
        if call.status != CallStatus::InProgress {
            finished += 1;
            finished_seconds += u64::from(call.duration);
        }
    }

    let effectiveness_rate = if total_calls == 0 {
        0.0
    } else {
        effective_calls as f64 / total_calls as f64
    };
    let average_call_duration = if finished == 0 {
        0.0
    } else {
        finished_seconds as f64 / finished as f64
    };
    let clients_assigned = c
        .iter::<Client>()
        .filter(|client| client.assigned_to.as_deref() == Some(user.id.as_str()))
        .count();

    AgentPerformance {
        user_id: user.id.clone(),
        user_name: user.name.clone(),
        total_calls,
        effective_calls,
        effectiveness_rate,
        average_call_duration,
        clients_assigned,
    }
}

/// Rows for every agent-role user, in insertion order.
pub fn team_performance(c: &Collections) -> Vec<AgentPerformance> {
    c.iter::<User>()
        .filter(|user| user.role == Role::Agent)
        .map(|user| agent_performance(c, user))
        .collect()
}
