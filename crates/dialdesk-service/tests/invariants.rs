// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property tests: store-wide invariants hold after any mutation sequence.

use dialdesk_core::{CallStatus, Client, Role, User};
use dialdesk_test_utils::TestHarness;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    AddClient,
    AddAgent,
    Assign(usize, usize),
    Unassign(usize),
    DeleteAgent(usize),
    DeleteClient(usize),
    RecordCall(usize, usize, CallStatus),
}

fn op() -> impl Strategy<Value = Op> {
    let status = prop_oneof![
        Just(CallStatus::Effective),
        Just(CallStatus::HungUp),
        Just(CallStatus::InProgress),
    ];
    prop_oneof![
        Just(Op::AddClient),
        Just(Op::AddAgent),
        (0usize..8, 0usize..8).prop_map(|(c, a)| Op::Assign(c, a)),
        (0usize..8).prop_map(Op::Unassign),
        (0usize..8).prop_map(Op::DeleteAgent),
        (0usize..8).prop_map(Op::DeleteClient),
        (0usize..8, 0usize..8, status).prop_map(|(c, a, s)| Op::RecordCall(c, a, s)),
    ]
}

fn pick<T: Clone>(items: &[T], idx: usize) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[idx % items.len()].clone())
    }
}

proptest! {
    #[test]
    fn invariants_hold_after_any_sequence(ops in prop::collection::vec(op(), 1..40)) {
        let h = TestHarness::builder().build().unwrap();
        let mut clients: Vec<String> = Vec::new();
        let mut agents: Vec<String> = Vec::new();

        for (n, op) in ops.into_iter().enumerate() {
            // Failures are fine; invariants must hold either way.
            match op {
                Op::AddClient => {
                    if let Ok(c) = h.add_client(&format!("Client {n}")) {
                        clients.push(c.id);
                    }
                }
                Op::AddAgent => {
                    if let Ok(a) = h.add_member(&format!("Agent {n}"), Role::Agent) {
                        agents.push(a.id);
                    }
                }
                Op::Assign(c, a) => {
                    if let (Some(c), Some(a)) = (pick(&clients, c), pick(&agents, a)) {
                        let _ = h.mutations.assign_client(&h.admin, &c, &a);
                    }
                }
                Op::Unassign(c) => {
                    if let Some(c) = pick(&clients, c) {
                        let _ = h.mutations.unassign_client(&h.admin, &c);
                    }
                }
                Op::DeleteAgent(a) => {
                    if let Some(a) = pick(&agents, a) {
                        let _ = h.mutations.delete_team_member(&h.admin, &a);
                    }
                }
                Op::DeleteClient(c) => {
                    if let Some(c) = pick(&clients, c) {
                        let _ = h.mutations.delete_client(&h.admin, &c);
                    }
                }
                Op::RecordCall(c, a, status) => {
                    if let (Some(c), Some(a)) = (pick(&clients, c), pick(&agents, a)) {
                        let _ = h.add_call(&c, &a, status, 42);
                    }
                }
            }

            let unassigned = h.store.read(|s| {
                s.iter::<Client>().filter(|c| c.assigned_to.is_none()).count()
            });
            prop_assert_eq!(h.insights.dashboard_stats().pending_assignments, unassigned);

            let dangling = h.store.read(|s| {
                s.iter::<Client>()
                    .filter_map(|c| c.assigned_to.as_deref())
                    .any(|id| !s.contains::<User>(id))
            });
            prop_assert!(!dangling);

            for row in h.insights.team_performance() {
                prop_assert!((0.0..=1.0).contains(&row.effectiveness_rate));
                prop_assert!(row.effective_calls <= row.total_calls);
            }
        }
    }
}
