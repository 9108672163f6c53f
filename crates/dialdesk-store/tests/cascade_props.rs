// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property tests: referential integrity of assignments under removal.

use chrono::Utc;
use dialdesk_core::{Client, ClientStatus, Role, User};
use dialdesk_store::EntityStore;
use proptest::prelude::*;

fn user(n: usize) -> User {
    let now = Utc::now();
    User {
        id: String::new(),
        name: format!("Agent {n}"),
        email: format!("agent{n}@dialdesk.test"),
        role: Role::Agent,
        avatar: None,
        created_at: now,
        updated_at: now,
    }
}

fn client(n: usize, assigned_to: Option<String>) -> Client {
    let now = Utc::now();
    Client {
        id: String::new(),
        name: format!("Client {n}"),
        email: format!("client{n}@example.com"),
        phone: "555 0100".into(),
        company: None,
        status: ClientStatus::Pending,
        assigned_to,
        created_at: now,
        updated_at: now,
    }
}

proptest! {
    #[test]
    fn assignees_always_resolve_after_removals(
        users in 1usize..6,
        assignments in prop::collection::vec(prop::option::of(0usize..6), 0..20),
        removals in prop::collection::vec(0usize..6, 0..6),
    ) {
        let store = EntityStore::new();
        let user_ids: Vec<String> = (0..users).map(|n| store.insert(user(n))).collect();

        for (n, target) in assignments.iter().enumerate() {
            let assigned = target.and_then(|i| user_ids.get(i).cloned());
            store.insert(client(n, assigned));
        }

        for idx in removals {
            if let Some(id) = user_ids.get(idx) {
                let _ = store.remove::<User>(id);
            }
        }

        store.read(|c| {
            for client in c.iter::<Client>() {
                if let Some(agent) = &client.assigned_to {
                    prop_assert!(c.contains::<User>(agent));
                }
            }
            Ok(())
        })?;
        prop_assert_eq!(store.list::<Client>().len(), assignments.len());
    }
}
