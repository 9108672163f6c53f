// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `dialdesk seed` command implementation.
//!
//! Fills an empty store with a small demo call center: a registered admin,
//! four team members, five clients, and a day's worth of calls. Every record
//! goes through the mutation service, so assignments produce the usual
//! activity records and notifications.

use dialdesk_config::DialdeskConfig;
use dialdesk_core::{Actor, CallStatus, ClientStatus, DialdeskError, Role, User};
use dialdesk_service::{MutationService, NewCall, NewClient, NewTeamMember, Registration};
use tracing::info;

use crate::runtime::Runtime;

const ADMIN: (&str, &str) = ("John Doe", "john.doe@example.com");

const TEAM: &[(&str, &str, Role)] = &[
    ("Jane Smith", "jane.smith@example.com", Role::Supervisor),
    ("Mike Johnson", "mike.johnson@example.com", Role::Agent),
    ("Sarah Williams", "sarah.williams@example.com", Role::Agent),
    ("David Brown", "david.brown@example.com", Role::Agent),
];

struct DemoClient {
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    company: &'static str,
    status: ClientStatus,
    /// Index into the seeded users, admin first.
    assignee: Option<usize>,
}

const CLIENTS: &[DemoClient] = &[
    DemoClient {
        name: "Acme Corporation",
        email: "contact@acme.com",
        phone: "+1 (555) 123-4567",
        company: "Acme Corp",
        status: ClientStatus::Active,
        assignee: Some(1),
    },
    DemoClient {
        name: "TechStart Inc",
        email: "info@techstart.com",
        phone: "+1 (555) 987-6543",
        company: "TechStart",
        status: ClientStatus::Active,
        assignee: None,
    },
    DemoClient {
        name: "Global Industries",
        email: "contact@globalind.com",
        phone: "+1 (555) 456-7890",
        company: "Global Industries",
        status: ClientStatus::Inactive,
        assignee: Some(2),
    },
    DemoClient {
        name: "Stark Enterprises",
        email: "info@stark.com",
        phone: "+1 (555) 789-0123",
        company: "Stark Enterprises",
        status: ClientStatus::Pending,
        assignee: None,
    },
    DemoClient {
        name: "Wayne Corp",
        email: "business@waynecorp.com",
        phone: "+1 (555) 234-5678",
        company: "Wayne Corp",
        status: ClientStatus::Active,
        assignee: Some(0),
    },
];

/// (client index, user index, status, duration secs, notes)
const CALLS: &[(usize, usize, CallStatus, u32, Option<&str>)] = &[
    (
        0,
        1,
        CallStatus::Effective,
        325,
        Some("Discussed new product offerings and scheduled a follow-up call next week."),
    ),
    (
        2,
        0,
        CallStatus::HungUp,
        45,
        Some("Client was busy and asked to call back later."),
    ),
    (
        1,
        2,
        CallStatus::Effective,
        482,
        Some("Resolved billing issue and provided information about premium support options."),
    ),
    (4, 0, CallStatus::InProgress, 0, None),
    (
        3,
        3,
        CallStatus::Effective,
        267,
        Some("Client agreed to upgrade their subscription plan."),
    ),
    (
        0,
        1,
        CallStatus::Effective,
        198,
        Some("Provided technical support for integration issues."),
    ),
    (
        2,
        2,
        CallStatus::HungUp,
        12,
        Some("Call dropped due to poor connection."),
    ),
];

/// Counts of what [`seed_demo`] created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub clients: usize,
    pub calls: usize,
}

pub async fn run_seed(config: DialdeskConfig) -> Result<(), DialdeskError> {
    let runtime = Runtime::open(&config).await?;

    let existing = runtime.store.read(|c| c.count::<User>());
    if existing > 0 {
        println!("dialdesk seed: store already holds {existing} users, nothing to do");
        return runtime.close().await;
    }

    let report = seed_demo(&runtime.mutations)?;
    runtime.close().await?;

    info!(
        users = report.users,
        clients = report.clients,
        calls = report.calls,
        "demo data seeded"
    );
    println!(
        "dialdesk seed: created {} users, {} clients, {} calls",
        report.users, report.clients, report.calls
    );
    Ok(())
}

/// Create the demo data set. The store must not contain any users yet, so
/// the registered admin is the first user.
pub fn seed_demo(mutations: &MutationService) -> Result<SeedReport, DialdeskError> {
    let admin = mutations.register(Registration {
        name: ADMIN.0.to_string(),
        email: ADMIN.1.to_string(),
    })?;
    if admin.role != Role::Admin {
        return Err(DialdeskError::conflict(
            "demo data needs an empty store: the first registered user must be the admin",
        ));
    }
    let admin = Actor::new(admin.id, admin.role);

    let mut users = vec![admin.id.clone()];
    for (name, email, role) in TEAM {
        let member = mutations.create_team_member(
            &admin,
            NewTeamMember {
                name: (*name).to_string(),
                email: (*email).to_string(),
                role: Some(*role),
                avatar: None,
            },
        )?;
        users.push(member.id);
    }

    let mut clients = Vec::with_capacity(CLIENTS.len());
    for demo in CLIENTS {
        let client = mutations.create_client(
            &admin,
            NewClient {
                name: demo.name.to_string(),
                email: demo.email.to_string(),
                phone: demo.phone.to_string(),
                company: Some(demo.company.to_string()),
                status: Some(demo.status),
            },
        )?;
        if let Some(assignee) = demo.assignee {
            mutations.assign_client(&admin, &client.id, &users[assignee])?;
        }
        clients.push(client.id);
    }

    for (client, user, status, duration, notes) in CALLS {
        mutations.record_call(
            &admin,
            NewCall {
                client_id: clients[*client].clone(),
                agent_id: users[*user].clone(),
                status: Some(*status),
                duration: Some(*duration),
                notes: notes.map(str::to_string),
            },
        )?;
    }

    Ok(SeedReport {
        users: users.len(),
        clients: clients.len(),
        calls: CALLS.len(),
    })
}
