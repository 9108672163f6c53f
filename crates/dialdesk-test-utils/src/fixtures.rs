// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request builders with valid defaults.

use dialdesk_core::{CallStatus, Role};
use dialdesk_service::{NewCall, NewClient, NewTeamMember};

/// A valid client named `name`, with an email derived from it.
pub fn new_client(name: &str) -> NewClient {
    NewClient {
        name: name.to_string(),
        email: format!("contact@{}.com", slug(name)),
        phone: "+1 (555) 123-4567".to_string(),
        company: Some(name.to_string()),
        status: None,
    }
}

pub fn new_member(name: &str, role: Role) -> NewTeamMember {
    NewTeamMember {
        name: name.to_string(),
        email: format!("{}@dialdesk.test", slug(name)),
        role: Some(role),
        avatar: None,
    }
}

/// A finished call. In-progress calls get duration 0.
pub fn new_call(client_id: &str, agent_id: &str, status: CallStatus, duration: u32) -> NewCall {
    NewCall {
        client_id: client_id.to_string(),
        agent_id: agent_id.to_string(),
        status: Some(status),
        duration: Some(if status == CallStatus::InProgress { 0 } else { duration }),
        notes: None,
    }
}

fn slug(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}
