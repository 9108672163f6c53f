// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! List filters and pagination.

use dialdesk_core::{Call, CallStatus, Client, ClientStatus, DialdeskError, Role, User};
use serde::{Deserialize, Serialize};

/// Filter for the client list.
///
/// `search` matches name and email case-insensitively and phone as a plain
/// substring.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientFilter {
    pub search: Option<String>,
    pub status: Option<ClientStatus>,
    pub assigned_to: Option<String>,
    /// Only clients with no assignee.
    pub unassigned: bool,
}

impl ClientFilter {
    pub fn matches(&self, client: &Client) -> bool {
        if let Some(status) = self.status {
            if client.status != status {
                return false;
            }
        }
        if self.unassigned && client.assigned_to.is_some() {
            return false;
        }
        if let Some(agent) = &self.assigned_to {
            if client.assigned_to.as_deref() != Some(agent.as_str()) {
                return false;
            }
        }
        match normalized(&self.search) {
            Some(term) => {
                contains_folded(&client.name, &term)
                    || contains_folded(&client.email, &term)
                    || client.phone.contains(term.as_str())
            }
            None => true,
        }
    }
}

/// Filter for the call log.
///
/// `search` matches the client's name, the client id, or the agent id.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CallFilter {
    pub search: Option<String>,
    pub status: Option<CallStatus>,
    pub agent_id: Option<String>,
    pub client_id: Option<String>,
}

impl CallFilter {
    /// `client_name` is the name of the call's client, if it still exists.
    pub fn matches(&self, call: &Call, client_name: Option<&str>) -> bool {
        if let Some(status) = self.status {
            if call.status != status {
                return false;
            }
        }
        if let Some(agent) = &self.agent_id {
            if &call.agent_id != agent {
                return false;
            }
        }
        if let Some(client) = &self.client_id {
            if &call.client_id != client {
                return false;
            }
        }
        match normalized(&self.search) {
            Some(term) => {
                client_name.is_some_and(|name| contains_folded(name, &term))
                    || contains_folded(&call.client_id, &term)
                    || contains_folded(&call.agent_id, &term)
            }
            None => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamFilter {
    pub search: Option<String>,
    pub role: Option<Role>,
}

impl TeamFilter {
    pub fn matches(&self, user: &User) -> bool {
        if let Some(role) = self.role {
            if user.role != role {
                return false;
            }
        }
        match normalized(&self.search) {
            Some(term) => contains_folded(&user.name, &term) || contains_folded(&user.email, &term),
            None => true,
        }
    }
}

/// Lowercased, trimmed search term; blank terms match everything.
fn normalized(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

fn contains_folded(haystack: &str, lowered_term: &str) -> bool {
    haystack.to_lowercase().contains(lowered_term)
}

/// One page of a list result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Slice `items` into 1-based pages of `per_page`.
///
/// A page past the end yields no items but still reports the totals.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Result<Page<T>, DialdeskError> {
    if per_page == 0 {
        return Err(DialdeskError::validation("per_page", "must be at least 1"));
    }
    if page == 0 {
        return Err(DialdeskError::validation("page", "pages are numbered from 1"));
    }

    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    let items = items
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();

    Ok(Page {
        items,
        page,
        per_page,
        total_items,
        total_pages,
    })
}
