// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The query service: role-scoped reads over a consistent snapshot.

use std::sync::Arc;

use dialdesk_config::model::ListingConfig;
use dialdesk_core::{
    ActivityAction, ActivityRecord, Actor, Call, Capability, Client, DialdeskError, EntityKind,
    Notification, User,
};
use dialdesk_policy as policy;
use dialdesk_store::{CallFilter, ClientFilter, EntityStore, Page, TeamFilter, paginate};
use serde::Deserialize;

use crate::metrics::record_query;

/// Requested page. Missing values fall back to page 1 and the configured size.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageRequest {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl PageRequest {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }
}

pub struct QueryService {
    store: Arc<EntityStore>,
    page_size: usize,
    max_page_size: usize,
}

impl QueryService {
    pub fn new(store: Arc<EntityStore>, listing: &ListingConfig) -> Self {
        Self {
            store,
            page_size: listing.page_size,
            max_page_size: listing.max_page_size,
        }
    }

    /// Clients in insertion order.
    pub fn list_clients(
        &self,
        actor: &Actor,
        filter: &ClientFilter,
        page: PageRequest,
    ) -> Result<Page<Client>, DialdeskError> {
        policy::require(actor, Capability::ViewClient)?;
        record_query("list_clients");
        let items = self.store.list_by::<Client>(|c| filter.matches(c));
        self.page(items, page)
    }

    pub fn get_client(&self, actor: &Actor, client_id: &str) -> Result<Client, DialdeskError> {
        policy::require(actor, Capability::ViewClient)?;
        record_query("get_client");
        self.store
            .get::<Client>(client_id)
            .ok_or_else(|| DialdeskError::NotFound {
                kind: EntityKind::Client,
                id: client_id.to_string(),
            })
    }

    /// Calls newest first. Notes are blanked for roles without `view-call-notes`.
    pub fn list_calls(
        &self,
        actor: &Actor,
        filter: &CallFilter,
        page: PageRequest,
    ) -> Result<Page<Call>, DialdeskError> {
        policy::require(actor, Capability::ViewCalls)?;
        record_query("list_calls");
        let show_notes = policy::can_perform(actor.role, Capability::ViewCallNotes);

        let mut items: Vec<Call> = self.store.read(|c| {
            c.iter::<Call>()
                .rev()
                .filter(|call| {
                    let client_name = c.get::<Client>(&call.client_id).map(|cl| cl.name.as_str());
                    filter.matches(call, client_name)
                })
                .cloned()
                .collect()
        });
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if !show_notes {
            for call in &mut items {
                call.notes = None;
            }
        }
        self.page(items, page)
    }

    pub fn list_team(
        &self,
        actor: &Actor,
        filter: &TeamFilter,
        page: PageRequest,
    ) -> Result<Page<User>, DialdeskError> {
        policy::require(actor, Capability::ViewTeam)?;
        record_query("list_team");
        let items = self.store.list_by::<User>(|u| filter.matches(u));
        self.page(items, page)
    }

    /// The latest `limit` activity records, newest first.
    pub fn recent_activity(
        &self,
        actor: &Actor,
        action: Option<ActivityAction>,
        limit: usize,
    ) -> Result<Vec<ActivityRecord>, DialdeskError> {
        if limit == 0 {
            return Err(DialdeskError::validation("limit", "must be at least 1"));
        }
        policy::require(actor, Capability::ViewActivity)?;
        record_query("recent_activity");

        let limit = limit.min(self.max_page_size);
        Ok(self.store.read(|c| {
            c.iter::<ActivityRecord>()
                .rev()
                .filter(|r| action.is_none_or(|a| r.action == a))
                .take(limit)
                .cloned()
                .collect()
        }))
    }

    /// The actor's own notifications, newest first.
    pub fn notifications(&self, actor: &Actor, unread_only: bool) -> Vec<Notification> {
        record_query("notifications");
        self.store.read(|c| {
            c.iter::<Notification>()
                .rev()
                .filter(|n| n.user_id == actor.id && (!unread_only || !n.read))
                .cloned()
                .collect()
        })
    }

    pub fn unread_count(&self, actor: &Actor) -> usize {
        self.store.read(|c| {
            c.iter::<Notification>()
                .filter(|n| n.user_id == actor.id && !n.read)
                .count()
        })
    }

    pub fn capabilities(&self, actor: &Actor) -> Vec<Capability> {
        policy::capabilities_for(actor.role)
    }

    fn page<T>(&self, items: Vec<T>, request: PageRequest) -> Result<Page<T>, DialdeskError> {
        let per_page = request
            .per_page
            .unwrap_or(self.page_size)
            .min(self.max_page_size);
        paginate(items, request.page.unwrap_or(1), per_page)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use dialdesk_core::{CallStatus, ClientStatus, ErrorKind, Role};

    use super::*;

    fn store_with_calls() -> Arc<EntityStore> {
        let store = Arc::new(EntityStore::new());
        let now = Utc::now();
        let client_id = store.insert(Client {
            id: String::new(),
            name: "Acme Corporation".into(),
            email: "contact@acme.com".into(),
            phone: "555 0100".into(),
            company: None,
            status: ClientStatus::Active,
            assigned_to: None,
            created_at: now,
            updated_at: now,
        });
        store.insert(Call {
            id: String::new(),
            client_id,
            agent_id: "agent-1".into(),
            status: CallStatus::Effective,
            duration: 90,
            notes: Some("Interested in premium plan".into()),
            created_at: now,
            updated_at: now,
        });
        store
    }

    #[test]
    fn agents_see_calls_without_notes() {
        let svc = QueryService::new(store_with_calls(), &ListingConfig::default());
        let agent = Actor::new("agent-1", Role::Agent);
        let page = svc
            .list_calls(&agent, &CallFilter::default(), PageRequest::default())
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].notes, None);

        let supervisor = Actor::new("sup-1", Role::Supervisor);
        let page = svc
            .list_calls(&supervisor, &CallFilter::default(), PageRequest::default())
            .unwrap();
        assert_eq!(
            page.items[0].notes.as_deref(),
            Some("Interested in premium plan")
        );
    }

    #[test]
    fn agents_cannot_list_team() {
        let svc = QueryService::new(Arc::new(EntityStore::new()), &ListingConfig::default());
        let err = svc
            .list_team(
                &Actor::new("a", Role::Agent),
                &TeamFilter::default(),
                PageRequest::default(),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn unknown_client_is_not_found() {
        let svc = QueryService::new(Arc::new(EntityStore::new()), &ListingConfig::default());
        let err = svc
            .get_client(&Actor::new("a", Role::Agent), "missing")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn page_size_is_capped() {
        let listing = ListingConfig {
            page_size: 2,
            max_page_size: 3,
        };
        let svc = QueryService::new(store_with_calls(), &listing);
        let page = svc
            .list_clients(
                &Actor::new("a", Role::Admin),
                &ClientFilter::default(),
                PageRequest::new(1, 50),
            )
            .unwrap();
        assert_eq!(page.per_page, 3);
    }
}
