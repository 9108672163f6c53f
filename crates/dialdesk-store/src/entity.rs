// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The [`Entity`] trait binding each domain type to its collection.

use dialdesk_core::{ActivityRecord, Call, Client, EntityKind, Notification, User};

use crate::collections::{Collection, Collections};

/// A domain type stored in one of the five collections.
///
/// Implementations are provided for every entity in `dialdesk-core`; the
/// store's generic operations dispatch through these accessors.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Which collection the entity lives in.
    const KIND: EntityKind;

    /// Entities that may only be appended, never replaced or removed.
    const APPEND_ONLY: bool = false;

    fn id(&self) -> &str;

    /// Assign the store-generated identifier.
    fn set_id(&mut self, id: String);

    fn collection(collections: &Collections) -> &Collection<Self>;

    fn collection_mut(collections: &mut Collections) -> &mut Collection<Self>;

    /// Side effects of removing `removed`, applied in the same critical
    /// section. Returns the ids of clients whose assignee was cleared.
    fn cascade(_collections: &mut Collections, _removed: &Self) -> Vec<String> {
        Vec::new()
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn collection(collections: &Collections) -> &Collection<Self> {
        &collections.users
    }

    fn collection_mut(collections: &mut Collections) -> &mut Collection<Self> {
        &mut collections.users
    }

    /// Orphan every client assigned to the user and drop the user's inbox.
    fn cascade(collections: &mut Collections, removed: &Self) -> Vec<String> {
        let mut unassigned = Vec::new();
        for client in collections.clients.values_mut() {
            if client.assigned_to.as_deref() == Some(removed.id.as_str()) {
                client.assigned_to = None;
                unassigned.push(client.id.clone());
            }
        }

        let dropped = collections
            .notifications
            .retain(|n| n.user_id != removed.id);

        tracing::debug!(
            user_id = %removed.id,
            unassigned_clients = unassigned.len(),
            dropped_notifications = dropped,
            "user removal cascaded"
        );
        unassigned
    }
}

impl Entity for Client {
    const KIND: EntityKind = EntityKind::Client;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn collection(collections: &Collections) -> &Collection<Self> {
        &collections.clients
    }

    fn collection_mut(collections: &mut Collections) -> &mut Collection<Self> {
        &mut collections.clients
    }
}

impl Entity for Call {
    const KIND: EntityKind = EntityKind::Call;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn collection(collections: &Collections) -> &Collection<Self> {
        &collections.calls
    }

    fn collection_mut(collections: &mut Collections) -> &mut Collection<Self> {
        &mut collections.calls
    }
}

impl Entity for ActivityRecord {
    const KIND: EntityKind = EntityKind::Activity;
    const APPEND_ONLY: bool = true;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn collection(collections: &Collections) -> &Collection<Self> {
        &collections.activity
    }

    fn collection_mut(collections: &mut Collections) -> &mut Collection<Self> {
        &mut collections.activity
    }
}

impl Entity for Notification {
    const KIND: EntityKind = EntityKind::Notification;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn collection(collections: &Collections) -> &Collection<Self> {
        &collections.notifications
    }

    fn collection_mut(collections: &mut Collections) -> &mut Collection<Self> {
        &mut collections.notifications
    }
}
