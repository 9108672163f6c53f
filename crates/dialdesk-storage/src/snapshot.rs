// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loading the entity store from a [`DocumentStore`] and writing it back.
//!
//! The entity store stays authoritative while the process runs. Documents
//! are read once at startup with [`hydrate`] and written back with
//! [`persist`], which runs against a detached snapshot so no store lock is
//! held across an await point.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use dialdesk_core::{
    ActivityRecord, Call, Client, DialdeskError, DocumentStore, Notification, User,
};
use dialdesk_store::{Collections, Entity, EntityStore};

/// Counts of document writes made by one [`persist`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistReport {
    /// Documents created or rewritten because their body changed.
    pub written: usize,
    /// Documents whose body already matched the store.
    pub unchanged: usize,
    /// Documents deleted because the entity no longer exists.
    pub deleted: usize,
}

/// Build an [`EntityStore`] from every persisted collection.
///
/// Entities keep their stored ids and come back in the order their
/// documents were first written.
pub async fn hydrate(docs: &dyn DocumentStore) -> Result<EntityStore, DialdeskError> {
    let mut collections = Collections::default();
    let users = load::<User>(docs, &mut collections).await?;
    let clients = load::<Client>(docs, &mut collections).await?;
    let calls = load::<Call>(docs, &mut collections).await?;
    let activity = load::<ActivityRecord>(docs, &mut collections).await?;
    let notifications = load::<Notification>(docs, &mut collections).await?;

    unassign_dangling(&mut collections)?;

    info!(
        backend = docs.name(),
        users, clients, calls, activity, notifications, "entity store hydrated"
    );
    Ok(EntityStore::from_collections(collections))
}

/// Clear assignees that point at users with no document, the same outcome
/// the user-removal cascade would have produced.
fn unassign_dangling(collections: &mut Collections) -> Result<(), DialdeskError> {
    let dangling: Vec<(String, String)> = collections
        .iter::<Client>()
        .filter_map(|c| {
            let assignee = c.assigned_to.as_deref()?;
            (!collections.contains::<User>(assignee))
                .then(|| (c.id.clone(), assignee.to_string()))
        })
        .collect();

    for (client_id, assignee) in dangling {
        warn!(
            client_id = client_id.as_str(),
            assignee = assignee.as_str(),
            "persisted client references a missing team member, unassigning"
        );
        collections.modify::<Client>(&client_id, |client| client.assigned_to = None)?;
    }
    Ok(())
}

async fn load<T>(docs: &dyn DocumentStore, collections: &mut Collections) -> Result<usize, DialdeskError>
where
    T: Entity + DeserializeOwned,
{
    let documents = docs.list(T::KIND.collection()).await?;
    let count = documents.len();
    for doc in documents {
        let mut entity: T = serde_json::from_value(doc.body).map_err(|e| {
            DialdeskError::Internal(format!(
                "{} document `{}` is malformed: {e}",
                T::KIND,
                doc.id
            ))
        })?;
        entity.set_id(doc.id);
        collections.restore(entity)?;
    }
    Ok(count)
}

/// Write the current state of `store` to `docs`.
///
/// Only documents whose body differs are rewritten. Fields that were stored
/// but are now absent (a cleared optional field) are written as `null`, so
/// the top-level merge of [`DocumentStore::update`] cannot resurrect them.
/// Documents for removed entities are deleted.
pub async fn persist(
    store: &EntityStore,
    docs: &dyn DocumentStore,
) -> Result<PersistReport, DialdeskError> {
    let snapshot = store.snapshot();
    let mut report = PersistReport::default();
    sync::<User>(&snapshot, docs, &mut report).await?;
    sync::<Client>(&snapshot, docs, &mut report).await?;
    sync::<Call>(&snapshot, docs, &mut report).await?;
    sync::<ActivityRecord>(&snapshot, docs, &mut report).await?;
    sync::<Notification>(&snapshot, docs, &mut report).await?;

    debug!(
        backend = docs.name(),
        written = report.written,
        unchanged = report.unchanged,
        deleted = report.deleted,
        "entity store persisted"
    );
    Ok(report)
}

async fn sync<T>(
    snapshot: &Collections,
    docs: &dyn DocumentStore,
    report: &mut PersistReport,
) -> Result<(), DialdeskError>
where
    T: Entity + Serialize,
{
    let collection = T::KIND.collection();
    let mut stored: HashMap<String, Value> = docs
        .list(collection)
        .await?
        .into_iter()
        .map(|d| (d.id, d.body))
        .collect();

    for entity in snapshot.iter::<T>() {
        let body = serde_json::to_value(entity)?;
        match stored.remove(entity.id()) {
            Some(previous) => {
                let patch = cleared_fields(&previous, body);
                if patch == previous {
                    report.unchanged += 1;
                } else {
                    docs.update(collection, entity.id(), patch).await?;
                    report.written += 1;
                }
            }
            None => {
                docs.create(collection, entity.id(), body).await?;
                report.written += 1;
            }
        }
    }

    for id in stored.into_keys() {
        docs.delete(collection, &id).await?;
        report.deleted += 1;
    }
    Ok(())
}

/// `next` plus an explicit `null` for every top-level key only `previous` has.
fn cleared_fields(previous: &Value, mut next: Value) -> Value {
    if let (Value::Object(previous), Value::Object(next)) = (previous, &mut next) {
        for key in previous.keys() {
            next.entry(key.clone()).or_insert(Value::Null);
        }
    }
    next
}
