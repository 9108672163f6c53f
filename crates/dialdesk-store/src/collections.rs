// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Insertion-ordered collections and the typed operations over them.
//!
//! [`Collections`] is the unlocked state behind
//! [`EntityStore`](crate::EntityStore). Code running inside
//! `EntityStore::write` uses these methods directly so that a whole
//! read-modify-write sequence happens under one lock acquisition.

use std::collections::{BTreeMap, HashMap};

use dialdesk_core::{ActivityRecord, Call, Client, DialdeskError, Notification, User};
use uuid::Uuid;

use crate::entity::Entity;

/// One collection, iterated in insertion order.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    rows: BTreeMap<u64, T>,
    index: HashMap<String, u64>,
    next_seq: u64,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            index: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<T: Entity> Collection<T> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).and_then(|seq| self.rows.get(seq))
    }

    /// Entities in insertion order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.rows.values()
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.rows.values_mut()
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        let seq = self.index.get(id)?;
        self.rows.get_mut(seq)
    }

    fn push(&mut self, entity: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.index.insert(entity.id().to_string(), seq);
        self.rows.insert(seq, entity);
    }

    fn take(&mut self, id: &str) -> Option<T> {
        let seq = self.index.remove(id)?;
        self.rows.remove(&seq)
    }

    /// Keep only entities matching `keep`. Returns how many were dropped.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let before = self.rows.len();
        let index = &mut self.index;
        self.rows.retain(|_, entity| {
            let kept = keep(entity);
            if !kept {
                index.remove(entity.id());
            }
            kept
        });
        before - self.rows.len()
    }
}

/// Result of removing an entity.
#[derive(Debug, Clone)]
pub struct Removal<T> {
    pub removed: T,
    /// Clients whose `assignedTo` was cleared by the cascade, in insertion order.
    pub unassigned_clients: Vec<String>,
}

/// The five collections owned by the entity store.
#[derive(Debug, Clone, Default)]
pub struct Collections {
    pub(crate) users: Collection<User>,
    pub(crate) clients: Collection<Client>,
    pub(crate) calls: Collection<Call>,
    pub(crate) activity: Collection<ActivityRecord>,
    pub(crate) notifications: Collection<Notification>,
}

impl Collections {
    pub fn of<T: Entity>(&self) -> &Collection<T> {
        T::collection(self)
    }

    pub fn get<T: Entity>(&self, id: &str) -> Option<&T> {
        T::collection(self).get(id)
    }

    /// Like [`get`](Self::get) but a missing id is a `NotFound` error.
    pub fn require<T: Entity>(&self, id: &str) -> Result<&T, DialdeskError> {
        self.get(id).ok_or_else(|| not_found::<T>(id))
    }

    pub fn contains<T: Entity>(&self, id: &str) -> bool {
        T::collection(self).contains(id)
    }

    pub fn count<T: Entity>(&self) -> usize {
        T::collection(self).len()
    }

    /// Entities of one kind in insertion order.
    pub fn iter<T: Entity>(&self) -> impl DoubleEndedIterator<Item = &T> {
        T::collection(self).values()
    }

    /// Insert a new entity under a freshly generated id and return the id.
    ///
    /// Any id already set on `entity` is overwritten.
    pub fn insert<T: Entity>(&mut self, mut entity: T) -> String {
        let id = Uuid::new_v4().to_string();
        entity.set_id(id.clone());
        T::collection_mut(self).push(entity);
        id
    }

    /// Insert an entity keeping its existing id, as when loading persisted state.
    pub fn restore<T: Entity>(&mut self, entity: T) -> Result<(), DialdeskError> {
        if entity.id().trim().is_empty() {
            return Err(DialdeskError::validation(
                "id",
                format!("restored {} has an empty id", T::KIND),
            ));
        }
        let collection = T::collection_mut(self);
        if collection.contains(entity.id()) {
            return Err(DialdeskError::conflict(format!(
                "{} `{}` already exists",
                T::KIND,
                entity.id()
            )));
        }
        collection.push(entity);
        Ok(())
    }

    /// Overwrite the entity stored under `id`, keeping its position.
    pub fn replace<T: Entity>(&mut self, id: &str, entity: T) -> Result<(), DialdeskError> {
        ensure_mutable::<T>()?;
        if entity.id() != id {
            return Err(DialdeskError::validation(
                "id",
                format!("entity id `{}` does not match key `{id}`", entity.id()),
            ));
        }
        let slot = T::collection_mut(self)
            .get_mut(id)
            .ok_or_else(|| not_found::<T>(id))?;
        *slot = entity;
        Ok(())
    }

    /// Apply `change` to a copy of the stored entity and write it back.
    ///
    /// Returns the updated entity. `change` must not alter the id.
    pub fn modify<T: Entity>(
        &mut self,
        id: &str,
        change: impl FnOnce(&mut T),
    ) -> Result<T, DialdeskError> {
        let mut entity = self.require::<T>(id)?.clone();
        change(&mut entity);
        self.replace(id, entity.clone())?;
        Ok(entity)
    }

    /// Remove an entity, applying its kind's cascade in the same step.
    pub fn remove<T: Entity>(&mut self, id: &str) -> Result<Removal<T>, DialdeskError> {
        ensure_mutable::<T>()?;
        let removed = T::collection_mut(self)
            .take(id)
            .ok_or_else(|| not_found::<T>(id))?;
        let unassigned_clients = T::cascade(self, &removed);
        Ok(Removal {
            removed,
            unassigned_clients,
        })
    }
}

fn not_found<T: Entity>(id: &str) -> DialdeskError {
    DialdeskError::NotFound {
        kind: T::KIND,
        id: id.to_string(),
    }
}

fn ensure_mutable<T: Entity>() -> Result<(), DialdeskError> {
    if T::APPEND_ONLY {
        return Err(DialdeskError::conflict(format!(
            "{} records are append-only",
            T::KIND
        )));
    }
    Ok(())
}
