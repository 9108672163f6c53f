// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The lock-guarded entity store.

use std::cmp::Ordering;

use dialdesk_core::DialdeskError;
use parking_lot::RwLock;

use crate::collections::{Collections, Removal};
use crate::entity::Entity;

/// Authoritative in-memory state for every collection.
///
/// A single reader-writer lock guards all five collections. Mutations take
/// the write lock for their entire read-modify-write sequence via
/// [`write`](Self::write); aggregations and queries take the read lock via
/// [`read`](Self::read) and so always observe a consistent snapshot.
///
/// Share it behind an `Arc`; it is constructed once at process start.
#[derive(Debug, Default)]
pub struct EntityStore {
    inner: RwLock<Collections>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap already-populated collections, as produced by hydration.
    pub fn from_collections(collections: Collections) -> Self {
        Self {
            inner: RwLock::new(collections),
        }
    }

    /// Run `f` against a consistent view of all collections.
    pub fn read<R>(&self, f: impl FnOnce(&Collections) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access. Nothing else reads or writes until it returns.
    ///
    /// If `f` returns an error after partially mutating state, that state is
    /// kept; callers validate before changing anything.
    pub fn write<R>(&self, f: impl FnOnce(&mut Collections) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Clone every collection for persistence.
    pub fn snapshot(&self) -> Collections {
        self.inner.read().clone()
    }

    pub fn get<T: Entity>(&self, id: &str) -> Option<T> {
        self.read(|c| c.get::<T>(id).cloned())
    }

    /// All entities of a kind, in insertion order.
    pub fn list<T: Entity>(&self) -> Vec<T> {
        self.read(|c| c.iter::<T>().cloned().collect())
    }

    pub fn list_by<T: Entity>(&self, filter: impl Fn(&T) -> bool) -> Vec<T> {
        self.read(|c| c.iter::<T>().filter(|e| filter(e)).cloned().collect())
    }

    /// Filtered entities ordered by `compare`. Ties keep insertion order.
    pub fn list_sorted<T: Entity>(
        &self,
        filter: impl Fn(&T) -> bool,
        compare: impl FnMut(&T, &T) -> Ordering,
    ) -> Vec<T> {
        let mut items = self.list_by(filter);
        items.sort_by(compare);
        items
    }

    pub fn insert<T: Entity>(&self, entity: T) -> String {
        self.write(|c| c.insert(entity))
    }

    pub fn restore<T: Entity>(&self, entity: T) -> Result<(), DialdeskError> {
        self.write(|c| c.restore(entity))
    }

    pub fn replace<T: Entity>(&self, id: &str, entity: T) -> Result<(), DialdeskError> {
        self.write(|c| c.replace(id, entity))
    }

    pub fn remove<T: Entity>(&self, id: &str) -> Result<Removal<T>, DialdeskError> {
        self.write(|c| c.remove(id))
    }
}
