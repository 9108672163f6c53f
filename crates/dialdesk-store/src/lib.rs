// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entity store for Dialdesk.
//!
//! Owns the five authoritative collections (users, clients, calls, activity,
//! notifications), generates identifiers, keeps insertion order, and applies
//! the user-removal cascade atomically. Also provides the list filters and
//! pagination used by the query path.

pub mod collections;
pub mod entity;
pub mod query;
pub mod store;

pub use collections::{Collection, Collections, Removal};
pub use entity::Entity;
pub use query::{CallFilter, ClientFilter, Page, TeamFilter, paginate};
pub use store::EntityStore;
