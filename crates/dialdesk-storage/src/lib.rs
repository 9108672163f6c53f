// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document persistence for Dialdesk.
//!
//! Provides the SQLite and in-memory [`DocumentStore`](dialdesk_core::DocumentStore)
//! implementations and the snapshot functions that move the entity store in
//! and out of them.

pub mod memory;
pub mod migrations;
pub mod snapshot;
pub mod sqlite;

pub use memory::MemoryDocumentStore;
pub use snapshot::{PersistReport, hydrate, persist};
pub use sqlite::SqliteDocumentStore;
