// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! The core depends on these seams rather than on concrete time sources or
//! storage technologies.

pub mod clock;
pub mod document;

pub use clock::{Clock, SystemClock};
pub use document::{Document, DocumentStore, merge_top_level};
