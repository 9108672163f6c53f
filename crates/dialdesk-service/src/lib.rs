// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mutation and query services for Dialdesk.
//!
//! [`MutationService`] is the sole write path: it validates input, consults
//! the access control policy, applies the change under the store's write
//! lock, and appends activity records. [`QueryService`] serves the
//! role-scoped read path with filtering, pagination, and call-note redaction.

pub mod metrics;
pub mod mutation;
pub mod query;
pub mod requests;
pub mod validate;

pub use mutation::MutationService;
pub use query::{PageRequest, QueryService};
pub use requests::{
    CallCompletion, ClientUpdate, NewCall, NewClient, NewNotification, NewTeamMember,
    Registration, TeamMemberUpdate,
};
