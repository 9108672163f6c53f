// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Access control policy for Dialdesk.
//!
//! A pure decision table mapping `(role, capability)` to allow or deny. Every
//! mutation consults it before touching the store, and the presentation layer
//! queries [`capabilities_for`] instead of re-encoding the rules.
//!
//! | capability               | admin | supervisor | agent |
//! |--------------------------|-------|------------|-------|
//! | view client              | yes   | yes        | yes   |
//! | create client            | yes   | yes        | yes   |
//! | edit client              | yes   | yes        | yes   |
//! | assign/unassign client   | yes   | yes        | no    |
//! | delete client            | yes   | no         | no    |
//! | record call              | yes   | yes        | yes   |
//! | view calls               | yes   | yes        | yes   |
//! | view call notes          | yes   | yes        | no    |
//! | view team                | yes   | yes        | no    |
//! | manage team              | yes   | no         | no    |
//! | view activity            | yes   | yes        | yes   |
//! | send notification        | yes   | yes        | no    |
//! | manage own notifications | yes   | yes        | yes   |
//!
//! Deleting one's own team-member record is never allowed; the mutation
//! service reports it as `SelfDeletion` rather than through this table.

use dialdesk_core::{Actor, Capability, DialdeskError, Role};
use strum::IntoEnumIterator;

/// Whether `role` holds `capability`.
pub fn can_perform(role: Role, capability: Capability) -> bool {
    use Capability::*;

    match capability {
        ViewClient | CreateClient | EditClient | RecordCall | ViewCalls | ViewActivity
        | ManageOwnNotifications => true,
        AssignClient | ViewCallNotes | ViewTeam | SendNotification => {
            matches!(role, Role::Admin | Role::Supervisor)
        }
        DeleteClient | ManageTeam => role == Role::Admin,
    }
}

/// Every capability `role` holds, in declaration order.
pub fn capabilities_for(role: Role) -> Vec<Capability> {
    Capability::iter()
        .filter(|&capability| can_perform(role, capability))
        .collect()
}

/// Fail with `Authorization` unless the actor's role holds `capability`.
pub fn require(actor: &Actor, capability: Capability) -> Result<(), DialdeskError> {
    if can_perform(actor.role, capability) {
        return Ok(());
    }
    tracing::debug!(
        actor_id = %actor.id,
        role = %actor.role,
        capability = %capability,
        "capability denied"
    );
    Err(DialdeskError::Authorization { capability })
}

/// Fail with `Authorization` unless the actor is the notification's recipient.
pub fn require_recipient(actor: &Actor, recipient_id: &str) -> Result<(), DialdeskError> {
    require(actor, Capability::ManageOwnNotifications)?;
    if actor.id == recipient_id {
        return Ok(());
    }
    Err(DialdeskError::Authorization {
        capability: Capability::ManageOwnNotifications,
    })
}
