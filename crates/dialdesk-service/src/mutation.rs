// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The mutation service: the only write path into the entity store.
//!
//! Every operation runs the same pipeline:
//!
//! 1. validate the input shape, naming the offending field;
//! 2. consult the access control policy;
//! 3. under the store's write lock, resolve referenced ids and apply the change;
//! 4. stamp `updatedAt`;
//! 5. for client-affecting operations, append an activity record.
//!
//! Steps 3 to 5 run inside one critical section, and nothing is written
//! until every check in it has passed, so a failed operation leaves no trace.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dialdesk_config::model::LimitsConfig;
use dialdesk_core::{
    ActivityAction, ActivityRecord, Actor, Call, CallStatus, Capability, Client, ClientStatus,
    Clock, DialdeskError, ErrorKind, Notification, NotificationType, Role, User,
};
use dialdesk_policy as policy;
use dialdesk_store::{Collections, Entity, EntityStore, Removal};

use crate::metrics::record_mutation;
use crate::requests::{
    CallCompletion, ClientUpdate, NewCall, NewClient, NewNotification, NewTeamMember,
    Registration, TeamMemberUpdate,
};
use crate::validate;

/// Applies validated, authorized mutations to the entity store.
pub struct MutationService {
    store: Arc<EntityStore>,
    clock: Arc<dyn Clock>,
    max_text_len: usize,
}

impl MutationService {
    pub fn new(store: Arc<EntityStore>, clock: Arc<dyn Clock>, limits: &LimitsConfig) -> Self {
        Self {
            store,
            clock,
            max_text_len: limits.max_text_len,
        }
    }

    pub fn store(&self) -> &Arc<EntityStore> {
        &self.store
    }

    // --- clients -----------------------------------------------------------

    pub fn create_client(&self, actor: &Actor, input: NewClient) -> Result<Client, DialdeskError> {
        self.run("create_client", &actor.id, || {
            let name = validate::required_text("name", &input.name, self.max_text_len)?;
            let email = validate::email("email", &input.email)?;
            let phone = validate::phone("phone", &input.phone)?;
            let company =
                validate::optional_text("company", input.company.as_deref(), self.max_text_len)?;
            policy::require(actor, Capability::CreateClient)?;

            let now = self.clock.now();
            let client = Client {
                id: String::new(),
                name,
                email,
                phone,
                company,
                status: input.status.unwrap_or(ClientStatus::Pending),
                assigned_to: None,
                created_at: now,
                updated_at: now,
            };

            Ok(self.store.write(|c| {
                let id = c.insert(client.clone());
                append_activity(
                    c,
                    actor,
                    &id,
                    ActivityAction::Created,
                    format!("Client {} created", client.name),
                    now,
                );
                Client { id, ..client }
            }))
        })
    }

    /// Merge `update` into the client. Absent fields are preserved.
    pub fn update_client(
        &self,
        actor: &Actor,
        client_id: &str,
        update: ClientUpdate,
    ) -> Result<Client, DialdeskError> {
        self.run("update_client", &actor.id, || {
            if update.is_empty() {
                return Err(DialdeskError::validation("update", "no fields to update"));
            }
            let name = update
                .name
                .as_deref()
                .map(|v| validate::required_text("name", v, self.max_text_len))
                .transpose()?;
            let email = update
                .email
                .as_deref()
                .map(|v| validate::email("email", v))
                .transpose()?;
            let phone = update
                .phone
                .as_deref()
                .map(|v| validate::phone("phone", v))
                .transpose()?;
            let company = update
                .company
                .as_ref()
                .map(|v| validate::optional_text("company", v.as_deref(), self.max_text_len))
                .transpose()?;
            policy::require(actor, Capability::EditClient)?;

            let now = self.clock.now();
            self.store.write(|c| {
                existing::<Client>(c, "client_id", client_id)?;

                let mut changed = Vec::new();
                let updated = c.modify::<Client>(client_id, |client| {
                    if let Some(name) = name {
                        client.name = name;
                        changed.push("name");
                    }
                    if let Some(email) = email {
                        client.email = email;
                        changed.push("email");
                    }
                    if let Some(phone) = phone {
                        client.phone = phone;
                        changed.push("phone");
                    }
                    if let Some(company) = company {
                        client.company = company;
                        changed.push("company");
                    }
                    if let Some(status) = update.status {
                        client.status = status;
                        changed.push("status");
                    }
                    client.updated_at = now;
                })?;

                append_activity(
                    c,
                    actor,
                    client_id,
                    ActivityAction::Updated,
                    format!("Updated {}", changed.join(", ")),
                    now,
                );
                Ok(updated)
            })
        })
    }

    /// Delete a client. Its calls and activity records are kept.
    pub fn delete_client(&self, actor: &Actor, client_id: &str) -> Result<Client, DialdeskError> {
        self.run("delete_client", &actor.id, || {
            policy::require(actor, Capability::DeleteClient)?;

            let now = self.clock.now();
            self.store.write(|c| {
                existing::<Client>(c, "client_id", client_id)?;
                let removal = c.remove::<Client>(client_id)?;
                append_activity(
                    c,
                    actor,
                    client_id,
                    ActivityAction::Deleted,
                    format!("Client {} deleted", removal.removed.name),
                    now,
                );
                Ok(removal.removed)
            })
        })
    }

    /// Assign a client to a team member and notify the assignee.
    ///
    /// Fails with `Conflict` when `agent_id` is not an existing user or is
    /// already the client's assignee.
    pub fn assign_client(
        &self,
        actor: &Actor,
        client_id: &str,
        agent_id: &str,
    ) -> Result<Client, DialdeskError> {
        self.run("assign_client", &actor.id, || {
            let agent_id = validate::required_text("agent_id", agent_id, self.max_text_len)?;
            policy::require(actor, Capability::AssignClient)?;

            let now = self.clock.now();
            self.store.write(|c| {
                let previous = existing::<Client>(c, "client_id", client_id)?
                    .assigned_to
                    .clone();
                let agent_name = c
                    .get::<User>(&agent_id)
                    .map(|u| u.name.clone())
                    .ok_or_else(|| {
                        DialdeskError::conflict(format!("user `{agent_id}` does not exist"))
                    })?;
                if previous.as_deref() == Some(agent_id.as_str()) {
                    return Err(DialdeskError::conflict(format!(
                        "client `{client_id}` is already assigned to {agent_name}"
                    )));
                }
                let details = match previous {
                    Some(previous) => {
                        let previous_name = c
                            .get::<User>(&previous)
                            .map(|u| u.name.clone())
                            .unwrap_or(previous);
                        format!("Reassigned from {previous_name} to {agent_name}")
                    }
                    None => format!("Assigned to {agent_name}"),
                };

                let updated = c.modify::<Client>(client_id, |client| {
                    client.assigned_to = Some(agent_id.clone());
                    client.updated_at = now;
                })?;

                append_activity(
                    c,
                    actor,
                    client_id,
                    ActivityAction::Assigned,
                    details,
                    now,
                );
                c.insert(Notification {
                    id: String::new(),
                    user_id: agent_id.clone(),
                    title: "New client assigned".to_string(),
                    message: format!("{} has been assigned to you", updated.name),
                    read: false,
                    kind: NotificationType::Info,
                    created_at: now,
                });
                Ok(updated)
            })
        })
    }

    /// Clear a client's assignee. Fails with `Conflict` if it has none.
    pub fn unassign_client(&self, actor: &Actor, client_id: &str) -> Result<Client, DialdeskError> {
        self.run("unassign_client", &actor.id, || {
            policy::require(actor, Capability::AssignClient)?;

            let now = self.clock.now();
            self.store.write(|c| {
                let client = existing::<Client>(c, "client_id", client_id)?;
                let Some(previous) = client.assigned_to.clone() else {
                    return Err(DialdeskError::conflict(format!(
                        "client `{client_id}` is not assigned"
                    )));
                };
                let previous_name = c
                    .get::<User>(&previous)
                    .map(|u| u.name.clone())
                    .unwrap_or(previous);

                let updated = c.modify::<Client>(client_id, |client| {
                    client.assigned_to = None;
                    client.updated_at = now;
                })?;

                append_activity(
                    c,
                    actor,
                    client_id,
                    ActivityAction::Unassigned,
                    format!("Unassigned from {previous_name}"),
                    now,
                );
                Ok(updated)
            })
        })
    }

    // --- calls -------------------------------------------------------------

    pub fn record_call(&self, actor: &Actor, input: NewCall) -> Result<Call, DialdeskError> {
        self.run("record_call", &actor.id, || {
            let client_id = validate::required_text("client_id", &input.client_id, self.max_text_len)?;
            let agent_id = validate::required_text("agent_id", &input.agent_id, self.max_text_len)?;
            let status = validate::present("status", input.status)?;
            let duration = match (status, input.duration) {
                (CallStatus::InProgress, Some(d)) if d > 0 => {
                    return Err(DialdeskError::validation(
                        "duration",
                        "must be 0 while the call is in progress",
                    ));
                }
                (_, d) => d.unwrap_or(0),
            };
            let notes = validate::optional_text("notes", input.notes.as_deref(), self.max_text_len)?;
            policy::require(actor, Capability::RecordCall)?;

            let now = self.clock.now();
            self.store.write(|c| {
                existing::<Client>(c, "client_id", &client_id)?;
                existing::<User>(c, "agent_id", &agent_id)?;

                let call = Call {
                    id: String::new(),
                    client_id,
                    agent_id,
                    status,
                    duration,
                    notes,
                    created_at: now,
                    updated_at: now,
                };
                let id = c.insert(call.clone());
                Ok(Call { id, ..call })
            })
        })
    }

    /// Finish an in-progress call with its final status and duration.
    pub fn complete_call(
        &self,
        actor: &Actor,
        call_id: &str,
        input: CallCompletion,
    ) -> Result<Call, DialdeskError> {
        self.run("complete_call", &actor.id, || {
            let status = validate::present("status", input.status)?;
            let duration = validate::present("duration", input.duration)?;
            if status == CallStatus::InProgress {
                return Err(DialdeskError::validation(
                    "status",
                    "a completed call must be effective or hung-up",
                ));
            }
            let notes = validate::optional_text("notes", input.notes.as_deref(), self.max_text_len)?;
            policy::require(actor, Capability::RecordCall)?;

            let now = self.clock.now();
            self.store.write(|c| {
                let call = existing::<Call>(c, "call_id", call_id)?;
                if call.status != CallStatus::InProgress {
                    return Err(DialdeskError::conflict(format!(
                        "call `{call_id}` is already {}",
                        call.status
                    )));
                }

                c.modify::<Call>(call_id, |call| {
                    call.status = status;
                    call.duration = duration;
                    if notes.is_some() {
                        call.notes = notes;
                    }
                    call.updated_at = now;
                })
            })
        })
    }

    // --- team --------------------------------------------------------------

    /// Self-registration. The first user becomes an admin, later ones agents.
    pub fn register(&self, input: Registration) -> Result<User, DialdeskError> {
        self.run("register", "anonymous", || {
            let name = validate::required_text("name", &input.name, self.max_text_len)?;
            let email = validate::email("email", &input.email)?;

            let now = self.clock.now();
            self.store.write(|c| {
                ensure_email_free(c, &email, None)?;
                let role = if c.count::<User>() == 0 {
                    Role::Admin
                } else {
                    Role::Agent
                };
                let user = User {
                    id: String::new(),
                    name,
                    email,
                    role,
                    avatar: None,
                    created_at: now,
                    updated_at: now,
                };
                let id = c.insert(user.clone());
                Ok(User { id, ..user })
            })
        })
    }

    pub fn create_team_member(
        &self,
        actor: &Actor,
        input: NewTeamMember,
    ) -> Result<User, DialdeskError> {
        self.run("create_team_member", &actor.id, || {
            let name = validate::required_text("name", &input.name, self.max_text_len)?;
            let email = validate::email("email", &input.email)?;
            let role = validate::present("role", input.role)?;
            let avatar = validate::optional_text("avatar", input.avatar.as_deref(), self.max_text_len)?;
            policy::require(actor, Capability::ManageTeam)?;

            let now = self.clock.now();
            self.store.write(|c| {
                ensure_email_free(c, &email, None)?;
                let user = User {
                    id: String::new(),
                    name,
                    email,
                    role,
                    avatar,
                    created_at: now,
                    updated_at: now,
                };
                let id = c.insert(user.clone());
                Ok(User { id, ..user })
            })
        })
    }

    /// Merge `update` into a team member. Roles cannot change.
    pub fn update_team_member(
        &self,
        actor: &Actor,
        user_id: &str,
        update: TeamMemberUpdate,
    ) -> Result<User, DialdeskError> {
        self.run("update_team_member", &actor.id, || {
            if update.is_empty() {
                return Err(DialdeskError::validation("update", "no fields to update"));
            }
            if update.role.is_some() {
                return Err(DialdeskError::validation(
                    "role",
                    "cannot be changed after creation",
                ));
            }
            let name = update
                .name
                .as_deref()
                .map(|v| validate::required_text("name", v, self.max_text_len))
                .transpose()?;
            let email = update
                .email
                .as_deref()
                .map(|v| validate::email("email", v))
                .transpose()?;
            let avatar = update
                .avatar
                .as_ref()
                .map(|v| validate::optional_text("avatar", v.as_deref(), self.max_text_len))
                .transpose()?;
            policy::require(actor, Capability::ManageTeam)?;

            let now = self.clock.now();
            self.store.write(|c| {
                existing::<User>(c, "user_id", user_id)?;
                if let Some(email) = &email {
                    ensure_email_free(c, email, Some(user_id))?;
                }

                c.modify::<User>(user_id, |user| {
                    if let Some(name) = name {
                        user.name = name;
                    }
                    if let Some(email) = email {
                        user.email = email;
                    }
                    if let Some(avatar) = avatar {
                        user.avatar = avatar;
                    }
                    user.updated_at = now;
                })
            })
        })
    }

    /// Remove a team member, orphaning their clients.
    ///
    /// Each orphaned client gets its `updatedAt` stamped and an `unassigned`
    /// activity record. Deleting one's own account fails with `SelfDeletion`.
    pub fn delete_team_member(
        &self,
        actor: &Actor,
        user_id: &str,
    ) -> Result<Removal<User>, DialdeskError> {
        self.run("delete_team_member", &actor.id, || {
            policy::require(actor, Capability::ManageTeam)?;
            if actor.id == user_id {
                return Err(DialdeskError::SelfDeletion {
                    user_id: user_id.to_string(),
                });
            }

            let now = self.clock.now();
            self.store.write(|c| {
                existing::<User>(c, "user_id", user_id)?;
                let removal = c.remove::<User>(user_id)?;

                for client_id in &removal.unassigned_clients {
                    c.modify::<Client>(client_id, |client| client.updated_at = now)?;
                    append_activity(
                        c,
                        actor,
                        client_id,
                        ActivityAction::Unassigned,
                        format!(
                            "Unassigned because team member {} was removed",
                            removal.removed.name
                        ),
                        now,
                    );
                }
                Ok(removal)
            })
        })
    }

    // --- notifications -----------------------------------------------------

    pub fn send_notification(
        &self,
        actor: &Actor,
        input: NewNotification,
    ) -> Result<Notification, DialdeskError> {
        self.run("send_notification", &actor.id, || {
            let user_id = validate::required_text("user_id", &input.user_id, self.max_text_len)?;
            let title = validate::required_text("title", &input.title, self.max_text_len)?;
            let message = validate::required_text("message", &input.message, self.max_text_len)?;
            policy::require(actor, Capability::SendNotification)?;

            let now = self.clock.now();
            self.store.write(|c| {
                existing::<User>(c, "user_id", &user_id)?;
                let notification = Notification {
                    id: String::new(),
                    user_id,
                    title,
                    message,
                    read: false,
                    kind: input.kind.unwrap_or(NotificationType::Info),
                    created_at: now,
                };
                let id = c.insert(notification.clone());
                Ok(Notification { id, ..notification })
            })
        })
    }

    pub fn mark_notification_read(
        &self,
        actor: &Actor,
        notification_id: &str,
    ) -> Result<Notification, DialdeskError> {
        self.run("mark_notification_read", &actor.id, || {
            policy::require(actor, Capability::ManageOwnNotifications)?;
            self.store.write(|c| {
                let notification =
                    existing::<Notification>(c, "notification_id", notification_id)?;
                policy::require_recipient(actor, &notification.user_id)?;
                c.modify::<Notification>(notification_id, |n| n.read = true)
            })
        })
    }

    /// Mark every unread notification of `user_id` as read. Returns how many changed.
    pub fn mark_all_notifications_read(
        &self,
        actor: &Actor,
        user_id: &str,
    ) -> Result<usize, DialdeskError> {
        self.run("mark_all_notifications_read", &actor.id, || {
            policy::require_recipient(actor, user_id)?;
            self.store.write(|c| {
                let unread: Vec<String> = c
                    .iter::<Notification>()
                    .filter(|n| n.user_id == user_id && !n.read)
                    .map(|n| n.id.clone())
                    .collect();
                for id in &unread {
                    c.modify::<Notification>(id, |n| n.read = true)?;
                }
                Ok(unread.len())
            })
        })
    }

    pub fn delete_notification(
        &self,
        actor: &Actor,
        notification_id: &str,
    ) -> Result<Notification, DialdeskError> {
        self.run("delete_notification", &actor.id, || {
            policy::require(actor, Capability::ManageOwnNotifications)?;
            self.store.write(|c| {
                let notification =
                    existing::<Notification>(c, "notification_id", notification_id)?;
                policy::require_recipient(actor, &notification.user_id)?;
                Ok(c.remove::<Notification>(notification_id)?.removed)
            })
        })
    }

    /// Run one operation, then log and count its outcome.
    fn run<T>(
        &self,
        operation: &'static str,
        actor_id: &str,
        op: impl FnOnce() -> Result<T, DialdeskError>,
    ) -> Result<T, DialdeskError> {
        let result = op();
        match &result {
            Ok(_) => {
                tracing::info!(operation, actor_id, "mutation applied");
                record_mutation(operation, "ok");
            }
            Err(err) => {
                let kind = err.kind();
                match kind {
                    ErrorKind::Authorization | ErrorKind::SelfDeletion => {
                        tracing::warn!(operation, actor_id, error = %err, "mutation denied");
                    }
                    ErrorKind::Storage | ErrorKind::Config | ErrorKind::Internal => {
                        tracing::error!(operation, actor_id, error = %err, "mutation failed");
                    }
                    _ => {
                        tracing::debug!(operation, actor_id, error = %err, "mutation rejected");
                    }
                }
                record_mutation(operation, &kind.to_string());
            }
        }
        result
    }
}

/// Resolve a referenced id, reporting a miss as a validation error on `field`.
fn existing<'a, T: Entity>(
    c: &'a Collections,
    field: &str,
    id: &str,
) -> Result<&'a T, DialdeskError> {
    c.get::<T>(id).ok_or_else(|| {
        DialdeskError::validation(field, format!("no {} with id `{id}`", T::KIND))
    })
}

/// Emails are unique across users, compared case-insensitively.
fn ensure_email_free(
    c: &Collections,
    email: &str,
    except_user: Option<&str>,
) -> Result<(), DialdeskError> {
    let taken = c
        .iter::<User>()
        .any(|u| u.email.eq_ignore_ascii_case(email) && Some(u.id.as_str()) != except_user);
    if taken {
        return Err(DialdeskError::conflict(format!(
            "email `{email}` is already registered"
        )));
    }
    Ok(())
}

fn append_activity(
    c: &mut Collections,
    actor: &Actor,
    client_id: &str,
    action: ActivityAction,
    details: String,
    now: DateTime<Utc>,
) {
    c.insert(ActivityRecord {
        id: String::new(),
        client_id: client_id.to_string(),
        user_id: actor.id.clone(),
        action,
        details,
        created_at: now,
    });
}
