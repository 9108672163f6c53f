// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Input shapes accepted by the mutation service.
//!
//! Required string fields default to empty when absent so the service can
//! report them as a `Validation` error naming the field.

use dialdesk_core::types::double_option;
use dialdesk_core::{CallStatus, ClientStatus, NotificationType, Role};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    /// Defaults to `pending`.
    pub status: Option<ClientStatus>,
}

/// Merge-style client update. Absent fields are left unchanged;
/// `company: null` clears the company.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClientUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub company: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<ClientStatus>,
}

impl ClientUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.company.is_none()
            && self.status.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCall {
    pub client_id: String,
    pub agent_id: String,
    pub status: Option<CallStatus>,
    /// Seconds. Must be zero (or absent) for an in-progress call.
    pub duration: Option<u32>,
    pub notes: Option<String>,
}

/// Final outcome of an in-progress call.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CallCompletion {
    pub status: Option<CallStatus>,
    /// Seconds. Required.
    pub duration: Option<u32>,
    /// Replaces the call's notes when present.
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct NewTeamMember {
    pub name: String,
    pub email: String,
    pub role: Option<Role>,
    pub avatar: Option<String>,
}

/// Merge-style team member update. `avatar: null` clears the avatar.
///
/// `role` is accepted only to reject it: roles never change after creation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TeamMemberUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub avatar: Option<Option<String>>,
    #[serde(default)]
    pub role: Option<Role>,
}

impl TeamMemberUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.avatar.is_none() && self.role.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Registration {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct NewNotification {
    /// Recipient.
    pub user_id: String,
    pub title: String,
    pub message: String,
    /// Defaults to `info`.
    #[serde(rename = "type")]
    pub kind: Option<NotificationType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_update_distinguishes_clear_from_absent() {
        let keep: ClientUpdate = serde_json::from_str(r#"{"status": "active"}"#).unwrap();
        assert_eq!(keep.company, None);
        assert!(!keep.is_empty());

        let clear: ClientUpdate = serde_json::from_str(r#"{"company": null}"#).unwrap();
        assert_eq!(clear.company, Some(None));
    }

    #[test]
    fn empty_update_is_detected() {
        let empty: ClientUpdate = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
        let empty: TeamMemberUpdate = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<NewClient>(r#"{"nmae": "x"}"#).is_err());
    }

    #[test]
    fn notification_kind_reads_type_key() {
        let n: NewNotification =
            serde_json::from_str(r#"{"userId": "u1", "title": "t", "message": "m", "type": "warning"}"#)
                .unwrap();
        assert_eq!(n.kind, Some(NotificationType::Warning));
    }

    #[test]
    fn missing_required_strings_default_to_empty() {
        let call: NewCall = serde_json::from_str(r#"{"status": "effective"}"#).unwrap();
        assert!(call.client_id.is_empty());
        assert_eq!(call.status, Some(CallStatus::Effective));
    }
}
