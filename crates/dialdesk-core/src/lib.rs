// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Dialdesk call-center CRM.
//!
//! This crate provides the error taxonomy, domain entities, and collaborator
//! traits (time source, document persistence) used throughout the Dialdesk
//! workspace. It holds no state of its own.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{DialdeskError, ErrorKind};
pub use types::{
    ActivityAction, ActivityRecord, Actor, Call, CallStatus, Capability, Client, ClientStatus,
    EntityKind, HealthStatus, Notification, NotificationType, Role, User,
};

pub use traits::{Clock, Document, DocumentStore, SystemClock};

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn dialdesk_error_kinds_are_distinct() {
        let errors = [
            DialdeskError::validation("email", "missing"),
            DialdeskError::Authorization {
                capability: Capability::DeleteClient,
            },
            DialdeskError::conflict("agent does not exist"),
            DialdeskError::SelfDeletion {
                user_id: "u1".into(),
            },
            DialdeskError::NotFound {
                kind: EntityKind::Client,
                id: "c1".into(),
            },
            DialdeskError::storage(std::io::Error::other("disk")),
            DialdeskError::Config("bad".into()),
            DialdeskError::Internal("oops".into()),
        ];

        let kinds: std::collections::HashSet<ErrorKind> =
            errors.iter().map(DialdeskError::kind).collect();
        assert_eq!(kinds.len(), errors.len());
    }

    #[test]
    fn validation_error_names_the_field() {
        let err = DialdeskError::validation("phone", "must not be empty");
        assert_eq!(err.to_string(), "invalid `phone`: must not be empty");
    }

    #[test]
    fn authorization_error_names_the_capability() {
        let err = DialdeskError::Authorization {
            capability: Capability::AssignClient,
        };
        assert!(err.to_string().contains("assign-client"));
    }

    #[test]
    fn enums_use_kebab_case_spellings() {
        assert_eq!(CallStatus::HungUp.to_string(), "hung-up");
        assert_eq!(CallStatus::InProgress.to_string(), "in-progress");
        assert_eq!(CallStatus::from_str("hung-up").unwrap(), CallStatus::HungUp);
        assert_eq!(
            serde_json::to_string(&CallStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert!(Role::from_str("owner").is_err());
    }

    #[test]
    fn client_serializes_with_camel_case_fields() {
        let now = chrono::Utc::now();
        let client = Client {
            id: "c1".into(),
            name: "Acme Corporation".into(),
            email: "contact@acme.com".into(),
            phone: "+1 (555) 123-4567".into(),
            company: None,
            status: ClientStatus::Pending,
            assigned_to: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&client).unwrap();
        assert!(json.get("assignedTo").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("company").is_none());

        let back: Client = serde_json::from_value(json).unwrap();
        assert_eq!(back, client);
    }

    #[test]
    fn notification_type_field_is_named_type() {
        let now = chrono::Utc::now();
        let n = Notification {
            id: "n1".into(),
            user_id: "u1".into(),
            title: "Call reminder".into(),
            message: "Follow up".into(),
            read: false,
            kind: NotificationType::Warning,
            created_at: now,
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "warning");
    }

    #[test]
    fn double_option_distinguishes_null_from_absent() {
        #[derive(serde::Deserialize)]
        struct Patch {
            #[serde(default, deserialize_with = "types::double_option")]
            company: Option<Option<String>>,
        }

        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.company, None);
        let cleared: Patch = serde_json::from_str(r#"{"company": null}"#).unwrap();
        assert_eq!(cleared.company, Some(None));
        let set: Patch = serde_json::from_str(r#"{"company": "Wayne"}"#).unwrap();
        assert_eq!(set.company, Some(Some("Wayne".into())));
    }

    #[test]
    fn entity_kinds_map_to_collections() {
        assert_eq!(EntityKind::User.collection(), "users");
        assert_eq!(EntityKind::Activity.collection(), "activity");
    }
}
