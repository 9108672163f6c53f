// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Dialdesk call-center core.

use serde::Serialize;
use strum::{Display, EnumString};
use thiserror::Error;

use crate::types::{Capability, EntityKind};

/// The primary error type returned by every store, service, and collaborator call.
///
/// The first four variants form the client-visible taxonomy. Each operation is
/// all-or-nothing: when one of these is returned, no state was committed.
#[derive(Debug, Error)]
pub enum DialdeskError {
    /// Malformed, missing, or out-of-range input. Recoverable by correcting the input.
    #[error("invalid `{field}`: {message}")]
    Validation { field: String, message: String },

    /// The actor's role lacks the capability the operation requires.
    #[error("not authorized: requires capability `{capability}`")]
    Authorization { capability: Capability },

    /// A referenced entity is missing or a constraint would be violated.
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// The actor attempted to delete their own team-member record.
    #[error("user `{user_id}` cannot delete their own account")]
    SelfDeletion { user_id: String },

    /// A store-level lookup by id found nothing.
    #[error("{kind} `{id}` not found")]
    NotFound { kind: EntityKind, id: String },

    /// Persistence collaborator errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors surfaced at runtime.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Discriminant of [`DialdeskError`], used by transports to pick a response code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Authorization,
    Conflict,
    SelfDeletion,
    NotFound,
    Storage,
    Config,
    Internal,
}

impl DialdeskError {
    /// Build a validation error naming the offending field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Build a conflict error with a human-readable detail.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Wrap any error as a storage failure.
    pub fn storage(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage {
            source: Box::new(source),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Authorization { .. } => ErrorKind::Authorization,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::SelfDeletion { .. } => ErrorKind::SelfDeletion,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Storage { .. } => ErrorKind::Storage,
            Self::Config(_) => ErrorKind::Config,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<serde_json::Error> for DialdeskError {
    fn from(err: serde_json::Error) -> Self {
        Self::storage(err)
    }
}
