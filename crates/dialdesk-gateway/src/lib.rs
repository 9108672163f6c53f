// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Dialdesk.
//!
//! Exposes every mutation, query, and aggregation operation as JSON over
//! HTTP under `/v1`, behind bearer-token auth, plus public `/health` and
//! `/metrics`. Service errors map to distinct status codes; see
//! [`error::status_for`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use auth::{ACTOR_ID_HEADER, ACTOR_ROLE_HEADER, AuthConfig, CurrentActor};
pub use error::{ApiError, ErrorResponse};
pub use server::{GatewayState, HealthState, MetricsRender, router, start_server};
