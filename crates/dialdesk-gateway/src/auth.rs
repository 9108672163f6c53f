// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-token middleware and actor extraction.
//!
//! `/v1` routes require `Authorization: Bearer <token>`. When no token is
//! configured every request is rejected (fail-closed). The identity of the
//! caller is then read from `x-actor-id` / `x-actor-role`, set by the trusted
//! identity layer in front of the gateway.

use std::str::FromStr;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::Response,
};

use dialdesk_core::{Actor, DialdeskError, Role};

use crate::error::ApiError;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Authentication configuration for the gateway.
#[derive(Clone)]
pub struct AuthConfig {
    /// Expected bearer token. `None` rejects every request.
    pub bearer_token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

/// Middleware that validates the bearer token.
pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = auth.bearer_token.as_deref() else {
        tracing::error!("gateway has no bearer token configured -- rejecting request");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token {
        Some(token) if token == expected => Ok(next.run(request).await),
        _ => {
            tracing::debug!(path = %request.uri().path(), "bearer token rejected");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// The actor performing the request, taken from the identity headers.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header(parts, ACTOR_ID_HEADER)
            .ok_or_else(|| DialdeskError::validation(ACTOR_ID_HEADER, "header is required"))?;
        let role = header(parts, ACTOR_ROLE_HEADER)
            .ok_or_else(|| DialdeskError::validation(ACTOR_ROLE_HEADER, "header is required"))?;
        let role = Role::from_str(role).map_err(|_| {
            DialdeskError::validation(
                ACTOR_ROLE_HEADER,
                format!("unknown role `{role}` (expected admin, supervisor, or agent)"),
            )
        })?;

        Ok(Self(Actor::new(id, role)))
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    async fn extract(headers: &[(&str, &str)]) -> Result<CurrentActor, ApiError> {
        let mut builder = HttpRequest::builder().uri("/v1/clients");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        CurrentActor::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn reads_actor_from_headers() {
        let CurrentActor(actor) = extract(&[("x-actor-id", "u1"), ("x-actor-role", "supervisor")])
            .await
            .unwrap();
        assert_eq!(actor, Actor::new("u1", Role::Supervisor));
    }

    #[tokio::test]
    async fn rejects_missing_or_unknown_role() {
        let err = extract(&[("x-actor-id", "u1")]).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let err = extract(&[("x-actor-id", "u1"), ("x-actor-role", "owner")])
            .await
            .unwrap_err();
        assert!(err.0.to_string().contains("owner"));
    }

    #[test]
    fn auth_config_debug_redacts_token() {
        let config = AuthConfig {
            bearer_token: Some("secret-token".to_string()),
        };
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("secret-token"));
        assert!(debug_output.contains("[redacted]"));
    }
}
