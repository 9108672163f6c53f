// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handlers are thin: they extract the actor and input, call the service,
//! and let [`ApiError`] pick the status code. Services are synchronous and
//! hold the store lock only briefly, so they are called inline.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use dialdesk_core::{
    ActivityAction, ActivityRecord, Call, Capability, Client, HealthStatus, Notification, Role,
    User,
};
use dialdesk_insights::{AgentPerformance, DashboardStats};
use dialdesk_service::{
    CallCompletion, ClientUpdate, NewCall, NewClient, NewNotification, NewTeamMember,
    PageRequest, Registration, TeamMemberUpdate,
};
use dialdesk_store::{CallFilter, ClientFilter, Page, TeamFilter};

use crate::auth::CurrentActor;
use crate::error::ApiError;
use crate::server::GatewayState;

/// JSON body whose rejections become validation errors.
type Body<T> = WithRejection<Json<T>, ApiError>;
/// Query string whose rejections become validation errors.
type Params<T> = WithRejection<Query<T>, ApiError>;

type ApiResult<T> = Result<Json<T>, ApiError>;
type Created<T> = Result<(StatusCode, Json<T>), ApiError>;

fn created<T>(value: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(value))
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    /// Persistence backend status, when one is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
}

/// Request body for POST /v1/clients/{id}/assign.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AssignRequest {
    pub agent_id: String,
}

/// Query for GET /v1/notifications.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InboxQuery {
    pub unread_only: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inbox {
    pub items: Vec<Notification>,
    pub unread: usize,
}

/// Query for GET /v1/activity.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivityQuery {
    pub action: Option<ActivityAction>,
    pub limit: Option<usize>,
}

const DEFAULT_ACTIVITY_LIMIT: usize = 10;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberRemoved {
    pub removed: User,
    /// Clients left without an assignee by the removal.
    pub unassigned_clients: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub updated: usize,
}

#[derive(Debug, Serialize)]
pub struct CapabilitiesResponse {
    pub role: Role,
    pub capabilities: Vec<Capability>,
}

// --- public ---------------------------------------------------------------

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let storage = match &state.health.documents {
        Some(documents) => Some(match documents.health_check().await {
            Ok(status) => status,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }),
        None => None,
    };
    let code = match storage {
        Some(HealthStatus::Unhealthy(_)) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };
    let status = if code.is_success() { "ok" } else { "unavailable" };

    let body = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        storage: storage.map(|s| match s {
            HealthStatus::Healthy => "healthy".to_string(),
            HealthStatus::Degraded(reason) => format!("degraded: {reason}"),
            HealthStatus::Unhealthy(reason) => format!("unhealthy: {reason}"),
        }),
    };
    (code, Json(body)).into_response()
}

/// GET /metrics
pub async fn get_metrics(State(state): State<GatewayState>) -> Response {
    match &state.health.prometheus_render {
        Some(render) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics exporter disabled").into_response(),
    }
}

// --- registration ---------------------------------------------------------

/// POST /v1/register
pub async fn register(
    State(state): State<GatewayState>,
    WithRejection(Json(body), _): Body<Registration>,
) -> Created<User> {
    Ok(created(state.mutations.register(body)?))
}

// --- clients ----------------------------------------------------------------

/// GET /v1/clients
pub async fn list_clients(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    WithRejection(Query(filter), _): Params<ClientFilter>,
    WithRejection(Query(page), _): Params<PageRequest>,
) -> ApiResult<Page<Client>> {
    Ok(Json(state.queries.list_clients(&actor, &filter, page)?))
}

/// POST /v1/clients
pub async fn create_client(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    WithRejection(Json(body), _): Body<NewClient>,
) -> Created<Client> {
    Ok(created(state.mutations.create_client(&actor, body)?))
}

/// GET /v1/clients/{id}
pub async fn get_client(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> ApiResult<Client> {
    Ok(Json(state.queries.get_client(&actor, &id)?))
}

/// PATCH /v1/clients/{id}
pub async fn update_client(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    WithRejection(Json(body), _): Body<ClientUpdate>,
) -> ApiResult<Client> {
    Ok(Json(state.mutations.update_client(&actor, &id, body)?))
}

/// DELETE /v1/clients/{id}
pub async fn delete_client(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> ApiResult<Client> {
    Ok(Json(state.mutations.delete_client(&actor, &id)?))
}

/// POST /v1/clients/{id}/assign
pub async fn assign_client(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    WithRejection(Json(body), _): Body<AssignRequest>,
) -> ApiResult<Client> {
    Ok(Json(
        state.mutations.assign_client(&actor, &id, &body.agent_id)?,
    ))
}

/// POST /v1/clients/{id}/unassign
pub async fn unassign_client(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> ApiResult<Client> {
    Ok(Json(state.mutations.unassign_client(&actor, &id)?))
}

// --- calls ----------------------------------------------------------------

/// GET /v1/calls
pub async fn list_calls(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    WithRejection(Query(filter), _): Params<CallFilter>,
    WithRejection(Query(page), _): Params<PageRequest>,
) -> ApiResult<Page<Call>> {
    Ok(Json(state.queries.list_calls(&actor, &filter, page)?))
}

/// POST /v1/calls
pub async fn record_call(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    WithRejection(Json(body), _): Body<NewCall>,
) -> Created<Call> {
    Ok(created(state.mutations.record_call(&actor, body)?))
}

/// POST /v1/calls/{id}/complete
pub async fn complete_call(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    WithRejection(Json(body), _): Body<CallCompletion>,
) -> ApiResult<Call> {
    Ok(Json(state.mutations.complete_call(&actor, &id, body)?))
}

// --- team -----------------------------------------------------------------

/// GET /v1/team
pub async fn list_team(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    WithRejection(Query(filter), _): Params<TeamFilter>,
    WithRejection(Query(page), _): Params<PageRequest>,
) -> ApiResult<Page<User>> {
    Ok(Json(state.queries.list_team(&actor, &filter, page)?))
}

/// POST /v1/team
pub async fn create_team_member(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    WithRejection(Json(body), _): Body<NewTeamMember>,
) -> Created<User> {
    Ok(created(state.mutations.create_team_member(&actor, body)?))
}

/// PATCH /v1/team/{id}
pub async fn update_team_member(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    WithRejection(Json(body), _): Body<TeamMemberUpdate>,
) -> ApiResult<User> {
    Ok(Json(state.mutations.update_team_member(&actor, &id, body)?))
}

/// DELETE /v1/team/{id}
pub async fn delete_team_member(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> ApiResult<TeamMemberRemoved> {
    let removal = state.mutations.delete_team_member(&actor, &id)?;
    Ok(Json(TeamMemberRemoved {
        removed: removal.removed,
        unassigned_clients: removal.unassigned_clients,
    }))
}

// --- notifications --------------------------------------------------------

/// GET /v1/notifications
pub async fn list_notifications(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    WithRejection(Query(query), _): Params<InboxQuery>,
) -> ApiResult<Inbox> {
    Ok(Json(Inbox {
        items: state.queries.notifications(&actor, query.unread_only),
        unread: state.queries.unread_count(&actor),
    }))
}

/// POST /v1/notifications
pub async fn send_notification(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    WithRejection(Json(body), _): Body<NewNotification>,
) -> Created<Notification> {
    Ok(created(state.mutations.send_notification(&actor, body)?))
}

/// POST /v1/notifications/{id}/read
pub async fn mark_notification_read(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> ApiResult<Notification> {
    Ok(Json(state.mutations.mark_notification_read(&actor, &id)?))
}

/// POST /v1/notifications/read-all
pub async fn mark_all_notifications_read(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
) -> ApiResult<MarkedRead> {
    let updated = state
        .mutations
        .mark_all_notifications_read(&actor, &actor.id)?;
    Ok(Json(MarkedRead { updated }))
}

/// DELETE /v1/notifications/{id}
pub async fn delete_notification(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> ApiResult<Notification> {
    Ok(Json(state.mutations.delete_notification(&actor, &id)?))
}

// --- activity and insights ------------------------------------------------

/// GET /v1/activity
pub async fn recent_activity(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    WithRejection(Query(query), _): Params<ActivityQuery>,
) -> ApiResult<Vec<ActivityRecord>> {
    let limit = query.limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT);
    Ok(Json(
        state.queries.recent_activity(&actor, query.action, limit)?,
    ))
}

/// GET /v1/dashboard
pub async fn dashboard(State(state): State<GatewayState>) -> Json<DashboardStats> {
    Json(state.insights.dashboard_stats())
}

/// GET /v1/performance
pub async fn team_performance(State(state): State<GatewayState>) -> Json<Vec<AgentPerformance>> {
    Json(state.insights.team_performance())
}

/// GET /v1/performance/{user_id}
pub async fn agent_performance(
    State(state): State<GatewayState>,
    Path(user_id): Path<String>,
) -> ApiResult<AgentPerformance> {
    Ok(Json(state.insights.agent_performance(&user_id)?))
}

/// GET /v1/capabilities
pub async fn capabilities(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
) -> Json<CapabilitiesResponse> {
    Json(CapabilitiesResponse {
        capabilities: state.queries.capabilities(&actor),
        role: actor.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_request_uses_camel_case() {
        let req: AssignRequest = serde_json::from_str(r#"{"agentId": "u1"}"#).unwrap();
        assert_eq!(req.agent_id, "u1");
        assert!(serde_json::from_str::<AssignRequest>(r#"{"agent_id": "u1"}"#).is_err());
    }

    #[test]
    fn health_response_omits_storage_when_unset() {
        let body = HealthResponse {
            status: "ok".into(),
            version: "0.1.0".into(),
            uptime_secs: 3,
            storage: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["uptimeSecs"], 3);
        assert!(json.get("storage").is_none());
    }
}
