// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use dialdesk_config::model::GatewayConfig;
use dialdesk_core::{DialdeskError, DocumentStore};
use dialdesk_insights::Insights;
use dialdesk_service::{MutationService, QueryService};

use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;

/// Renders the Prometheus text exposition.
pub type MetricsRender = Arc<dyn Fn() -> String + Send + Sync>;

/// State for the unauthenticated health and metrics endpoints.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    /// Persistence backend, probed by `/health` when present.
    pub documents: Option<Arc<dyn DocumentStore>>,
    pub prometheus_render: Option<MetricsRender>,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub mutations: Arc<MutationService>,
    pub queries: Arc<QueryService>,
    pub insights: Arc<Insights>,
    pub auth: AuthConfig,
    pub health: HealthState,
}

/// Build the full router: public `/health` and `/metrics`, and the `/v1`
/// API behind bearer auth.
pub fn router(state: GatewayState) -> Router {
    let auth_state = state.auth.clone();

    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/metrics", get(handlers::get_metrics))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/v1/register", post(handlers::register))
        .route(
            "/v1/clients",
            get(handlers::list_clients).post(handlers::create_client),
        )
        .route(
            "/v1/clients/{id}",
            get(handlers::get_client)
                .patch(handlers::update_client)
                .delete(handlers::delete_client),
        )
        .route("/v1/clients/{id}/assign", post(handlers::assign_client))
        .route("/v1/clients/{id}/unassign", post(handlers::unassign_client))
        .route(
            "/v1/calls",
            get(handlers::list_calls).post(handlers::record_call),
        )
        .route("/v1/calls/{id}/complete", post(handlers::complete_call))
        .route(
            "/v1/team",
            get(handlers::list_team).post(handlers::create_team_member),
        )
        .route(
            "/v1/team/{id}",
            axum::routing::patch(handlers::update_team_member)
                .delete(handlers::delete_team_member),
        )
        .route(
            "/v1/notifications",
            get(handlers::list_notifications).post(handlers::send_notification),
        )
        .route(
            "/v1/notifications/read-all",
            post(handlers::mark_all_notifications_read),
        )
        .route(
            "/v1/notifications/{id}",
            axum::routing::delete(handlers::delete_notification),
        )
        .route(
            "/v1/notifications/{id}/read",
            post(handlers::mark_notification_read),
        )
        .route("/v1/activity", get(handlers::recent_activity))
        .route("/v1/dashboard", get(handlers::dashboard))
        .route("/v1/performance", get(handlers::team_performance))
        .route(
            "/v1/performance/{user_id}",
            get(handlers::agent_performance),
        )
        .route("/v1/capabilities", get(handlers::capabilities))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind `host:port` and serve until `shutdown` resolves.
pub async fn start_server(
    config: &GatewayConfig,
    state: GatewayState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), DialdeskError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| DialdeskError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| DialdeskError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
