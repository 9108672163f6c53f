// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `dialdesk serve` command implementation.
//!
//! Hydrates the entity store, starts the HTTP gateway, and writes the store
//! back to the document store on a fixed interval and once more on shutdown.

use std::sync::Arc;
use std::time::Duration;

use dialdesk_config::DialdeskConfig;
use dialdesk_core::DialdeskError;
use dialdesk_gateway::{AuthConfig, GatewayState, HealthState, MetricsRender, start_server};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::runtime::Runtime;
use crate::shutdown;

pub async fn run_serve(config: DialdeskConfig) -> Result<(), DialdeskError> {
    info!(name = config.app.name.as_str(), "starting dialdesk serve");

    let runtime = Arc::new(Runtime::open(&config).await?);

    let prometheus_render = if config.prometheus.enabled {
        let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
            DialdeskError::Internal(format!("failed to install Prometheus recorder: {e}"))
        })?;
        dialdesk_service::metrics::register_metrics();
        info!("prometheus metrics enabled");
        let render: MetricsRender = Arc::new(move || handle.render());
        Some(render)
    } else {
        None
    };

    if config.gateway.bearer_token.is_none() {
        warn!("gateway.bearer_token is not set, every /v1 request will be rejected");
    }

    let state = GatewayState {
        mutations: runtime.mutations.clone(),
        queries: runtime.queries.clone(),
        insights: runtime.insights.clone(),
        auth: AuthConfig {
            bearer_token: config.gateway.bearer_token.clone(),
        },
        health: HealthState {
            start_time: std::time::Instant::now(),
            documents: runtime.documents.clone(),
            prometheus_render,
        },
    };

    let cancel = shutdown::install_signal_handler();

    let snapshot_task = match (
        runtime.documents.is_some(),
        config.storage.snapshot_interval_secs,
    ) {
        (true, secs) if secs > 0 => {
            info!(interval_secs = secs, "periodic persistence enabled");
            Some(tokio::spawn(persist_periodically(
                runtime.clone(),
                Duration::from_secs(secs),
                cancel.clone(),
            )))
        }
        _ => None,
    };

    let server_cancel = cancel.clone();
    let served = start_server(&config.gateway, state, async move {
        server_cancel.cancelled().await;
    })
    .await;

    // The server may also stop on a bind error; stop the snapshot task either way.
    cancel.cancel();
    if let Some(task) = snapshot_task {
        if let Err(e) = task.await {
            warn!(error = %e, "snapshot task ended abnormally");
        }
    }

    let closed = runtime.close().await;
    served?;
    closed?;

    info!("dialdesk serve shutdown complete");
    Ok(())
}

async fn persist_periodically(runtime: Arc<Runtime>, every: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick fires immediately; the store was just hydrated.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match runtime.persist().await {
                    Ok(Some(report)) => debug!(
                        written = report.written,
                        unchanged = report.unchanged,
                        deleted = report.deleted,
                        "store persisted"
                    ),
                    Ok(None) => {}
                    Err(e) => error!(error = %e, "periodic persist failed"),
                }
            }
            _ = cancel.cancelled() => {
                debug!("snapshot task shutting down");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialdesk_core::{DocumentStore, Role, User};
    use dialdesk_service::Registration;

    #[tokio::test]
    async fn periodic_persist_stops_on_cancel() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DialdeskConfig::default();
        config.storage.database_path = dir
            .path()
            .join("dialdesk.db")
            .to_string_lossy()
            .into_owned();

        let runtime = Arc::new(Runtime::open(&config).await.unwrap());
        let admin = runtime
            .mutations
            .register(Registration {
                name: "Admin User".to_string(),
                email: "admin@dialdesk.test".to_string(),
            })
            .unwrap();
        assert_eq!(admin.role, Role::Admin);

        let cancel = CancellationToken::new();
        let task = tokio::spawn(persist_periodically(
            runtime.clone(),
            Duration::from_millis(10),
            cancel.clone(),
        ));
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
        task.await.unwrap();

        let documents = runtime.documents.clone().unwrap();
        let stored = documents.list("users").await.unwrap();
        assert_eq!(stored.len(), 1);
        runtime.close().await.unwrap();

        let reopened = Runtime::open(&config).await.unwrap();
        assert_eq!(reopened.store.list::<User>().len(), 1);
    }
}
