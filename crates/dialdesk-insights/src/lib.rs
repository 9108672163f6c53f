// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregation service for Dialdesk.
//!
//! Derives dashboard statistics and per-agent performance from a consistent
//! snapshot of the entity store. Nothing is cached: every call recomputes
//! from the current collections under the store's read lock.

pub mod performance;
pub mod stats;

use std::sync::Arc;

use chrono_tz::Tz;
use dialdesk_core::{Clock, DialdeskError, User};
use dialdesk_store::EntityStore;

pub use performance::{AgentPerformance, agent_performance, team_performance};
pub use stats::{DashboardStats, dashboard_stats};

/// Read-only aggregation over the entity store.
pub struct Insights {
    store: Arc<EntityStore>,
    clock: Arc<dyn Clock>,
    tz: Tz,
}

impl Insights {
    /// `tz` decides which calendar day counts as "today".
    pub fn new(store: Arc<EntityStore>, clock: Arc<dyn Clock>, tz: Tz) -> Self {
        Self { store, clock, tz }
    }

    pub fn dashboard_stats(&self) -> DashboardStats {
        let now = self.clock.now();
        let stats = self.store.read(|c| dashboard_stats(c, now, self.tz));
        tracing::debug!(
            total_clients = stats.total_clients,
            total_calls = stats.total_calls,
            "dashboard stats computed"
        );
        stats
    }

    /// Performance of any team member. Unknown ids are a `Validation` error.
    pub fn agent_performance(&self, user_id: &str) -> Result<AgentPerformance, DialdeskError> {
        self.store.read(|c| {
            let user = c.get::<User>(user_id).ok_or_else(|| {
                DialdeskError::validation("user_id", format!("no user with id `{user_id}`"))
            })?;
            Ok(agent_performance(c, user))
        })
    }

    pub fn team_performance(&self) -> Vec<AgentPerformance> {
        self.store.read(team_performance)
    }
}
