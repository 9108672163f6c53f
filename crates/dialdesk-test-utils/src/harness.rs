// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness wiring the store, services, and aggregation together.
//!
//! `TestHarness` builds a fresh in-memory entity store behind a manual
//! clock, registers a bootstrap admin, and exposes helpers that seed team
//! members, clients, and calls through the real mutation service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use dialdesk_config::DialdeskConfig;
use dialdesk_core::{Actor, Call, CallStatus, Client, DialdeskError, Role};
use dialdesk_insights::Insights;
use dialdesk_service::{MutationService, QueryService, Registration};
use dialdesk_store::EntityStore;

use crate::clock::ManualClock;
use crate::fixtures;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    now: Option<DateTime<Utc>>,
    timezone: Tz,
    config: DialdeskConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            now: None,
            timezone: chrono_tz::UTC,
            config: DialdeskConfig::default(),
        }
    }

    /// Start the manual clock at `now` instead of 2026-03-02 12:00 UTC.
    pub fn with_clock_at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Reference timezone for "calls today".
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = tz;
        self
    }

    pub fn with_config(mut self, config: DialdeskConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the harness. Registers the bootstrap admin "Admin User".
    pub fn build(self) -> Result<TestHarness, DialdeskError> {
        let clock = Arc::new(match self.now {
            Some(now) => ManualClock::new(now),
            None => ManualClock::at(2026, 3, 2, 12),
        });
        let store = Arc::new(EntityStore::new());

        let mutations = MutationService::new(store.clone(), clock.clone(), &self.config.limits);
        let queries = QueryService::new(store.clone(), &self.config.listing);
        let insights = Insights::new(store.clone(), clock.clone(), self.timezone);

        let admin = mutations.register(Registration {
            name: "Admin User".to_string(),
            email: "admin@dialdesk.test".to_string(),
        })?;

        Ok(TestHarness {
            store,
            clock,
            mutations: Arc::new(mutations),
            queries: Arc::new(queries),
            insights: Arc::new(insights),
            config: self.config,
            admin: Actor::new(admin.id, admin.role),
        })
    }
}

/// A complete in-memory environment for exercising the services.
pub struct TestHarness {
    pub store: Arc<EntityStore>,
    pub clock: Arc<ManualClock>,
    pub mutations: Arc<MutationService>,
    pub queries: Arc<QueryService>,
    pub insights: Arc<Insights>,
    pub config: DialdeskConfig,
    /// The first registered user, an admin.
    pub admin: Actor,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Create a team member as the admin and return them as an actor.
    pub fn add_member(&self, name: &str, role: Role) -> Result<Actor, DialdeskError> {
        let user = self
            .mutations
            .create_team_member(&self.admin, fixtures::new_member(name, role))?;
        Ok(Actor::new(user.id, user.role))
    }

    /// Create a pending, unassigned client as the admin.
    pub fn add_client(&self, name: &str) -> Result<Client, DialdeskError> {
        self.mutations
            .create_client(&self.admin, fixtures::new_client(name))
    }

    /// Record a call as the admin on behalf of `agent_id`.
    pub fn add_call(
        &self,
        client_id: &str,
        agent_id: &str,
        status: CallStatus,
        duration: u32,
    ) -> Result<Call, DialdeskError> {
        self.mutations.record_call(
            &self.admin,
            fixtures::new_call(client_id, agent_id, status, duration),
        )
    }
}
