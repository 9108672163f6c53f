// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring shared by every subcommand: open persistence, hydrate the entity
//! store, and build the services over it.

use std::sync::Arc;

use dialdesk_config::DialdeskConfig;
use dialdesk_core::{Clock, DialdeskError, DocumentStore, SystemClock};
use dialdesk_insights::Insights;
use dialdesk_service::{MutationService, QueryService};
use dialdesk_storage::{PersistReport, SqliteDocumentStore, hydrate, persist};
use dialdesk_store::EntityStore;
use tracing::info;

pub struct Runtime {
    pub store: Arc<EntityStore>,
    /// `None` when storage is disabled; the store then lives only in memory.
    pub documents: Option<Arc<dyn DocumentStore>>,
    pub mutations: Arc<MutationService>,
    pub queries: Arc<QueryService>,
    pub insights: Arc<Insights>,
}

impl Runtime {
    pub async fn open(config: &DialdeskConfig) -> Result<Self, DialdeskError> {
        let tz = config.app.tz().ok_or_else(|| {
            DialdeskError::Config(format!("unknown timezone `{}`", config.app.timezone))
        })?;

        let documents: Option<Arc<dyn DocumentStore>> = if config.storage.enabled {
            let sqlite = SqliteDocumentStore::open(&config.storage).await?;
            info!(path = sqlite.path(), "document store opened");
            Some(Arc::new(sqlite))
        } else {
            info!("storage disabled by configuration, running in memory");
            None
        };

        let store = match &documents {
            Some(documents) => hydrate(documents.as_ref()).await?,
            None => EntityStore::new(),
        };
        let store = Arc::new(store);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        Ok(Self {
            mutations: Arc::new(MutationService::new(
                store.clone(),
                clock.clone(),
                &config.limits,
            )),
            queries: Arc::new(QueryService::new(store.clone(), &config.listing)),
            insights: Arc::new(Insights::new(store.clone(), clock, tz)),
            store,
            documents,
        })
    }

    /// Write the store back to the document store, if there is one.
    pub async fn persist(&self) -> Result<Option<PersistReport>, DialdeskError> {
        match &self.documents {
            Some(documents) => persist(&self.store, documents.as_ref()).await.map(Some),
            None => Ok(None),
        }
    }

    /// Final persist, then release the document store.
    pub async fn close(&self) -> Result<(), DialdeskError> {
        self.persist().await?;
        if let Some(documents) = &self.documents {
            documents.close().await?;
        }
        Ok(())
    }
}
