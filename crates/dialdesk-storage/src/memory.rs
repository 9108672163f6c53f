// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-local [`DocumentStore`] with the same semantics as the SQLite one.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use dialdesk_core::traits::merge_top_level;
use dialdesk_core::{DialdeskError, Document, DocumentStore, HealthStatus};

/// Documents held in memory, per collection in creation order.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total documents across all collections.
    pub fn len(&self) -> usize {
        self.collections.lock().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn create(&self, collection: &str, id: &str, body: Value) -> Result<(), DialdeskError> {
        let mut collections = self.collections.lock();
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.iter().any(|d| d.id == id) {
            return Err(DialdeskError::conflict(format!(
                "document `{collection}/{id}` already exists"
            )));
        }
        docs.push(Document {
            id: id.to_string(),
            body,
        });
        Ok(())
    }

    async fn read(&self, collection: &str, id: &str) -> Result<Option<Value>, DialdeskError> {
        Ok(self.collections.lock().get(collection).and_then(|docs| {
            docs.iter()
                .find(|d| d.id == id)
                .map(|d| d.body.clone())
        }))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, DialdeskError> {
        Ok(self
            .collections
            .lock()
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), DialdeskError> {
        let mut collections = self.collections.lock();
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|d| d.id == id) {
            Some(doc) => merge_top_level(&mut doc.body, patch),
            None => docs.push(Document {
                id: id.to_string(),
                body: patch,
            }),
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), DialdeskError> {
        if let Some(docs) = self.collections.lock().get_mut(collection) {
            docs.retain(|d| d.id != id);
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<HealthStatus, DialdeskError> {
        Ok(HealthStatus::Healthy)
    }

    async fn close(&self) -> Result<(), DialdeskError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn behaves_like_a_document_store() {
        let store = MemoryDocumentStore::new();
        store
            .create("clients", "c1", json!({"name": "Wayne Corp", "status": "pending"}))
            .await
            .unwrap();
        store.create("clients", "c2", json!({})).await.unwrap();
        assert!(store.create("clients", "c1", json!({})).await.is_err());

        store
            .update("clients", "c1", json!({"status": "active"}))
            .await
            .unwrap();
        assert_eq!(
            store.read("clients", "c1").await.unwrap(),
            Some(json!({"name": "Wayne Corp", "status": "active"}))
        );

        store.delete("clients", "c1").await.unwrap();
        store.delete("clients", "c1").await.unwrap();
        let ids: Vec<String> = store
            .list("clients")
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, ["c2"]);
        assert_eq!(store.len(), 1);
    }
}
