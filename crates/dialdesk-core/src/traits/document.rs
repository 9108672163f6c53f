// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence collaborator trait for document databases.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DialdeskError;
use crate::types::HealthStatus;

/// A stored document: its key plus the JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub body: Value,
}

/// Create/read/update/delete per collection, keyed by string identifier.
///
/// `update` has replace-with-merge semantics: top-level keys present in the
/// patch overwrite, keys absent from the patch are preserved, and a missing
/// document is created from the patch. `list` returns documents in the order
/// they were first created.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Human-readable name of this backend.
    fn name(&self) -> &str;

    /// Insert a new document. Fails with `Conflict` when the id is taken.
    async fn create(&self, collection: &str, id: &str, body: Value) -> Result<(), DialdeskError>;

    async fn read(&self, collection: &str, id: &str) -> Result<Option<Value>, DialdeskError>;

    async fn list(&self, collection: &str) -> Result<Vec<Document>, DialdeskError>;

    /// Merge `patch` into the stored document at the top level.
    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), DialdeskError>;

    /// Delete a document. Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), DialdeskError>;

    async fn health_check(&self) -> Result<HealthStatus, DialdeskError>;

    /// Flush pending writes and release resources.
    async fn close(&self) -> Result<(), DialdeskError>;
}

/// Merge `patch` into `base` one level deep.
///
/// Non-object values replace `base` wholesale.
pub fn merge_top_level(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                base.insert(key, value);
            }
        }
        (base, patch) => *base = patch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn merge_preserves_unspecified_fields() {
        let mut base = json!({"name": "Acme", "status": "pending", "company": "Acme Corp"});
        merge_top_level(&mut base, json!({"status": "active"}));
        assert_eq!(
            base,
            json!({"name": "Acme", "status": "active", "company": "Acme Corp"})
        );
    }

    #[test]
    fn merge_does_not_recurse_into_nested_objects() {
        let mut base = json!({"meta": {"a": 1, "b": 2}});
        merge_top_level(&mut base, json!({"meta": {"a": 3}}));
        assert_eq!(base, json!({"meta": {"a": 3}}));
    }

    #[test]
    fn merge_non_object_replaces() {
        let mut base = json!({"a": 1});
        merge_top_level(&mut base, json!([1, 2]));
        assert_eq!(base, json!([1, 2]));
    }

    proptest! {
        #[test]
        fn merged_document_holds_every_patch_key(
            base in prop::collection::btree_map("[a-e]", 0i64..10, 0..5),
            patch in prop::collection::btree_map("[a-e]", 0i64..10, 0..5),
        ) {
            let mut merged = serde_json::to_value(&base).unwrap();
            merge_top_level(&mut merged, serde_json::to_value(&patch).unwrap());
            let merged = merged.as_object().unwrap();
            for (k, v) in &patch {
                prop_assert_eq!(merged.get(k), Some(&json!(v)));
            }
            for (k, v) in &base {
                if !patch.contains_key(k) {
                    prop_assert_eq!(merged.get(k), Some(&json!(v)));
                }
            }
        }
    }
}
