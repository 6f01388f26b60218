// Mock collaborators for tests
//
// The row store, extraction service, and grants directory are external
// systems; these in-memory stand-ins implement the same traits so the full
// router can be exercised without the network.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};

use super::extraction_client::{ExtractionError, ProjectDraft, ProjectExtractor};
use super::grants_client::{GrantsDirectory, GrantsError};
use super::store::{Store, StoreError, StoreResult};

// =============================================================================
// In-memory row store
// =============================================================================

/// In-memory store implementing the generic `execute` contract, including
/// the `eq.` / `in.(...)` filter dialect. Supports failure injection per
/// resource and records every executed operation for assertions.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    fail_inserts: Mutex<HashSet<String>>,
    operations: Mutex<Vec<(String, String)>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Pre-load rows into a table.
    pub fn seed(&self, resource: &str, rows: Vec<Value>) {
        self.tables
            .lock()
            .unwrap()
            .entry(resource.to_string())
            .or_default()
            .extend(rows);
    }

    /// Make every insert into `resource` fail with a 500 until cleared.
    pub fn fail_inserts_into(&self, resource: &str) {
        self.fail_inserts
            .lock()
            .unwrap()
            .insert(resource.to_string());
    }

    /// All rows currently in a table.
    pub fn rows(&self, resource: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(resource)
            .cloned()
            .unwrap_or_default()
    }

    /// `(method, resource)` pairs in execution order.
    pub fn operations(&self) -> Vec<(String, String)> {
        self.operations.lock().unwrap().clone()
    }

    fn matches(row: &Value, filters: &[(String, String)]) -> bool {
        filters.iter().all(|(column, condition)| {
            // select/limit are projections, not row predicates
            if column == "select" || column == "limit" {
                return true;
            }

            let field = row.get(column).cloned().unwrap_or(Value::Null);
            let field = match field {
                Value::String(s) => s,
                Value::Null => return false,
                other => other.to_string(),
            };

            if let Some(value) = condition.strip_prefix("eq.") {
                field == value
            } else if let Some(list) = condition
                .strip_prefix("in.(")
                .and_then(|rest| rest.strip_suffix(')'))
            {
                list.split(',').any(|candidate| candidate.trim() == field)
            } else {
                false
            }
        })
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn execute(
        &self,
        method: Method,
        resource: &str,
        body: Option<Value>,
        filters: &[(String, String)],
    ) -> StoreResult<Vec<Value>> {
        self.operations
            .lock()
            .unwrap()
            .push((method.to_string(), resource.to_string()));

        let mut tables = self.tables.lock().unwrap();

        match method.as_str() {
            "GET" => {
                let rows = tables.get(resource).cloned().unwrap_or_default();
                Ok(rows
                    .into_iter()
                    .filter(|row| Self::matches(row, filters))
                    .collect())
            }
            "POST" => {
                if self.fail_inserts.lock().unwrap().contains(resource) {
                    return Err(StoreError::Upstream {
                        status: 500,
                        body: format!("injected insert failure for {resource}"),
                    });
                }

                let mut row = body.unwrap_or_else(|| json!({}));
                let object = row
                    .as_object_mut()
                    .expect("insert body must be a JSON object");
                if !object.contains_key("id") {
                    object.insert("id".into(), json!(uuid::Uuid::new_v4().to_string()));
                }
                if !object.contains_key("created_at") {
                    object.insert("created_at".into(), json!(chrono::Utc::now().to_rfc3339()));
                }

                tables
                    .entry(resource.to_string())
                    .or_default()
                    .push(row.clone());
                Ok(vec![row])
            }
            "PATCH" => {
                let patch = body.unwrap_or_else(|| json!({}));
                let patch = patch
                    .as_object()
                    .expect("update body must be a JSON object");

                let mut updated = Vec::new();
                if let Some(rows) = tables.get_mut(resource) {
                    for row in rows.iter_mut().filter(|row| Self::matches(row, filters)) {
                        let object = row.as_object_mut().expect("stored rows are objects");
                        for (key, value) in patch {
                            // explicit nulls clear the column, they do not remove it
                            object.insert(key.clone(), value.clone());
                        }
                        updated.push(row.clone());
                    }
                }
                Ok(updated)
            }
            "DELETE" => {
                let mut removed = Vec::new();
                if let Some(rows) = tables.get_mut(resource) {
                    rows.retain(|row| {
                        if Self::matches(row, filters) {
                            removed.push(row.clone());
                            false
                        } else {
                            true
                        }
                    });
                }
                Ok(removed)
            }
            other => Err(StoreError::Upstream {
                status: 405,
                body: format!("unsupported method {other}"),
            }),
        }
    }
}

// =============================================================================
// Mock extractor
// =============================================================================

pub struct MockExtractor {
    draft: Option<ProjectDraft>,
    calls: Mutex<Vec<String>>,
}

impl MockExtractor {
    /// Extractor that always returns the given draft.
    pub fn returning(draft: ProjectDraft) -> Arc<Self> {
        Arc::new(Self {
            draft: Some(draft),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Extractor that always fails upstream.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            draft: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProjectExtractor for MockExtractor {
    async fn extract(&self, free_text: &str) -> Result<ProjectDraft, ExtractionError> {
        self.calls.lock().unwrap().push(free_text.to_string());

        match &self.draft {
            Some(draft) => {
                let mut draft = draft.clone();
                if draft.description.is_none() {
                    draft.description = Some(free_text.to_string());
                }
                Ok(draft)
            }
            None => Err(ExtractionError::Upstream {
                status: 500,
                detail: "mock extraction failure".into(),
            }),
        }
    }
}

// =============================================================================
// Mock grants directory
// =============================================================================

#[derive(Default)]
pub struct MockGrantsDirectory {
    pub search_response: Option<Value>,
    search_calls: Mutex<Vec<Vec<(String, String)>>>,
}

impl MockGrantsDirectory {
    pub fn with_search_response(response: Value) -> Arc<Self> {
        Arc::new(Self {
            search_response: Some(response),
            search_calls: Mutex::new(Vec::new()),
        })
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Translated parameter lists received by `search_aids`.
    pub fn search_calls(&self) -> Vec<Vec<(String, String)>> {
        self.search_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GrantsDirectory for MockGrantsDirectory {
    async fn token(&self) -> Result<Value, GrantsError> {
        Ok(json!({"token": "mock-directory-token"}))
    }

    async fn search_aids(&self, params: &[(String, String)]) -> Result<Value, GrantsError> {
        self.search_calls.lock().unwrap().push(params.to_vec());

        match &self.search_response {
            Some(response) => Ok(response.clone()),
            None => Ok(json!({"count": 0, "results": []})),
        }
    }

    async fn backer(&self, id: &str) -> Result<Value, GrantsError> {
        Ok(json!({"id": id, "name": "Mock backer"}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::store::{any_of, eq};

    #[tokio::test]
    async fn eq_filter_selects_matching_rows() {
        let store = MemoryStore::new();
        store.seed(
            "users",
            vec![
                json!({"id": "1", "email": "a@b.com"}),
                json!({"id": "2", "email": "c@d.com"}),
            ],
        );

        let rows = store
            .select("users", &[eq("email", "a@b.com")])
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "1");
    }

    #[tokio::test]
    async fn in_filter_selects_any_listed_id() {
        let store = MemoryStore::new();
        store.seed(
            "organisations",
            vec![
                json!({"id": "a", "name": "A"}),
                json!({"id": "b", "name": "B"}),
                json!({"id": "c", "name": "C"}),
            ],
        );

        let rows = store
            .select(
                "organisations",
                &[any_of("id", &["a".to_string(), "c".to_string()])],
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn insert_assigns_id_and_created_at() {
        let store = MemoryStore::new();
        let rows = store
            .insert("projects", json!({"title": "T"}))
            .await
            .unwrap();
        assert!(rows[0]["id"].is_string());
        assert!(rows[0]["created_at"].is_string());
    }

    #[tokio::test]
    async fn patch_with_null_clears_column() {
        let store = MemoryStore::new();
        store.seed("users", vec![json!({"id": "1", "reset_code": "123456"})]);

        store
            .update(
                "users",
                json!({"reset_code": Value::Null}),
                &[eq("id", "1")],
            )
            .await
            .unwrap();

        let rows = store.rows("users");
        assert_eq!(rows[0]["reset_code"], Value::Null);
    }

    #[tokio::test]
    async fn delete_removes_matching_rows() {
        let store = MemoryStore::new();
        store.seed(
            "users",
            vec![json!({"id": "1"}), json!({"id": "2"})],
        );

        store.delete("users", &[eq("id", "1")]).await.unwrap();
        assert_eq!(store.rows("users").len(), 1);
    }
}
