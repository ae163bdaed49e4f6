use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::Store;
use crate::error::AppResult;

/// In-memory document store.
///
/// Collections are insertion-ordered vectors of (id, document) pairs guarded by
/// an RwLock. Good enough for tests and single-node deployments; anything
/// durable implements `Store` the same way.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<(String, Value)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|docs| {
            docs.iter()
                .find(|(doc_id, _)| doc_id == id)
                .map(|(_, doc)| doc.clone())
        }))
    }

    async fn put(&self, collection: &str, id: &str, value: Value) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|(doc_id, _)| doc_id == id) {
            Some((_, doc)) => *doc = value,
            None => docs.push((id.to_string(), value)),
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|(doc_id, _)| doc_id != id);
        Ok(docs.len() < before)
    }

    async fn add(&self, collection: &str, value: Value) -> AppResult<String> {
        let id = Uuid::new_v4().to_string();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push((id.clone(), value));
        Ok(id)
    }

    async fn filter_equals(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> AppResult<Vec<(String, Value)>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, doc)| doc.get(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list(&self, collection: &str) -> AppResult<Vec<(String, Value)>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }
}
