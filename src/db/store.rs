use serde_json::Value;

use crate::error::AppResult;

/// Minimal document store the service runs against.
///
/// Documents are JSON values grouped into named collections. This is the only
/// persistence surface the handlers, resolver, and history recorder see; the
/// backing technology is an implementation detail.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Fetch one document by id
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>>;

    /// Insert or replace one document under a caller-chosen id
    async fn put(&self, collection: &str, id: &str, value: Value) -> AppResult<()>;

    /// Remove one document; returns whether it existed
    async fn delete(&self, collection: &str, id: &str) -> AppResult<bool>;

    /// Append a document with a generated id, returning that id
    async fn add(&self, collection: &str, value: Value) -> AppResult<String>;

    /// All documents whose top-level `field` equals `value`, with their ids
    async fn filter_equals(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> AppResult<Vec<(String, Value)>>;

    /// Every document in the collection, with ids, insertion order
    async fn list(&self, collection: &str) -> AppResult<Vec<(String, Value)>>;
}
