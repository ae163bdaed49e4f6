//! Fire-and-forget search history writes.
//!
//! The write runs on a detached task so a slow or broken store never delays
//! the recommendation response. Failures are logged and dropped.

use std::sync::Arc;

use crate::{db::Store, models::HistoryEntry};

pub const HISTORY_COLLECTION: &str = "search_history";

#[derive(Clone)]
pub struct HistoryRecorder {
    store: Arc<dyn Store>,
}

impl HistoryRecorder {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Queue one history append; returns immediately
    pub fn record(&self, mood: &str, result_count: usize, requester: Option<&str>) {
        let entry = HistoryEntry::new(
            mood.to_string(),
            result_count,
            requester.map(str::to_string),
        );
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            Self::write(store, entry).await;
        });
    }

    async fn write(store: Arc<dyn Store>, entry: HistoryEntry) {
        let mood = entry.mood.clone();
        let value = match serde_json::to_value(&entry) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "History entry serialization failed");
                return;
            }
        };

        match store.add(HISTORY_COLLECTION, value).await {
            Ok(_) => tracing::debug!(mood = %mood, "Search history recorded"),
            Err(e) => tracing::error!(error = %e, mood = %mood, "Search history write failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn test_write_appends_entry() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let entry = HistoryEntry::new("cozy".to_string(), 3, Some("a@b.c".to_string()));

        HistoryRecorder::write(Arc::clone(&store), entry).await;

        let entries = store.list(HISTORY_COLLECTION).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].1["mood"], "cozy");
        assert_eq!(entries[0].1["result_count"], 3);
        assert_eq!(entries[0].1["email"], "a@b.c");
        assert!(entries[0].1["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_record_does_not_block_and_eventually_lands() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let recorder = HistoryRecorder::new(Arc::clone(&store));

        recorder.record("tense", 5, None);

        // The spawned write needs the runtime to schedule it
        for _ in 0..50 {
            if !store.list(HISTORY_COLLECTION).await.unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let entries = store.list(HISTORY_COLLECTION).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].1["mood"], "tense");
        assert!(entries[0].1.get("email").is_none());
    }
}
