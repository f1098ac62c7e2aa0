use std::collections::VecDeque;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use docstore::DocumentStore;

/// Batch-at-a-time record delivery. `None` signals end of stream.
#[async_trait]
pub trait RecordSource: Send {
    async fn next_batch(&mut self) -> Result<Option<Vec<Value>>>;
}

/// Source backed by a store collection scan.
///
/// The scan and the total count are both captured once at construction;
/// nothing is re-counted per fetch.
pub struct StoreRecordSource {
    pending: VecDeque<Value>,
    fetch_size: usize,
}

impl StoreRecordSource {
    pub async fn load(
        store: &dyn DocumentStore,
        collection: &str,
        fetch_size: usize,
    ) -> Result<Self> {
        let total = store.count(collection, json!({})).await?;
        let documents = store.find(collection).await?;
        info!("Scanning {} records from '{}'", total, collection);

        Ok(Self {
            pending: documents.into(),
            fetch_size,
        })
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

#[async_trait]
impl RecordSource for StoreRecordSource {
    async fn next_batch(&mut self) -> Result<Option<Vec<Value>>> {
        if self.pending.is_empty() {
            return Ok(None);
        }

        let n = self.fetch_size.min(self.pending.len());
        Ok(Some(self.pending.drain(..n).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docstore::MemoryStore;

    #[tokio::test]
    async fn test_fetches_in_stable_order_then_exhausts() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .insert("posts", json!({"id": format!("r{i}"), "raw_text": "x"}))
                .await
                .unwrap();
        }

        let mut source = StoreRecordSource::load(&store, "posts", 2).await.unwrap();
        assert_eq!(source.remaining(), 5);

        let mut seen = Vec::new();
        while let Some(batch) = source.next_batch().await.unwrap() {
            for doc in batch {
                seen.push(doc["id"].as_str().unwrap().to_string());
            }
        }

        assert_eq!(seen, vec!["r0", "r1", "r2", "r3", "r4"]);
        assert!(source.next_batch().await.unwrap().is_none());
    }
}
