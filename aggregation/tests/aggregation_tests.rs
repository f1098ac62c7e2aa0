use std::collections::HashSet;

use async_trait::async_trait;
use serde_json::{json, Value};

use aggregation::{merge_entity_scores, BatchDeduplicator, WordFrequencyAggregator};
use docstore::{DocumentStore, MemoryStore, StoreError};
use inference::LabelDistribution;

/// Store wrapper that fails every insert for one word, to exercise
/// per-token failure isolation.
struct FlakyStore {
    inner: MemoryStore,
    poison_word: String,
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn upsert(
        &self,
        collection: &str,
        filter: Value,
        update: Value,
    ) -> docstore::Result<()> {
        self.inner.upsert(collection, filter, update).await
    }

    async fn insert(&self, collection: &str, document: Value) -> docstore::Result<()> {
        if document.get("word") == Some(&Value::String(self.poison_word.clone())) {
            return Err(StoreError::write_failed("simulated write failure"));
        }
        self.inner.insert(collection, document).await
    }

    async fn find(&self, collection: &str) -> docstore::Result<Vec<Value>> {
        self.inner.find(collection).await
    }

    async fn count(&self, collection: &str, filter: Value) -> docstore::Result<u64> {
        self.inner.count(collection, filter).await
    }
}

#[tokio::test]
async fn test_word_frequency_end_to_end() {
    let store = MemoryStore::new();
    let aggregator = WordFrequencyAggregator::new(&store, "freq", "series");

    aggregator
        .apply_batch("Cat cat dog! dog dog", 100.0)
        .await
        .unwrap();

    let freq = store.find("freq").await.unwrap();
    let cat = freq.iter().find(|d| d["word"] == "cat").unwrap();
    let dog = freq.iter().find(|d| d["word"] == "dog").unwrap();
    assert_eq!(cat["count"], json!(2));
    assert_eq!(dog["count"], json!(3));
}

#[tokio::test]
async fn test_failed_append_does_not_abort_batch() {
    let store = FlakyStore {
        inner: MemoryStore::new(),
        poison_word: "dog".to_string(),
    };
    let aggregator = WordFrequencyAggregator::new(&store, "freq", "series");

    // The batch as a whole still succeeds.
    aggregator.apply_batch("cat dog", 1.0).await.unwrap();

    // Both cumulative entries exist; only the healthy word reached the
    // time series.
    let freq = store.find("freq").await.unwrap();
    assert_eq!(freq.len(), 2);

    let series = store.find("series").await.unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0]["word"], json!("cat"));
}

#[tokio::test]
async fn test_dedup_and_merge_together() {
    let store = MemoryStore::new();
    store
        .insert("log", json!({"document_id": "seen", "sentiment": {}}))
        .await
        .unwrap();

    let dedup = BatchDeduplicator::load(&store, "log").await.unwrap();
    assert!(dedup.already_processed("seen"));
    assert!(!dedup.already_processed("fresh"));

    let entities: Vec<HashSet<String>> = vec![
        ["Acme Corp".to_string()].into_iter().collect(),
        ["Acme Corp".to_string(), "Globex".to_string()]
            .into_iter()
            .collect(),
    ];
    let scores = vec![
        LabelDistribution::new(0.8, 0.1, 0.1),
        LabelDistribution::new(0.2, 0.7, 0.1),
    ];

    let merged = merge_entity_scores(&entities, &scores).unwrap();
    assert!((merged["Acme Corp"].positive - 0.5).abs() < 1e-9);
    assert!((merged["Globex"].negative - 0.7).abs() < 1e-9);
}
