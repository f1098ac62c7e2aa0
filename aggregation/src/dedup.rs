use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, info};

use docstore::DocumentStore;

use crate::Result;

/// Tracks which record identifiers have already been scored.
///
/// The marker-id set is materialized eagerly once at pipeline start,
/// not refreshed mid-scan. A record marked by an external writer after
/// the snapshot may be reprocessed; that duplicate write is harmless
/// because output and marker writes are both upserts keyed by the
/// record identifier.
pub struct BatchDeduplicator {
    analyzed: HashSet<String>,
}

impl BatchDeduplicator {
    /// Snapshot the full set of marker identifiers from the analysis
    /// log collection.
    pub async fn load(store: &dyn DocumentStore, log_collection: &str) -> Result<Self> {
        let mut analyzed = HashSet::new();
        for document in store.find(log_collection).await? {
            match document.get("document_id").and_then(Value::as_str) {
                Some(id) => {
                    analyzed.insert(id.to_string());
                }
                None => debug!("Marker without document_id ignored"),
            }
        }

        info!("Loaded {} analyzed record markers", analyzed.len());
        Ok(Self { analyzed })
    }

    pub fn already_processed(&self, document_id: &str) -> bool {
        self.analyzed.contains(document_id)
    }

    /// Record an id scored during this run, so a source that yields the
    /// same record twice does not score it twice.
    pub fn mark(&mut self, document_id: &str) {
        self.analyzed.insert(document_id.to_string());
    }

    pub fn len(&self) -> usize {
        self.analyzed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzed.is_empty()
    }
}
