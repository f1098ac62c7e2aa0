use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Operations the pipeline consumes from its persistence backend.
///
/// Documents, filters and updates are JSON objects. Filters match on
/// field equality. Updates understand `$inc` and `$set` operator keys;
/// a bare top-level key is treated as a plain field set. `upsert`
/// always creates the document when the filter matches nothing
/// (create-if-missing is not optional in this pipeline).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Update the first document matching `filter`, creating it from the
    /// filter's equality fields when absent.
    async fn upsert(&self, collection: &str, filter: Value, update: Value) -> Result<()>;

    /// Append one document to the collection.
    async fn insert(&self, collection: &str, document: Value) -> Result<()>;

    /// Return every document in the collection in insertion order.
    async fn find(&self, collection: &str) -> Result<Vec<Value>>;

    /// Count documents matching `filter` (empty filter counts all).
    async fn count(&self, collection: &str, filter: Value) -> Result<u64>;
}
