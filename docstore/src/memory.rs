use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::store::DocumentStore;

/// In-memory document store.
///
/// Collections are vectors of JSON objects in insertion order, which
/// gives the scan the stable iteration order the driver relies on.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn into_object(value: Value, what: &str) -> Result<Map<String, Value>> {
        match value {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::invalid_update(format!(
                "{} must be a JSON object, got: {}",
                what, other
            ))),
        }
    }

    fn matches(document: &Value, filter: &Map<String, Value>) -> bool {
        filter
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }

    fn apply_update(document: &mut Map<String, Value>, update: &Map<String, Value>) -> Result<()> {
        for (key, value) in update {
            match key.as_str() {
                "$set" => {
                    let fields = value.as_object().ok_or_else(|| {
                        StoreError::invalid_update("$set requires an object of fields")
                    })?;
                    for (field, new_value) in fields {
                        document.insert(field.clone(), new_value.clone());
                    }
                }
                "$inc" => {
                    let fields = value.as_object().ok_or_else(|| {
                        StoreError::invalid_update("$inc requires an object of fields")
                    })?;
                    for (field, delta) in fields {
                        increment_field(document, field, delta)?;
                    }
                }
                other if other.starts_with('$') => {
                    return Err(StoreError::invalid_update(format!(
                        "Unsupported update operator: {}",
                        other
                    )));
                }
                _ => {
                    document.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(())
    }
}

// Integer fields stay integers as long as both sides are integral.
fn increment_field(document: &mut Map<String, Value>, field: &str, delta: &Value) -> Result<()> {
    let delta_float = delta.as_f64().ok_or_else(|| {
        StoreError::invalid_update(format!("$inc delta for '{}' is not numeric", field))
    })?;

    let next = match document.get(field) {
        None => delta.clone(),
        Some(current) => match (current.as_i64(), delta.as_i64()) {
            (Some(base), Some(step)) => Value::from(base + step),
            _ => {
                let base = current.as_f64().ok_or_else(|| {
                    StoreError::invalid_update(format!(
                        "$inc target '{}' is not numeric",
                        field
                    ))
                })?;
                Value::from(base + delta_float)
            }
        },
    };

    document.insert(field.to_string(), next);
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn upsert(&self, collection: &str, filter: Value, update: Value) -> Result<()> {
        let filter = Self::into_object(filter, "Filter")?;
        let update = Self::into_object(update, "Update")?;

        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        if let Some(existing) = documents.iter_mut().find(|d| Self::matches(&**d, &filter)) {
            let fields = existing
                .as_object_mut()
                .ok_or_else(|| StoreError::internal("Stored document is not an object"))?;
            Self::apply_update(fields, &update)?;
        } else {
            // Create-if-missing: the new document starts from the
            // filter's equality fields so the key it was looked up by
            // is part of the document.
            let mut fields = filter;
            Self::apply_update(&mut fields, &update)?;
            documents.push(Value::Object(fields));
            debug!("Created document in '{}' via upsert", collection);
        }

        Ok(())
    }

    async fn insert(&self, collection: &str, document: Value) -> Result<()> {
        if !document.is_object() {
            return Err(StoreError::invalid_update(
                "Inserted document must be a JSON object",
            ));
        }

        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(())
    }

    async fn find(&self, collection: &str) -> Result<Vec<Value>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn count(&self, collection: &str, filter: Value) -> Result<u64> {
        let filter = Self::into_object(filter, "Filter")?;
        let collections = self.collections.read().await;
        let count = collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|d| Self::matches(d, &filter))
                    .count()
            })
            .unwrap_or(0);
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_upsert_creates_then_increments() {
        let store = MemoryStore::new();

        store
            .upsert(
                "word_frequency",
                json!({"word": "cat"}),
                json!({"$inc": {"count": 2}, "$set": {"timestamp": 1.0}}),
            )
            .await
            .unwrap();

        store
            .upsert(
                "word_frequency",
                json!({"word": "cat"}),
                json!({"$inc": {"count": 3}, "$set": {"timestamp": 2.0}}),
            )
            .await
            .unwrap();

        let docs = store.find("word_frequency").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["count"], json!(5));
        assert_eq!(docs[0]["timestamp"], json!(2.0));
    }

    #[tokio::test]
    async fn test_find_missing_collection_is_empty() {
        let store = MemoryStore::new();
        assert!(store.find("nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_count_with_filter() {
        let store = MemoryStore::new();
        store
            .insert("posts", json!({"id": "a", "kind": "text"}))
            .await
            .unwrap();
        store
            .insert("posts", json!({"id": "b", "kind": "link"}))
            .await
            .unwrap();

        assert_eq!(store.count("posts", json!({})).await.unwrap(), 2);
        assert_eq!(
            store.count("posts", json!({"kind": "text"})).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_unknown_operator_rejected() {
        let store = MemoryStore::new();
        let result = store
            .upsert("posts", json!({"id": "a"}), json!({"$push": {"x": 1}}))
            .await;
        assert!(result.is_err());
    }
}
