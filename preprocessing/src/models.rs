use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// One text-bearing record from the input stream.
///
/// Only `id` and `raw_text` are required; every other field rides along
/// in `metadata` and is persisted untouched with the scored output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: String,
    pub raw_text: String,
    #[serde(flatten, default)]
    pub metadata: Map<String, Value>,
}

impl RawRecord {
    pub fn new(id: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            raw_text: raw_text.into(),
            metadata: Map::new(),
        }
    }

    /// Parse a store document into a record. Missing required fields
    /// surface as a `MalformedRecord` error for the caller to skip.
    /// Documents using the store's `_id` key convention are accepted.
    pub fn from_document(mut document: Value) -> Result<Self> {
        if let Some(fields) = document.as_object_mut() {
            if !fields.contains_key("id") {
                if let Some(id) = fields.remove("_id") {
                    fields.insert("id".to_string(), id);
                }
            }
        }
        Ok(serde_json::from_value(document)?)
    }
}
