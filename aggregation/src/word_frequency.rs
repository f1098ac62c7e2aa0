use std::collections::HashMap;

use serde_json::json;
use tracing::{debug, warn};

use docstore::DocumentStore;
use preprocessing::TextNormalizer;

use crate::Result;

/// Reduces a text blob into per-word count deltas and applies them to
/// the cumulative word-frequency collection plus the append-only
/// time-series collection.
pub struct WordFrequencyAggregator<'a> {
    store: &'a dyn DocumentStore,
    normalizer: TextNormalizer,
    frequency_collection: String,
    time_series_collection: String,
}

impl<'a> WordFrequencyAggregator<'a> {
    pub fn new(
        store: &'a dyn DocumentStore,
        frequency_collection: impl Into<String>,
        time_series_collection: impl Into<String>,
    ) -> Self {
        Self {
            store,
            normalizer: TextNormalizer::new(),
            frequency_collection: frequency_collection.into(),
            time_series_collection: time_series_collection.into(),
        }
    }

    /// Map step emits `(token, 1)` per occurrence; reduce sums per
    /// distinct token. Multiset counts, not distinct-word counts.
    pub fn batch_counts(&self, raw_text: &str) -> HashMap<String, u64> {
        let mut mapped: Vec<(String, u64)> = Vec::new();
        for token in self.normalizer.normalize(raw_text) {
            mapped.push((token, 1));
        }

        let mut counts: HashMap<String, u64> = HashMap::new();
        for (token, one) in mapped {
            *counts.entry(token).or_insert(0) += one;
        }
        counts
    }

    /// Apply one text blob's counts to the persistent aggregates.
    ///
    /// Every token in the call shares the caller-captured `observed_at`.
    /// A failed write for one token is logged and does not abort the
    /// remaining tokens.
    pub async fn apply_batch(&self, raw_text: &str, observed_at: f64) -> Result<()> {
        let counts = self.batch_counts(raw_text);
        debug!("Applying {} distinct words to frequency store", counts.len());

        for (word, batch_count) in counts {
            if let Err(e) = self.apply_word(&word, batch_count, observed_at).await {
                warn!("Frequency update failed for '{}': {}", word, e);
            }
        }

        Ok(())
    }

    // Cumulative upsert first, then the time-series append; the append
    // must never be skipped after a successful cumulative write.
    async fn apply_word(&self, word: &str, batch_count: u64, observed_at: f64) -> Result<()> {
        self.store
            .upsert(
                &self.frequency_collection,
                json!({"word": word}),
                json!({
                    "$inc": {"count": batch_count},
                    "$set": {"timestamp": observed_at},
                }),
            )
            .await?;

        self.store
            .insert(
                &self.time_series_collection,
                json!({"word": word, "count": batch_count, "timestamp": observed_at}),
            )
            .await?;

        Ok(())
    }
}
