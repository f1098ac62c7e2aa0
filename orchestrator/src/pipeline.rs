use std::collections::HashSet;

use anyhow::{bail, Result};
use serde_json::{json, Map, Value};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use aggregation::{epoch_seconds, merge_entity_scores, BatchDeduplicator, WordFrequencyAggregator};
use docstore::DocumentStore;
use inference::{EntityExtractor, LabelDistribution, SentimentModel};
use preprocessing::RawRecord;

use crate::config::PipelineConfig;
use crate::source::RecordSource;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Records scored and durably persisted this run.
    pub scored: usize,
    /// Records skipped because a marker already existed.
    pub skipped: usize,
    /// Records dropped because they could not be parsed.
    pub malformed: usize,
    /// Inference calls issued.
    pub batches: usize,
    /// Batches abandoned after an inference failure or length mismatch.
    pub failed_batches: usize,
}

/// Drives fetch -> filter-already-done -> score -> persist -> checkpoint
/// over a bounded record source, in fixed-size batches.
///
/// Persistence is output-then-marker per record, both upserts keyed by
/// the record identifier: a crash between the two causes at most a
/// harmless reprocessing on the next run, never a missing output.
pub struct ScoringDriver<'a> {
    store: &'a dyn DocumentStore,
    model: &'a dyn SentimentModel,
    extractor: &'a dyn EntityExtractor,
    config: &'a PipelineConfig,
}

impl<'a> ScoringDriver<'a> {
    pub fn new(
        store: &'a dyn DocumentStore,
        model: &'a dyn SentimentModel,
        extractor: &'a dyn EntityExtractor,
        config: &'a PipelineConfig,
    ) -> Self {
        Self {
            store,
            model,
            extractor,
            config,
        }
    }

    pub async fn run(&self, source: &mut dyn RecordSource) -> Result<RunSummary> {
        if self.config.model_batch_size > self.model.max_batch_size() {
            bail!(
                "Configured batch size {} exceeds model limit {}",
                self.config.model_batch_size,
                self.model.max_batch_size()
            );
        }

        let mut dedup =
            BatchDeduplicator::load(self.store, &self.config.store.analysis_log_collection)
                .await?;

        let mut summary = RunSummary::default();
        let mut batch: Vec<RawRecord> = Vec::new();
        let mut examined = 0usize;
        let mut since_throttle = 0usize;

        info!("Starting sentiment scoring run...");

        while let Some(documents) = source.next_batch().await? {
            for document in documents {
                examined += 1;
                since_throttle += 1;

                match RawRecord::from_document(document) {
                    Ok(record) => {
                        if dedup.already_processed(&record.id) {
                            summary.skipped += 1;
                        } else {
                            batch.push(record);
                            if batch.len() == self.config.model_batch_size {
                                self.flush_batch(&mut batch, &mut dedup, &mut summary).await;
                            }
                        }
                    }
                    Err(e) => {
                        warn!("Skipping malformed record: {}", e);
                        summary.malformed += 1;
                    }
                }

                if since_throttle >= self.config.throttle_interval {
                    info!("Examined {} records so far, pausing...", examined);
                    sleep(self.config.throttle_delay).await;
                    since_throttle = 0;
                }
            }
        }

        // Source exhausted with a partial batch: still flushed, no
        // record is dropped at the boundary.
        if !batch.is_empty() {
            self.flush_batch(&mut batch, &mut dedup, &mut summary).await;
        }

        info!(
            "Scoring run complete: {} scored, {} skipped, {} malformed, {} batches ({} failed)",
            summary.scored,
            summary.skipped,
            summary.malformed,
            summary.batches,
            summary.failed_batches
        );
        Ok(summary)
    }

    async fn flush_batch(
        &self,
        batch: &mut Vec<RawRecord>,
        dedup: &mut BatchDeduplicator,
        summary: &mut RunSummary,
    ) {
        let records = std::mem::take(batch);
        summary.batches += 1;
        debug!("Scoring batch of {} records", records.len());

        let texts: Vec<String> = records.iter().map(|r| r.raw_text.clone()).collect();
        let results = match self.model.score(&texts) {
            Ok(results) => results,
            Err(e) => {
                error!("Inference failed for batch of {}: {}", texts.len(), e);
                summary.failed_batches += 1;
                return;
            }
        };

        // A result list of the wrong length would misattribute scores
        // onto the wrong records; abandon the batch instead.
        if results.len() != texts.len() {
            let mismatch = inference::InferenceError::BatchLengthMismatch {
                expected: texts.len(),
                actual: results.len(),
            };
            error!("{}, abandoning batch", mismatch);
            summary.failed_batches += 1;
            return;
        }

        for (record, result) in records.iter().zip(&results) {
            match self.persist_result(record, result).await {
                Ok(()) => {
                    dedup.mark(&record.id);
                    summary.scored += 1;
                }
                Err(e) => {
                    // Treated as not-yet-analyzed on the next run.
                    warn!("Failed to persist result for '{}': {}", record.id, e);
                }
            }
        }

        self.persist_entity_scores(&records, &results).await;
    }

    async fn persist_result(&self, record: &RawRecord, result: &LabelDistribution) -> Result<()> {
        let mut fields = Map::new();
        for (key, value) in &record.metadata {
            fields.insert(key.clone(), value.clone());
        }
        fields.insert("id".to_string(), json!(record.id));
        fields.insert("text".to_string(), json!(record.raw_text));
        fields.insert("sentiment".to_string(), serde_json::to_value(result)?);

        // Output first, then marker.
        self.store
            .upsert(
                &self.config.store.sentiment_collection,
                json!({"id": record.id}),
                json!({"$set": Value::Object(fields)}),
            )
            .await?;

        self.store
            .upsert(
                &self.config.store.analysis_log_collection,
                json!({"document_id": record.id}),
                json!({"$set": {"sentiment": serde_json::to_value(result)?}}),
            )
            .await?;

        Ok(())
    }

    async fn persist_entity_scores(&self, records: &[RawRecord], results: &[LabelDistribution]) {
        let entity_sets: Vec<HashSet<String>> = records
            .iter()
            .map(|r| self.extractor.extract_entities(&r.raw_text))
            .collect();

        let merged = match merge_entity_scores(&entity_sets, results) {
            Ok(merged) => merged,
            Err(e) => {
                error!("Entity merge failed: {}", e);
                return;
            }
        };

        if merged.is_empty() {
            return;
        }

        let batch_id = Uuid::new_v4().to_string();
        let timestamp = epoch_seconds();
        debug!("Persisting {} entity scores for batch {}", merged.len(), batch_id);

        for (entity, distribution) in merged {
            let document = json!({
                "batch_id": batch_id,
                "entity": entity,
                "sentiment": distribution,
                "timestamp": timestamp,
            });
            if let Err(e) = self
                .store
                .insert(&self.config.store.entity_sentiment_collection, document)
                .await
            {
                warn!("Failed to persist entity score: {}", e);
            }
        }
    }
}

/// Word-frequency pass: normalize every record's text and fold the
/// counts into the cumulative and time-series collections. One
/// `observed_at` per fetched batch, captured at batch start.
pub async fn run_word_frequency(
    store: &dyn DocumentStore,
    config: &PipelineConfig,
    source: &mut dyn RecordSource,
) -> Result<usize> {
    let aggregator = WordFrequencyAggregator::new(
        store,
        config.store.word_frequency_collection.clone(),
        config.store.time_series_collection.clone(),
    );

    let mut processed = 0usize;
    while let Some(documents) = source.next_batch().await? {
        let observed_at = epoch_seconds();
        for document in documents {
            match RawRecord::from_document(document) {
                Ok(record) => {
                    aggregator.apply_batch(&record.raw_text, observed_at).await?;
                    processed += 1;
                }
                Err(e) => warn!("Skipping malformed record: {}", e),
            }
        }
    }

    info!("Word-frequency pass processed {} records", processed);
    Ok(processed)
}
