pub mod dedup;
pub mod entity_sentiment;
pub mod word_frequency;

use thiserror::Error;

pub use dedup::BatchDeduplicator;
pub use entity_sentiment::merge_entity_scores;
pub use word_frequency::WordFrequencyAggregator;

pub type Result<T> = std::result::Result<T, AggregationError>;

#[derive(Error, Debug)]
pub enum AggregationError {
    #[error("Store error: {0}")]
    Store(#[from] docstore::StoreError),

    #[error("Entity sets and scores differ in length: {entities} vs {scores}")]
    LengthMismatch { entities: usize, scores: usize },
}

/// Wall-clock capture as float epoch seconds, the timestamp unit used
/// across the frequency and time-series collections. Callers capture
/// one value per batch and pass it down.
pub fn epoch_seconds() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
