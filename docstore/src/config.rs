use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{Result, StoreError};

/// Collection names consumed by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub raw_collection: String,
    pub word_frequency_collection: String,
    pub time_series_collection: String,
    pub sentiment_collection: String,
    pub analysis_log_collection: String,
    pub entity_sentiment_collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            raw_collection: "posts".to_string(),
            word_frequency_collection: "word_frequency".to_string(),
            time_series_collection: "word_time_series".to_string(),
            sentiment_collection: "sentiment_scores".to_string(),
            analysis_log_collection: "sentiment_analysis_log".to_string(),
            entity_sentiment_collection: "entity_sentiment".to_string(),
        }
    }
}

impl StoreConfig {
    /// Load collection names from environment variables with fallback to defaults.
    pub fn from_env_or_default() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = env::var("STORE_RAW_COLLECTION") {
            config.raw_collection = name;
        }

        if let Ok(name) = env::var("STORE_WORD_FREQUENCY_COLLECTION") {
            config.word_frequency_collection = name;
        }

        if let Ok(name) = env::var("STORE_TIME_SERIES_COLLECTION") {
            config.time_series_collection = name;
        }

        if let Ok(name) = env::var("STORE_SENTIMENT_COLLECTION") {
            config.sentiment_collection = name;
        }

        if let Ok(name) = env::var("STORE_ANALYSIS_LOG_COLLECTION") {
            config.analysis_log_collection = name;
        }

        if let Ok(name) = env::var("STORE_ENTITY_SENTIMENT_COLLECTION") {
            config.entity_sentiment_collection = name;
        }

        config
    }

    // A missing collection name is a startup error, never a runtime one.
    pub fn validate(&self) -> Result<()> {
        if self.raw_collection.is_empty() {
            return Err(StoreError::invalid_config(
                "Raw collection name cannot be empty",
            ));
        }

        if self.word_frequency_collection.is_empty() {
            return Err(StoreError::invalid_config(
                "Word frequency collection name cannot be empty",
            ));
        }

        if self.time_series_collection.is_empty() {
            return Err(StoreError::invalid_config(
                "Time series collection name cannot be empty",
            ));
        }

        if self.sentiment_collection.is_empty() {
            return Err(StoreError::invalid_config(
                "Sentiment collection name cannot be empty",
            ));
        }

        if self.analysis_log_collection.is_empty() {
            return Err(StoreError::invalid_config(
                "Analysis log collection name cannot be empty",
            ));
        }

        if self.entity_sentiment_collection.is_empty() {
            return Err(StoreError::invalid_config(
                "Entity sentiment collection name cannot be empty",
            ));
        }

        Ok(())
    }
}
