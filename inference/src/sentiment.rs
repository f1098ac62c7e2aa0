//! Lexicon-based sentiment scoring.
//!
//! A lightweight word-list classifier used when no external model is
//! wired in. Real deployments put a transformer behind the
//! `SentimentModel` trait; this implementation keeps the pipeline
//! runnable and its batch contract testable.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{InferenceError, Result};
use crate::{LabelDistribution, SentimentModel};

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "love", "amazing", "wonderful", "happy", "fantastic",
    "awesome", "best", "bullish", "win", "winning", "gain", "gains", "surge", "growth",
    "strong", "beat", "record",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "hate", "horrible", "worst", "sad", "angry", "disappointed",
    "poor", "bearish", "lose", "losing", "loss", "losses", "crash", "decline", "weak",
    "miss", "fear",
];

pub struct LexiconSentimentModel {
    positive: HashSet<&'static str>,
    negative: HashSet<&'static str>,
    max_batch_size: usize,
}

impl LexiconSentimentModel {
    pub fn new() -> Self {
        Self::with_max_batch_size(512)
    }

    pub fn with_max_batch_size(max_batch_size: usize) -> Self {
        Self {
            positive: POSITIVE_WORDS.iter().copied().collect(),
            negative: NEGATIVE_WORDS.iter().copied().collect(),
            max_batch_size,
        }
    }

    fn score_text(&self, text: &str) -> LabelDistribution {
        let lowered = text.to_lowercase();
        let mut positive_hits = 0usize;
        let mut negative_hits = 0usize;

        for word in lowered.split(|c: char| !c.is_alphanumeric()) {
            if self.positive.contains(word) {
                positive_hits += 1;
            } else if self.negative.contains(word) {
                negative_hits += 1;
            }
        }

        // One smoothing observation keeps neutral mass and makes the
        // three fields sum to 1.
        let total = (positive_hits + negative_hits + 1) as f64;
        LabelDistribution {
            positive: positive_hits as f64 / total,
            negative: negative_hits as f64 / total,
            neutral: 1.0 / total,
        }
    }
}

impl Default for LexiconSentimentModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentModel for LexiconSentimentModel {
    fn score(&self, texts: &[String]) -> Result<Vec<LabelDistribution>> {
        if texts.len() > self.max_batch_size {
            return Err(InferenceError::BatchTooLarge {
                limit: self.max_batch_size,
                actual: texts.len(),
            });
        }

        debug!("Scoring batch of {} texts", texts.len());
        Ok(texts.iter().map(|t| self.score_text(t)).collect())
    }

    fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }
}
