pub mod error;
pub mod ner;
pub mod sentiment;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub use error::{InferenceError, Result};
pub use ner::HeuristicEntityExtractor;
pub use sentiment::LexiconSentimentModel;

/// Three-class probability vector produced by a sentiment classifier.
/// Each field is in [0, 1]; the three sum to ~1 for a classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelDistribution {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl LabelDistribution {
    pub fn new(positive: f64, negative: f64, neutral: f64) -> Self {
        Self {
            positive,
            negative,
            neutral,
        }
    }

    /// Component-wise arithmetic mean. Each field is averaged
    /// independently; the result is not re-normalized. Returns the
    /// zero distribution for an empty slice.
    pub fn mean(observations: &[LabelDistribution]) -> LabelDistribution {
        if observations.is_empty() {
            return LabelDistribution::default();
        }

        let n = observations.len() as f64;
        LabelDistribution {
            positive: observations.iter().map(|d| d.positive).sum::<f64>() / n,
            negative: observations.iter().map(|d| d.negative).sum::<f64>() / n,
            neutral: observations.iter().map(|d| d.neutral).sum::<f64>() / n,
        }
    }
}

/// Batch sentiment scoring: one distribution per input text, in input
/// order. Implementations must never reorder or drop results; the
/// caller treats `texts[i] -> results[i]` as index-aligned.
pub trait SentimentModel: Send + Sync {
    fn score(&self, texts: &[String]) -> Result<Vec<LabelDistribution>>;

    /// Largest batch a single call may carry.
    fn max_batch_size(&self) -> usize {
        512
    }
}

/// Named-entity extraction: company names mentioned in one text.
pub trait EntityExtractor: Send + Sync {
    fn extract_entities(&self, text: &str) -> HashSet<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_two() {
        let a = LabelDistribution::new(1.0, 0.0, 0.0);
        let b = LabelDistribution::new(0.0, 1.0, 0.0);
        let mean = LabelDistribution::mean(&[a, b]);
        assert_eq!(mean, LabelDistribution::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn test_mean_of_empty_is_zero() {
        assert_eq!(LabelDistribution::mean(&[]), LabelDistribution::default());
    }

    #[test]
    fn test_mean_of_single() {
        let d = LabelDistribution::new(0.2, 0.3, 0.5);
        assert_eq!(LabelDistribution::mean(&[d]), d);
    }
}
