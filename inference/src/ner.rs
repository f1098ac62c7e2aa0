//! Heuristic company-name extraction.
//!
//! Capitalized-span heuristic standing behind the `EntityExtractor`
//! trait where a real deployment would call an NER model. Consecutive
//! capitalized words form one candidate; sentence-leading function
//! words are filtered out.

use std::collections::HashSet;

use crate::EntityExtractor;

// Capitalized words that are almost always sentence openers, not names.
const FUNCTION_WORDS: &[&str] = &[
    "the", "a", "an", "i", "this", "that", "it", "he", "she", "they", "we", "you", "my", "but",
    "and", "or", "if", "so", "is", "are", "was", "what", "when", "where", "why", "how", "there",
    "here", "not", "no", "yes", "also", "then", "now", "today", "yesterday", "tomorrow",
];

pub struct HeuristicEntityExtractor {
    function_words: HashSet<&'static str>,
}

impl HeuristicEntityExtractor {
    pub fn new() -> Self {
        Self {
            function_words: FUNCTION_WORDS.iter().copied().collect(),
        }
    }

    fn is_candidate_word(&self, word: &str) -> bool {
        let mut chars = word.chars();
        match chars.next() {
            Some(first) if first.is_uppercase() => {}
            _ => return false,
        }
        !self.function_words.contains(word.to_lowercase().as_str())
    }
}

impl Default for HeuristicEntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityExtractor for HeuristicEntityExtractor {
    fn extract_entities(&self, text: &str) -> HashSet<String> {
        let mut entities = HashSet::new();
        let mut span: Vec<&str> = Vec::new();

        for raw_word in text.split_whitespace() {
            let word = raw_word.trim_matches(|c: char| !c.is_alphanumeric() && c != '&');
            if !word.is_empty() && self.is_candidate_word(word) {
                span.push(word);
            } else if !span.is_empty() {
                entities.insert(span.join(" "));
                span.clear();
            }
        }

        if !span.is_empty() {
            entities.insert(span.join(" "));
        }

        entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_word_span() {
        let extractor = HeuristicEntityExtractor::new();
        let entities = extractor.extract_entities("I think Morgan Stanley upgraded Apple today.");
        assert!(entities.contains("Morgan Stanley"));
        assert!(entities.contains("Apple"));
        assert!(!entities.contains("I"));
    }

    #[test]
    fn test_sentence_openers_filtered() {
        let extractor = HeuristicEntityExtractor::new();
        let entities = extractor.extract_entities("The market closed flat. Tesla rallied.");
        assert_eq!(entities, HashSet::from(["Tesla".to_string()]));
    }

    #[test]
    fn test_no_entities() {
        let extractor = HeuristicEntityExtractor::new();
        assert!(extractor
            .extract_entities("nothing capitalized in here")
            .is_empty());
    }
}
