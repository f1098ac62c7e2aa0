use std::collections::HashSet;

use regex::Regex;

use crate::stopwords::stopword_set;

/// Cleans and tokenizes raw social text into a filtered word sequence.
///
/// Every step is total: lower-case, newlines to spaces, sentence split,
/// word tokenize, drop tokens that do not begin with an alphabetic
/// character, drop stopwords.
pub struct TextNormalizer {
    sentence_regex: Regex,
    word_regex: Regex,
    stopwords: HashSet<&'static str>,
}

impl TextNormalizer {
    pub fn new() -> Self {
        let sentence_regex = Regex::new(r"[.!?]+").unwrap();
        let word_regex = Regex::new(r"[\w'-]+").unwrap();

        Self {
            sentence_regex,
            word_regex,
            stopwords: stopword_set(),
        }
    }

    pub fn normalize(&self, raw_text: &str) -> Vec<String> {
        let cleaned = raw_text.to_lowercase().replace('\n', " ");

        let mut tokens = Vec::new();
        for sentence in self.sentence_regex.split(&cleaned) {
            for word in self.tokenize_sentence(sentence) {
                tokens.push(word);
            }
        }
        tokens
    }

    fn tokenize_sentence(&self, sentence: &str) -> Vec<String> {
        self.word_regex
            .find_iter(sentence)
            .map(|m| m.as_str())
            .filter(|word| starts_alphabetic(word))
            .filter(|word| !self.stopwords.contains(word))
            .map(|word| word.to_string())
            .collect()
    }
}

fn starts_alphabetic(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_alphabetic())
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_folding_and_punctuation() {
        let normalizer = TextNormalizer::new();
        let tokens = normalizer.normalize("Cat cat dog! dog dog");
        assert_eq!(tokens, vec!["cat", "cat", "dog", "dog", "dog"]);
    }

    #[test]
    fn test_stopwords_removed() {
        let normalizer = TextNormalizer::new();
        let tokens = normalizer.normalize("The market is down and the mood is bad");
        assert_eq!(tokens, vec!["market", "mood", "bad"]);
    }

    #[test]
    fn test_non_alphabetic_leading_tokens_dropped() {
        let normalizer = TextNormalizer::new();
        let tokens = normalizer.normalize("42 3dogs cash stock-market rally");
        assert_eq!(tokens, vec!["cash", "stock-market", "rally"]);
    }

    #[test]
    fn test_newlines_become_spaces() {
        let normalizer = TextNormalizer::new();
        let tokens = normalizer.normalize("hello\nworld");
        assert_eq!(tokens, vec!["hello", "world"]);
    }

    #[test]
    fn test_empty_input() {
        let normalizer = TextNormalizer::new();
        assert!(normalizer.normalize("").is_empty());
    }

    #[test]
    fn test_no_empty_tokens_ever() {
        let normalizer = TextNormalizer::new();
        for input in ["...", "!!!", "a. b? c!", "  \n  ", "don't stop believing"] {
            for token in normalizer.normalize(input) {
                assert!(!token.is_empty());
                assert!(token.chars().next().unwrap().is_alphabetic());
            }
        }
    }
}
