// crates/nlu/src/text.rs

use std::sync::LazyLock;

use regex::Regex;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").unwrap());

const STOPWORDS: &[&str] = &[
    "a", "about", "an", "and", "any", "are", "be", "can", "do", "does", "for", "how", "i", "in",
    "is", "it", "me", "of", "on", "please", "some", "tell", "that", "the", "there", "this", "to",
    "what", "whats", "where", "which", "who", "you",
];

/// An input sentence prepared for matching.
///
/// `lowered` keeps punctuation for substring checks; `padded` is the
/// space-delimited word sequence used for whole-phrase checks.
#[derive(Debug, Clone)]
pub struct Utterance {
    original: String,
    lowered: String,
    padded: String,
}

impl Utterance {
    pub fn new(text: &str) -> Self {
        let lowered = text.trim().to_lowercase();
        let padded = format!(" {} ", normalize_words(&lowered));
        Self {
            original: text.to_string(),
            lowered,
            padded,
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn lowered(&self) -> &str {
        &self.lowered
    }

    pub fn is_empty(&self) -> bool {
        self.padded.trim().is_empty()
    }

    /// Raw substring containment.
    pub fn contains(&self, needle: &str) -> bool {
        self.lowered.contains(needle)
    }

    /// Whole-word phrase containment, so "hi" does not fire on "achievements".
    pub fn has_phrase(&self, phrase: &str) -> bool {
        let words = normalize_words(&phrase.to_lowercase());
        if words.is_empty() {
            return false;
        }
        self.padded.contains(&format!(" {} ", words))
    }

    pub fn has_any(&self, phrases: &[&str]) -> bool {
        phrases.iter().any(|p| self.has_phrase(p))
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.padded.split_whitespace()
    }
}

/// Lowercased content words with stopwords removed.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize_words(&text.to_lowercase())
        .split_whitespace()
        .filter(|w| !STOPWORDS.contains(w))
        .map(str::to_string)
        .collect()
}

fn normalize_words(lowered: &str) -> String {
    NON_WORD
        .replace_all(lowered, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrases_match_on_word_boundaries() {
        let u = Utterance::new("Show me VSC achievements!");
        assert!(!u.has_phrase("hi"));
        assert!(u.has_phrase("achievements"));
        assert!(u.has_phrase("vsc  achievements"));
        assert!(Utterance::new("hi, there").has_phrase("hi"));
    }

    #[test]
    fn substring_checks_keep_punctuation() {
        let u = Utterance::new("what's the E-Cell up to?");
        assert!(u.contains("e-cell"));
        assert!(u.has_phrase("e cell"));
    }

    #[test]
    fn tokenize_drops_stopwords() {
        assert_eq!(tokenize("What is SAC?"), vec!["sac"]);
        assert_eq!(tokenize("tell me about my profile"), vec!["my", "profile"]);
        assert!(tokenize("what is the").is_empty());
    }
}
