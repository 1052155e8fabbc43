// crates/nlu/src/fuzzy.rs

use campus_knowledge::TrainingExample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzyMatch {
    /// Position of the example in the training corpus.
    pub index: usize,
    /// Number of the example's keywords found in the input.
    pub score: usize,
}

/// Keyword-hit scorer over the curated training examples.
#[derive(Debug, Clone, Default)]
pub struct FuzzyMatcher {
    candidates: Vec<Vec<String>>,
}

impl FuzzyMatcher {
    pub fn from_examples(examples: &[TrainingExample]) -> Self {
        let candidates = examples
            .iter()
            .map(|example| {
                example
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect()
            })
            .collect();
        Self { candidates }
    }

    pub fn score(&self, index: usize, lowered: &str) -> usize {
        self.candidates
            .get(index)
            .map(|keywords| keywords.iter().filter(|k| lowered.contains(k.as_str())).count())
            .unwrap_or(0)
    }

    /// Strictly highest score wins; on ties the earlier example is kept.
    pub fn best_match(&self, lowered: &str) -> Option<FuzzyMatch> {
        let mut best: Option<FuzzyMatch> = None;
        for index in 0..self.candidates.len() {
            let score = self.score(index, lowered);
            if score == 0 {
                continue;
            }
            if best.map_or(true, |b| score > b.score) {
                best = Some(FuzzyMatch { index, score });
            }
        }
        best
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
