// crates/nlu/src/classifier.rs

use std::collections::{HashMap, HashSet};

use campus_core::{CampusError, CampusResult, ClassifierResult, EntityFocus, Intent, LiveQuery};
use campus_knowledge::KnowledgeBase;
use tracing::debug;

use crate::text::tokenize;

const DEFAULT_SMOOTHING: f64 = 0.05;

/// Statistical stage of the resolution chain.
pub trait IntentClassifier: Send + Sync {
    /// `Ok(None)` means the classifier has nothing to say about the text.
    fn classify(&self, text: &str) -> CampusResult<Option<ClassifierResult>>;
    fn name(&self) -> &str;
}

#[derive(Debug)]
struct ClassStats {
    intent: Intent,
    documents: usize,
    token_counts: HashMap<String, usize>,
    total_tokens: usize,
}

/// Multinomial naive Bayes over bag-of-words features.
///
/// Confidence is the normalized posterior of the winning class, so it is
/// always within [0, 1].
#[derive(Debug)]
pub struct NaiveBayesClassifier {
    classes: Vec<ClassStats>,
    index: HashMap<Intent, usize>,
    vocabulary: HashSet<String>,
    total_documents: usize,
    smoothing: f64,
}

impl Default for NaiveBayesClassifier {
    fn default() -> Self {
        Self::with_smoothing(DEFAULT_SMOOTHING)
    }
}

impl NaiveBayesClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_smoothing(smoothing: f64) -> Self {
        Self {
            classes: Vec::new(),
            index: HashMap::new(),
            vocabulary: HashSet::new(),
            total_documents: 0,
            smoothing,
        }
    }

    /// Builds a classifier trained on the corpus derived from `kb`.
    pub fn bootstrap(kb: &KnowledgeBase) -> Self {
        let mut classifier = Self::new();
        let corpus = seed_corpus(kb);
        for (utterance, intent) in &corpus {
            classifier.train(utterance, intent.clone());
        }
        debug!(
            "Classifier trained on {} utterances across {} intents ({} terms)",
            corpus.len(),
            classifier.classes.len(),
            classifier.vocabulary.len()
        );
        classifier
    }

    pub fn train(&mut self, utterance: &str, intent: Intent) {
        let tokens = tokenize(utterance);

        let slot = match self.index.get(&intent) {
            Some(&slot) => slot,
            None => {
                self.classes.push(ClassStats {
                    intent: intent.clone(),
                    documents: 0,
                    token_counts: HashMap::new(),
                    total_tokens: 0,
                });
                self.index.insert(intent, self.classes.len() - 1);
                self.classes.len() - 1
            }
        };

        let class = &mut self.classes[slot];
        class.documents += 1;
        class.total_tokens += tokens.len();
        for token in tokens {
            *class.token_counts.entry(token.clone()).or_insert(0) += 1;
            self.vocabulary.insert(token);
        }
        self.total_documents += 1;
    }

    pub fn is_trained(&self) -> bool {
        self.total_documents > 0
    }

    pub fn intents(&self) -> usize {
        self.classes.len()
    }

    fn log_posteriors(&self, tokens: &[String]) -> Vec<f64> {
        let vocab = self.vocabulary.len() as f64;
        self.classes
            .iter()
            .map(|class| {
                let prior = (class.documents as f64 / self.total_documents as f64).ln();
                let denominator = class.total_tokens as f64 + self.smoothing * vocab;
                tokens.iter().fold(prior, |acc, token| {
                    let count = class.token_counts.get(token).copied().unwrap_or(0) as f64;
                    acc + ((count + self.smoothing) / denominator).ln()
                })
            })
            .collect()
    }
}

impl IntentClassifier for NaiveBayesClassifier {
    fn classify(&self, text: &str) -> CampusResult<Option<ClassifierResult>> {
        if !self.is_trained() {
            return Ok(None);
        }

        let tokens = tokenize(text)
            .into_iter()
            .filter(|t| self.vocabulary.contains(t))
            .collect::<Vec<_>>();
        if tokens.is_empty() {
            return Ok(None);
        }

        let scores = self.log_posteriors(&tokens);
        let (best, best_score) = scores
            .iter()
            .copied()
            .enumerate()
            .fold(None::<(usize, f64)>, |acc, (i, s)| match acc {
                Some((_, top)) if top >= s => acc,
                _ => Some((i, s)),
            })
            .ok_or_else(|| CampusError::Classifier("no intents trained".to_string()))?;

        if !best_score.is_finite() {
            return Err(CampusError::Classifier(format!(
                "non-finite score for '{}'",
                text
            )));
        }

        let normalizer: f64 = scores.iter().map(|s| (s - best_score).exp()).sum();
        let confidence = (1.0 / normalizer) as f32;

        Ok(Some(ClassifierResult {
            intent: self.classes[best].intent.clone(),
            confidence,
        }))
    }

    fn name(&self) -> &str {
        "NaiveBayesClassifier"
    }
}

const GREETING_SEEDS: &[&str] = &[
    "hello",
    "hello there",
    "hi",
    "hi there",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
    "greetings",
];
const FAREWELL_SEEDS: &[&str] = &["bye", "bye bye", "goodbye", "see you later", "good night"];
const THANKS_SEEDS: &[&str] = &["thanks", "thank you", "thank you so much", "thanks a lot"];
const HELP_SEEDS: &[&str] = &["help", "help me", "show menu", "what are your options"];

/// Hand-authored utterances plus utterances generated from the knowledge base.
pub fn seed_corpus(kb: &KnowledgeBase) -> Vec<(String, Intent)> {
    fn add(corpus: &mut Vec<(String, Intent)>, phrases: &[&str], intent: Intent) {
        corpus.extend(phrases.iter().map(|p| (p.to_string(), intent.clone())));
    }

    let mut corpus: Vec<(String, Intent)> = Vec::new();

    add(&mut corpus, GREETING_SEEDS, Intent::Greeting);
    add(&mut corpus, FAREWELL_SEEDS, Intent::Farewell);
    add(&mut corpus, THANKS_SEEDS, Intent::Thanks);
    add(&mut corpus, HELP_SEEDS, Intent::Help);
    add(
        &mut corpus,
        &[
            "list all organizations",
            "list all clubs",
            "show all student organizations",
            "which clubs exist",
        ],
        Intent::ListOrganizations,
    );
    add(
        &mut corpus,
        &["university ranking", "nirf ranking", "how is the university ranked"],
        Intent::Rankings,
    );
    add(
        &mut corpus,
        &["campus spots", "famous places on campus", "landmarks on campus"],
        Intent::LandmarkOverview,
    );
    add(
        &mut corpus,
        &["campus life", "how is life on campus", "student life"],
        Intent::CampusLife,
    );
    add(
        &mut corpus,
        &["events", "annual fests", "festivals on campus"],
        Intent::EventsOverview,
    );
    add(
        &mut corpus,
        &["benefits of joining", "why join a club", "perks of joining"],
        Intent::Benefits,
    );
    add(
        &mut corpus,
        &["admissions", "admission process", "eligibility for admission"],
        Intent::Admissions,
    );
    add(
        &mut corpus,
        &["events now", "events happening now", "ongoing events right now"],
        Intent::live(LiveQuery::EventsNow),
    );
    add(
        &mut corpus,
        &["upcoming events", "events this week", "registrations open"],
        Intent::live(LiveQuery::UpcomingEvents { days: 7 }),
    );
    add(
        &mut corpus,
        &["active polls", "open polls", "polls running"],
        Intent::live(LiveQuery::ActivePolls),
    );
    add(
        &mut corpus,
        &["my profile", "show my profile", "my details"],
        Intent::live(LiveQuery::MyProfile),
    );
    add(
        &mut corpus,
        &["my ideas", "my submitted ideas", "show my ideas"],
        Intent::live(LiveQuery::MyIdeas),
    );
    add(
        &mut corpus,
        &["my achievements", "my submitted achievements"],
        Intent::live(LiveQuery::MyAchievements),
    );

    let council = &kb.council;
    for phrase in [
        council.short_name.to_lowercase(),
        format!("what is {}", council.short_name.to_lowercase()),
        council.name.to_lowercase(),
        format!("tell me about the {}", council.name.to_lowercase()),
    ] {
        corpus.push((phrase, Intent::CouncilOverview));
    }

    for org in &kb.organizations {
        let short = org.short_name.to_lowercase();
        let overview = Intent::organization(&org.id, EntityFocus::Overview);
        corpus.push((org.name.to_lowercase(), overview.clone()));
        corpus.push((format!("what is {}", short), overview.clone()));
        for alias in &org.aliases {
            corpus.push((alias.clone(), overview.clone()));
        }

        let verticals = Intent::organization(&org.id, EntityFocus::SubGroups);
        corpus.push((format!("{} verticals", short), verticals.clone()));
        corpus.push((format!("teams in {}", org.name.to_lowercase()), verticals));

        let achievements = Intent::organization(&org.id, EntityFocus::Achievements);
        corpus.push((format!("{} achievements", short), achievements.clone()));
        corpus.push((format!("{} awards", short), achievements.clone()));
        corpus.push((
            format!("achievements of {}", org.name.to_lowercase()),
            achievements,
        ));

        for group in &org.sub_groups {
            let intent = Intent::SubGroup {
                organization_id: org.id.clone(),
                name: group.name.clone(),
            };
            corpus.push((group.name.to_lowercase(), intent.clone()));
            corpus.push((format!("{} {}", group.name.to_lowercase(), short), intent));
        }
    }

    for spot in &kb.landmarks {
        let intent = Intent::Landmark {
            id: spot.id.clone(),
        };
        corpus.push((spot.name.to_lowercase(), intent.clone()));
        corpus.push((format!("where is the {}", spot.name.to_lowercase()), intent));
    }

    for (index, example) in kb.training.iter().enumerate() {
        corpus.push((
            example.question.clone(),
            Intent::Training {
                category: example.category.clone(),
                example: index,
            },
        ));
    }

    corpus
}
