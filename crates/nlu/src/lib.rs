// crates/nlu/src/lib.rs

use std::sync::Arc;

use campus_core::{EntityFocus, Intent, LiveQuery};
use campus_knowledge::{AliasTable, KnowledgeBase};
use serde::Serialize;
use tracing::debug;

pub mod classifier;
pub mod external;
pub mod fuzzy;
pub mod rules;
pub mod text;

pub use classifier::{IntentClassifier, NaiveBayesClassifier};
pub use external::{ConversationalService, ExternalNluClient, ExternalNluConfig};
pub use fuzzy::{FuzzyMatch, FuzzyMatcher};
pub use rules::{Rule, RuleContext, RuleId, RuleSet};
pub use text::Utterance;

const DEFAULT_CLASSIFIER_THRESHOLD: f32 = 0.5;
const DEFAULT_UPCOMING_DAYS: u32 = 7;

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Classifier labels are accepted only strictly above this score.
    pub classifier_threshold: f32,
    pub classifier_enabled: bool,
    pub upcoming_days: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            classifier_threshold: DEFAULT_CLASSIFIER_THRESHOLD,
            classifier_enabled: true,
            upcoming_days: DEFAULT_UPCOMING_DAYS,
        }
    }
}

/// Which stage of the chain produced an answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum ResolutionSource {
    External,
    Classifier { confidence: f32 },
    Rule { rule: RuleId },
    Fuzzy { score: usize },
    Default,
}

impl ResolutionSource {
    pub fn label(&self) -> &'static str {
        match self {
            ResolutionSource::External => "external",
            ResolutionSource::Classifier { .. } => "classifier",
            ResolutionSource::Rule { .. } => "rule",
            ResolutionSource::Fuzzy { .. } => "fuzzy",
            ResolutionSource::Default => "default",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub intent: Intent,
    pub source: ResolutionSource,
}

impl Resolution {
    fn new(intent: Intent, source: ResolutionSource) -> Self {
        Self { intent, source }
    }
}

/// Local resolution chain: classifier, primary rules, fuzzy training match,
/// legacy rules, then unknown.
pub struct IntentResolver {
    knowledge: Arc<KnowledgeBase>,
    aliases: AliasTable,
    classifier: Option<Box<dyn IntentClassifier>>,
    primary: RuleSet,
    fuzzy: FuzzyMatcher,
    legacy: RuleSet,
    config: ResolverConfig,
}

impl IntentResolver {
    /// Resolver without a statistical stage.
    pub fn new(knowledge: Arc<KnowledgeBase>, config: ResolverConfig) -> Self {
        let aliases = AliasTable::from_knowledge(&knowledge);
        let fuzzy = FuzzyMatcher::from_examples(&knowledge.training);
        Self {
            knowledge,
            aliases,
            classifier: None,
            primary: RuleSet::primary(),
            fuzzy,
            legacy: RuleSet::legacy(),
            config,
        }
    }

    /// Resolver with a naive Bayes classifier trained from the knowledge base,
    /// unless disabled in `config`.
    pub fn bootstrap(knowledge: Arc<KnowledgeBase>, config: ResolverConfig) -> Self {
        let enabled = config.classifier_enabled;
        let resolver = Self::new(knowledge, config);
        if enabled {
            let classifier = NaiveBayesClassifier::bootstrap(&resolver.knowledge);
            resolver.with_classifier(Box::new(classifier))
        } else {
            resolver
        }
    }

    pub fn with_classifier(mut self, classifier: Box<dyn IntentClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn knowledge(&self) -> &Arc<KnowledgeBase> {
        &self.knowledge
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn resolve(&self, text: &str) -> Resolution {
        let utterance = Utterance::new(text);
        if utterance.is_empty() {
            return Resolution::new(Intent::Unknown, ResolutionSource::Default);
        }

        if let Some(resolution) = self.classify(&utterance) {
            return resolution;
        }

        let ctx = RuleContext {
            utterance: &utterance,
            knowledge: &self.knowledge,
            aliases: &self.aliases,
            upcoming_days: self.config.upcoming_days,
        };

        if let Some((rule, intent)) = self.primary.evaluate(&ctx) {
            debug!("Rule {} matched: {}", rule, intent);
            return Resolution::new(intent, ResolutionSource::Rule { rule });
        }

        if let Some(found) = self.fuzzy.best_match(utterance.lowered()) {
            if let Some(example) = self.knowledge.training.get(found.index) {
                debug!(
                    "Fuzzy match on training example {} ({}), score {}",
                    found.index, example.category, found.score
                );
                return Resolution::new(
                    Intent::Training {
                        category: example.category.clone(),
                        example: found.index,
                    },
                    ResolutionSource::Fuzzy { score: found.score },
                );
            }
        }

        if let Some((rule, intent)) = self.legacy.evaluate(&ctx) {
            debug!("Legacy rule {} matched: {}", rule, intent);
            return Resolution::new(intent, ResolutionSource::Rule { rule });
        }

        debug!("No resolution for '{}'", text);
        Resolution::new(Intent::Unknown, ResolutionSource::Default)
    }

    fn classify(&self, utterance: &Utterance) -> Option<Resolution> {
        let classifier = self.classifier.as_ref()?;
        match classifier.classify(utterance.original()) {
            Ok(Some(result)) if result.is_trusted(self.config.classifier_threshold) => {
                debug!(
                    "{} accepted {} ({:.2})",
                    classifier.name(),
                    result.intent,
                    result.confidence
                );
                let intent = self.refine(result.intent, utterance);
                Some(Resolution::new(
                    intent,
                    ResolutionSource::Classifier {
                        confidence: result.confidence,
                    },
                ))
            }
            Ok(Some(result)) => {
                debug!(
                    "{} below threshold for {} ({:.2})",
                    classifier.name(),
                    result.intent,
                    result.confidence
                );
                None
            }
            Ok(None) => None,
            Err(e) => {
                debug!("{} failed: {}", classifier.name(), e);
                None
            }
        }
    }

    /// Re-derives the parts of a classifier label that come from the
    /// utterance itself: the "next N days" window and the entity focus.
    fn refine(&self, intent: Intent, utterance: &Utterance) -> Intent {
        match intent {
            Intent::Live {
                query: LiveQuery::UpcomingEvents { .. },
            } => Intent::live(LiveQuery::UpcomingEvents {
                days: rules::upcoming_window(utterance, self.config.upcoming_days),
            }),
            Intent::Organization { id, focus } => match rules::refinement(utterance) {
                EntityFocus::Overview => Intent::Organization { id, focus },
                refined => Intent::Organization { id, focus: refined },
            },
            other => other,
        }
    }
}
