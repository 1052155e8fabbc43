// crates/observability/src/metrics.rs

use crate::MetricsSummary;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricType {
    TotalRequests,
    ExternalNluAnswers,
    ClassifierHits,
    RuleHits,
    FuzzyHits,
    UnknownIntents,
    LiveQueries,
    LiveQueryFailures,
    Errors,
    DroppedNotifications,
}

impl MetricType {
    pub const ALL: [MetricType; 10] = [
        MetricType::TotalRequests,
        MetricType::ExternalNluAnswers,
        MetricType::ClassifierHits,
        MetricType::RuleHits,
        MetricType::FuzzyHits,
        MetricType::UnknownIntents,
        MetricType::LiveQueries,
        MetricType::LiveQueryFailures,
        MetricType::Errors,
        MetricType::DroppedNotifications,
    ];

    /// Prometheus label value.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::TotalRequests => "total_requests",
            MetricType::ExternalNluAnswers => "external_nlu_answers",
            MetricType::ClassifierHits => "classifier_hits",
            MetricType::RuleHits => "rule_hits",
            MetricType::FuzzyHits => "fuzzy_hits",
            MetricType::UnknownIntents => "unknown_intents",
            MetricType::LiveQueries => "live_queries",
            MetricType::LiveQueryFailures => "live_query_failures",
            MetricType::Errors => "errors",
            MetricType::DroppedNotifications => "dropped_notifications",
        }
    }
}

#[derive(Default)]
pub struct Metrics {
    values: RwLock<HashMap<MetricType, f64>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, metric: MetricType, value: f64) {
        let mut values = self.values.write();
        *values.entry(metric).or_insert(0.0) += value;
    }

    pub fn increment(&self, metric: MetricType) {
        self.add(metric, 1.0);
    }

    pub fn get(&self, metric: MetricType) -> Option<f64> {
        let values = self.values.read();
        values.get(&metric).copied()
    }

    pub fn get_summary(&self) -> MetricsSummary {
        let values = self.values.read();
        let count = |metric| values.get(&metric).copied().unwrap_or_default() as u64;

        MetricsSummary {
            total_requests: count(MetricType::TotalRequests),
            external_nlu_answers: count(MetricType::ExternalNluAnswers),
            classifier_hits: count(MetricType::ClassifierHits),
            rule_hits: count(MetricType::RuleHits),
            fuzzy_hits: count(MetricType::FuzzyHits),
            unknown_intents: count(MetricType::UnknownIntents),
            live_queries: count(MetricType::LiveQueries),
            live_query_failures: count(MetricType::LiveQueryFailures),
            errors: count(MetricType::Errors),
            dropped_notifications: count(MetricType::DroppedNotifications),
        }
    }
}
