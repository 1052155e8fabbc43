// crates/observability/src/lib.rs

use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::error;

pub mod metrics;

pub use metrics::{MetricType, Metrics};

const NAMESPACE: &str = "campus_assistant";

/// Keeps an in-process tally and mirrors every change into a Prometheus
/// registry owned by the collector.
pub struct MetricsCollector {
    metrics: Arc<Metrics>,
    registry: Registry,
    counters: CounterVec,
    latency: HistogramVec,
    start_time: Instant,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        let registry = Registry::new();

        let counters = CounterVec::new(
            Opts::new("events_total", "Engine events by kind").namespace(NAMESPACE),
            &["metric"],
        )
        .expect("static counter definition");
        let latency = HistogramVec::new(
            HistogramOpts::new("response_seconds", "Time to produce a reply")
                .namespace(NAMESPACE)
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["stage"],
        )
        .expect("static histogram definition");

        for collector in [
            Box::new(counters.clone()) as Box<dyn prometheus::core::Collector>,
            Box::new(latency.clone()),
        ] {
            if let Err(e) = registry.register(collector) {
                error!("Failed to register Prometheus collector: {}", e);
            }
        }

        Self {
            metrics: Arc::new(Metrics::new()),
            registry,
            counters,
            latency,
            start_time: Instant::now(),
        }
    }

    pub fn add(&self, metric: MetricType, value: f64) {
        self.metrics.add(metric, value);
        self.counters
            .with_label_values(&[metric.as_str()])
            .inc_by(value);
    }

    pub fn increment(&self, metric: MetricType) {
        self.add(metric, 1.0);
    }

    pub fn observe_latency(&self, stage: &str, elapsed: Duration) {
        self.latency
            .with_label_values(&[stage])
            .observe(elapsed.as_secs_f64());
    }

    pub fn get(&self, metric: MetricType) -> u64 {
        self.metrics.get(metric).unwrap_or_default() as u64
    }

    pub fn get_prometheus_metrics(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = vec![];
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            error!("Failed to encode metrics: {}", e);
            return String::new();
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }

    pub fn get_health_status(&self) -> HealthStatus {
        HealthStatus {
            healthy: true,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            metrics: self.metrics.get_summary(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub healthy: bool,
    pub uptime_seconds: u64,
    pub version: String,
    pub metrics: MetricsSummary,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSummary {
    pub total_requests: u64,
    pub external_nlu_answers: u64,
    pub classifier_hits: u64,
    pub rule_hits: u64,
    pub fuzzy_hits: u64,
    pub unknown_intents: u64,
    pub live_queries: u64,
    pub live_query_failures: u64,
    pub errors: u64,
    pub dropped_notifications: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_prometheus_text() {
        let collector = MetricsCollector::new();
        collector.increment(MetricType::TotalRequests);
        collector.increment(MetricType::TotalRequests);
        collector.increment(MetricType::DroppedNotifications);
        collector.observe_latency("rule", Duration::from_millis(3));

        let text = collector.get_prometheus_metrics();
        assert!(text.contains("campus_assistant_events_total{metric=\"total_requests\"} 2"));
        assert!(text.contains("metric=\"dropped_notifications\""));
        assert!(text.contains("campus_assistant_response_seconds_count{stage=\"rule\"} 1"));
    }

    #[test]
    fn collectors_do_not_share_registries() {
        let a = MetricsCollector::new();
        let b = MetricsCollector::new();
        a.increment(MetricType::Errors);

        assert_eq!(a.get(MetricType::Errors), 1);
        assert_eq!(b.get(MetricType::Errors), 0);
        assert!(!b.get_prometheus_metrics().contains("metric=\"errors\""));
    }

    #[test]
    fn health_reports_summary() {
        let collector = MetricsCollector::new();
        collector.increment(MetricType::LiveQueries);
        let health = collector.get_health_status();
        assert!(health.healthy);
        assert_eq!(health.metrics.live_queries, 1);
    }
}
