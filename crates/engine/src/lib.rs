// crates/engine/src/lib.rs

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use campus_buffering::DEFAULT_MAX_HISTORY;
use campus_core::ChatMessage;
use campus_live_data::LiveDataBridge;
use campus_nlu::{ConversationalService, IntentResolver, ResolutionSource};
use campus_observability::{MetricType, MetricsCollector};
use campus_responder::{Rendition, Responder};
use chrono::Utc;
use futures::FutureExt;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

pub mod events;
pub mod reply;
pub mod session;

pub use events::EngineEvent;
pub use reply::{DegradeReason, Outcome, Reply};
pub use session::{Session, SessionRegistry};

pub const APOLOGY: &str =
    "Sorry, something went wrong while answering that. Please try again in a moment.";

const DEFAULT_EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub max_history: usize,
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Turns caller text into a reply.
///
/// Shared behind `Arc`; the knowledge base, resolver and responder are
/// immutable, and the only mutable state lives in per-caller sessions.
pub struct Engine {
    resolver: Arc<IntentResolver>,
    responder: Responder,
    bridge: LiveDataBridge,
    external: Option<Arc<dyn ConversationalService>>,
    sessions: SessionRegistry,
    metrics: Arc<MetricsCollector>,
    events: broadcast::Sender<EngineEvent>,
}

impl Engine {
    pub fn new(
        resolver: Arc<IntentResolver>,
        bridge: LiveDataBridge,
        metrics: Arc<MetricsCollector>,
        config: EngineConfig,
    ) -> Self {
        let responder = Responder::new(resolver.knowledge().clone());
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            resolver,
            responder,
            bridge,
            external: None,
            sessions: SessionRegistry::new(config.max_history),
            metrics,
            events,
        }
    }

    pub fn with_external(mut self, service: Arc<dyn ConversationalService>) -> Self {
        info!(
            "External NLU {} attached (available: {})",
            service.name(),
            service.is_available()
        );
        self.external = Some(service);
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn metrics(&self) -> &Arc<MetricsCollector> {
        &self.metrics
    }

    pub fn history(&self, caller_id: &str) -> Vec<ChatMessage> {
        self.sessions
            .get(caller_id)
            .map(|session| session.history().snapshot())
            .unwrap_or_default()
    }

    pub fn cleanup_idle(&self, max_idle: Duration) -> usize {
        let removed = self.sessions.cleanup_idle(max_idle);
        if removed > 0 {
            info!("Closed {} idle sessions", removed);
        }
        removed
    }

    /// Plain-text entry point for transports.
    pub async fn respond(&self, text: &str, caller_id: &str) -> String {
        let session = self.sessions.get_or_create(caller_id);
        self.respond_in(&session, text, caller_id).await.text
    }

    /// Never fails: errors and panics inside the pipeline become an apology
    /// with a `Failed` outcome, and the exchange is still recorded.
    pub async fn respond_in(&self, session: &Session, text: &str, caller_id: &str) -> Reply {
        session.touch();
        session.history().append(ChatMessage::inbound(caller_id, text));
        self.metrics.increment(MetricType::TotalRequests);

        let started = Instant::now();
        let reply = match AssertUnwindSafe(self.answer(text, caller_id))
            .catch_unwind()
            .await
        {
            Ok(reply) => reply,
            Err(panic) => {
                let error = panic_message(panic.as_ref());
                error!("Pipeline panicked for {}: {}", caller_id, error);
                self.metrics.increment(MetricType::Errors);
                Reply {
                    text: APOLOGY.to_string(),
                    intent: None,
                    outcome: Outcome::Failed { error },
                }
            }
        };

        self.metrics
            .observe_latency(reply.outcome.label(), started.elapsed());
        session
            .history()
            .append(ChatMessage::outbound(reply.text.clone()));

        self.emit(EngineEvent::Replied {
            session_id: session.id(),
            caller_id: caller_id.to_string(),
            intent: reply.intent.clone(),
            outcome: reply.outcome.clone(),
            at: Utc::now(),
        });

        reply
    }

    async fn answer(&self, text: &str, caller_id: &str) -> Reply {
        if let Some(external) = self.external.as_ref().filter(|s| s.is_available()) {
            match external.process(text, caller_id).await {
                Ok(response) => {
                    debug!("{} answered for {}", external.name(), caller_id);
                    self.metrics.increment(MetricType::ExternalNluAnswers);
                    return Reply {
                        text: response,
                        intent: None,
                        outcome: Outcome::Resolved {
                            source: ResolutionSource::External,
                        },
                    };
                }
                Err(e) => {
                    warn!("{} failed, resolving locally: {}", external.name(), e);
                    self.emit(EngineEvent::ExternalNluFailed {
                        caller_id: caller_id.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let resolution = self.resolver.resolve(text);
        self.count_resolution(&resolution.source);
        debug!(
            "Resolved '{}' to {} via {}",
            text,
            resolution.intent,
            resolution.source.label()
        );

        match self.responder.render(&resolution.intent) {
            Rendition::Text(text) => {
                let outcome = if resolution.intent.is_unknown() {
                    self.metrics.increment(MetricType::UnknownIntents);
                    Outcome::Degraded {
                        reason: DegradeReason::Unresolved,
                    }
                } else {
                    Outcome::Resolved {
                        source: resolution.source,
                    }
                };
                Reply {
                    text,
                    intent: Some(resolution.intent),
                    outcome,
                }
            }
            Rendition::Live(query) => {
                self.metrics.increment(MetricType::LiveQueries);
                let answer = self.bridge.handle(query, caller_id).await;
                let outcome = match answer.failure {
                    Some(error) => {
                        self.metrics.increment(MetricType::LiveQueryFailures);
                        self.emit(EngineEvent::LiveQueryFailed {
                            caller_id: caller_id.to_string(),
                            query,
                            error: error.clone(),
                        });
                        Outcome::Degraded {
                            reason: DegradeReason::LiveQueryFailed { query, error },
                        }
                    }
                    None => Outcome::Resolved {
                        source: resolution.source,
                    },
                };
                Reply {
                    text: answer.text,
                    intent: Some(resolution.intent),
                    outcome,
                }
            }
        }
    }

    fn count_resolution(&self, source: &ResolutionSource) {
        let metric = match source {
            ResolutionSource::Classifier { .. } => MetricType::ClassifierHits,
            ResolutionSource::Rule { .. } => MetricType::RuleHits,
            ResolutionSource::Fuzzy { .. } => MetricType::FuzzyHits,
            ResolutionSource::External | ResolutionSource::Default => return,
        };
        self.metrics.increment(metric);
    }

    fn emit(&self, event: EngineEvent) {
        if self.events.send(event).is_err() {
            self.metrics.increment(MetricType::DroppedNotifications);
            debug!("Engine event dropped: no subscribers");
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
