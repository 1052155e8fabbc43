// src/app.rs
use std::sync::Arc;
use std::time::Duration;

use campus_api::{ApiConfig, ApiServer};
use campus_config::AppConfig;
use campus_core::CampusResult;
use campus_engine::{Engine, EngineConfig, EngineEvent};
use campus_knowledge::KnowledgeBase;
use campus_live_data::{InMemoryStore, LiveDataBridge, LiveDataStore};
use campus_nlu::{ExternalNluClient, ExternalNluConfig, IntentResolver, ResolverConfig};
use campus_observability::MetricsCollector;
use tokio::signal;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Everything the binary needs, wired from one `AppConfig`.
pub struct CampusApp {
    config: AppConfig,
    engine: Arc<Engine>,
    metrics: Arc<MetricsCollector>,
}

impl CampusApp {
    pub async fn new(config: AppConfig) -> CampusResult<Self> {
        info!("Initializing campus assistant components...");

        let knowledge = Arc::new(KnowledgeBase::load_or_embedded(
            config.knowledge.path.as_deref(),
        )?);

        let resolver = Arc::new(IntentResolver::bootstrap(
            knowledge,
            ResolverConfig {
                classifier_threshold: config.engine.classifier_threshold,
                classifier_enabled: config.engine.classifier_enabled,
                upcoming_days: config.live.upcoming_days,
            },
        ));

        let store: Arc<dyn LiveDataStore> = match &config.live.fixtures {
            Some(path) => Arc::new(InMemoryStore::from_fixture_file(path)?),
            None => {
                warn!("No live fixtures configured; live queries will find nothing");
                Arc::new(InMemoryStore::new())
            }
        };
        let bridge = LiveDataBridge::with_timeout(
            store,
            Duration::from_millis(config.live.query_timeout_ms),
        );

        let metrics = Arc::new(MetricsCollector::new());
        let mut engine = Engine::new(
            resolver,
            bridge,
            metrics.clone(),
            EngineConfig {
                max_history: config.engine.max_history,
                ..EngineConfig::default()
            },
        );

        if config.external_nlu.enabled {
            let external = &config.external_nlu;
            let client = ExternalNluClient::connect(ExternalNluConfig {
                base_url: external.base_url.clone(),
                health_path: external.health_path.clone(),
                process_path: external.process_path.clone(),
                probe_timeout: Duration::from_millis(external.probe_timeout_ms),
                call_timeout: Duration::from_millis(external.call_timeout_ms),
            })
            .await?;
            engine = engine.with_external(Arc::new(client));
        }

        Ok(Self {
            config,
            engine: Arc::new(engine),
            metrics,
        })
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    pub fn metrics(&self) -> &Arc<MetricsCollector> {
        &self.metrics
    }

    /// Serves HTTP until ctrl-c.
    pub async fn run(self) -> CampusResult<()> {
        info!("Starting campus assistant...");

        let sweeper = self.spawn_session_sweeper();
        let listener = self.spawn_event_log();

        let server = ApiServer::new(
            ApiConfig {
                host: self.config.api.host.clone(),
                port: self.config.api.port,
                cors_enabled: self.config.api.cors_enabled,
            },
            self.engine.clone(),
        );
        let result = server.serve_until(wait_for_shutdown()).await;

        sweeper.abort();
        listener.abort();
        result
    }

    fn spawn_session_sweeper(&self) -> JoinHandle<()> {
        let engine = self.engine.clone();
        let max_idle = Duration::from_secs(self.config.api.session_idle_s);
        let period = max_idle.clamp(Duration::from_secs(1), MAX_SWEEP_INTERVAL);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                engine.cleanup_idle(max_idle);
            }
        })
    }

    fn spawn_event_log(&self) -> JoinHandle<()> {
        let mut events = self.engine.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(EngineEvent::Replied {
                        caller_id, outcome, ..
                    }) => debug!("Replied to {} ({})", caller_id, outcome.label()),
                    Ok(event) => warn!("Engine event for {}: {:?}", event.caller_id(), event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Event log fell behind; skipped {} events", skipped)
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

async fn wait_for_shutdown() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_config_builds_a_working_engine() {
        let app = CampusApp::new(AppConfig::default()).await.unwrap();
        let answer = app.engine().respond("list all organizations", "boot").await;
        assert!(answer.contains("VSC"));
        assert_eq!(app.engine().history("boot").len(), 2);
    }

    #[tokio::test]
    async fn missing_fixture_file_fails_startup() {
        let mut config = AppConfig::default();
        config.live.fixtures = Some("/definitely/not/here.json".into());
        assert!(CampusApp::new(config).await.is_err());
    }
}
