// crates/nlu/src/external.rs

use std::time::Duration;

use async_trait::async_trait;
use campus_core::{CampusError, CampusResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const HEALTHY_STATUSES: &[&str] = &["ok", "healthy", "up"];

/// Optional upstream conversational service consulted before local resolution.
#[async_trait]
pub trait ConversationalService: Send + Sync {
    fn is_available(&self) -> bool;
    async fn process(&self, message: &str, user_id: &str) -> CampusResult<String>;
    fn name(&self) -> &str;
}

#[derive(Debug, Clone)]
pub struct ExternalNluConfig {
    pub base_url: String,
    pub health_path: String,
    pub process_path: String,
    pub probe_timeout: Duration,
    pub call_timeout: Duration,
}

impl Default for ExternalNluConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5005".to_string(),
            health_path: "/health".to_string(),
            process_path: "/chat".to_string(),
            probe_timeout: Duration::from_millis(2000),
            call_timeout: Duration::from_millis(5000),
        }
    }
}

#[derive(Debug, Serialize)]
struct ProcessRequest<'a> {
    message: &'a str,
    user_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProcessResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    #[serde(default)]
    status: String,
}

/// HTTP client for the external service. Availability is probed once, at
/// construction, and never re-checked.
pub struct ExternalNluClient {
    config: ExternalNluConfig,
    client: Client,
    available: bool,
}

impl ExternalNluClient {
    pub async fn connect(config: ExternalNluConfig) -> CampusResult<Self> {
        let client = Client::builder()
            .timeout(config.call_timeout)
            .build()
            .map_err(|e| CampusError::ExternalNlu(e.to_string()))?;

        let available = match probe(&client, &config).await {
            Ok(()) => {
                info!("External NLU service available at {}", config.base_url);
                true
            }
            Err(e) => {
                warn!("External NLU service unavailable: {}", e);
                false
            }
        };

        Ok(Self {
            config,
            client,
            available,
        })
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.config.base_url, path)
    }
}

async fn probe(client: &Client, config: &ExternalNluConfig) -> CampusResult<()> {
    let response = client
        .get(join_url(&config.base_url, &config.health_path))
        .timeout(config.probe_timeout)
        .send()
        .await
        .map_err(|e| CampusError::Network(format!("health probe failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(CampusError::ExternalNlu(format!(
            "health probe returned {}",
            response.status()
        )));
    }

    let health: HealthResponse = response
        .json()
        .await
        .map_err(|e| CampusError::ExternalNlu(format!("invalid health payload: {}", e)))?;

    let status = health.status.to_lowercase();
    if HEALTHY_STATUSES.contains(&status.as_str()) {
        Ok(())
    } else {
        Err(CampusError::ExternalNlu(format!(
            "service reported status '{}'",
            health.status
        )))
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[async_trait]
impl ConversationalService for ExternalNluClient {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn process(&self, message: &str, user_id: &str) -> CampusResult<String> {
        let response = self
            .client
            .post(self.url(&self.config.process_path))
            .json(&ProcessRequest { message, user_id })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CampusError::Timeout(format!("external NLU call: {}", e))
                } else {
                    CampusError::Network(format!("external NLU call failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            return Err(CampusError::ExternalNlu(format!(
                "external NLU returned {}",
                response.status()
            )));
        }

        let body: ProcessResponse = response
            .json()
            .await
            .map_err(|e| CampusError::ExternalNlu(format!("invalid response payload: {}", e)))?;

        if body.response.trim().is_empty() {
            return Err(CampusError::ExternalNlu("empty response".to_string()));
        }

        debug!("External NLU answered for {}", user_id);
        Ok(body.response)
    }

    fn name(&self) -> &str {
        "ExternalNluClient"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn config(base_url: String) -> ExternalNluConfig {
        ExternalNluConfig {
            base_url,
            probe_timeout: Duration::from_millis(500),
            call_timeout: Duration::from_millis(1000),
            ..ExternalNluConfig::default()
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_unavailable() {
        // port 9 (discard) is closed on test machines
        let client = ExternalNluClient::connect(config("http://127.0.0.1:9".to_string()))
            .await
            .unwrap();
        assert!(!client.is_available());
    }

    #[tokio::test]
    async fn relays_the_response_field() {
        let router = Router::new()
            .route("/health", get(|| async { Json(json!({"status": "ok"})) }))
            .route(
                "/chat",
                post(|Json(body): Json<Value>| async move {
                    Json(json!({
                        "response": format!(
                            "echo {} for {}",
                            body["message"].as_str().unwrap_or_default(),
                            body["user_id"].as_str().unwrap_or_default()
                        )
                    }))
                }),
            );
        let base = spawn(router).await;

        let client = ExternalNluClient::connect(config(base)).await.unwrap();
        assert!(client.is_available());

        let reply = client.process("hello", "u1").await.unwrap();
        assert_eq!(reply, "echo hello for u1");
    }

    #[tokio::test]
    async fn unhealthy_status_is_unavailable() {
        let router =
            Router::new().route("/health", get(|| async { Json(json!({"status": "degraded"})) }));
        let base = spawn(router).await;

        let client = ExternalNluClient::connect(config(base)).await.unwrap();
        assert!(!client.is_available());
    }

    #[tokio::test]
    async fn malformed_reply_is_an_error() {
        let router = Router::new()
            .route("/health", get(|| async { Json(json!({"status": "UP"})) }))
            .route("/chat", post(|| async { Json(json!({"text": "wrong field"})) }));
        let base = spawn(router).await;

        let client = ExternalNluClient::connect(config(base)).await.unwrap();
        assert!(client.is_available());
        assert!(matches!(
            client.process("hi", "u1").await,
            Err(CampusError::ExternalNlu(_))
        ));
    }

    #[test]
    fn urls_join_without_double_slashes() {
        assert_eq!(join_url("http://x/", "/chat"), "http://x/chat");
        assert_eq!(join_url("http://x", "health"), "http://x/health");
    }
}
