// crates/api/src/lib.rs

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use campus_core::{CampusError, CampusResult, ChatMessage};
use campus_engine::Engine;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

pub mod handlers;

use handlers::ApiHandlers;

const ANONYMOUS_CALLER: &str = "anonymous";

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub cors_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_enabled: true,
        }
    }
}

/// API server
pub struct ApiServer {
    config: ApiConfig,
    handlers: Arc<ApiHandlers>,
}

impl ApiServer {
    pub fn new(config: ApiConfig, engine: Arc<Engine>) -> Self {
        Self {
            config,
            handlers: Arc::new(ApiHandlers::new(engine)),
        }
    }

    pub async fn serve(self) -> CampusResult<()> {
        self.serve_until(std::future::pending()).await
    }

    /// Serves until `shutdown` resolves, then drains in-flight requests.
    pub async fn serve_until<F>(self, shutdown: F) -> CampusResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.create_router();
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| CampusError::Network(format!("Failed to bind {}: {}", addr, e)))?;

        info!("API server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| CampusError::Network(e.to_string()))?;

        Ok(())
    }

    pub fn create_router(&self) -> Router {
        let mut app = Router::new()
            .route("/health", get(health_check))
            .route("/metrics", get(metrics_handler))
            .route("/chat", post(chat_handler))
            .route("/history/:user_id", get(history_handler))
            .with_state(self.handlers.clone());

        if self.config.cors_enabled {
            app = app.layer(CorsLayer::permissive());
        }

        app
    }
}

// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now()
    }))
}

// Metrics endpoint
async fn metrics_handler(State(handlers): State<Arc<ApiHandlers>>) -> impl IntoResponse {
    handlers.get_metrics().await
}

// Chat endpoint; same shape the external NLU client speaks
async fn chat_handler(
    State(handlers): State<Arc<ApiHandlers>>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    Json(handlers.chat(request).await)
}

async fn history_handler(
    State(handlers): State<Arc<ApiHandlers>>,
    Path(user_id): Path<String>,
) -> Json<HistoryResponse> {
    Json(handlers.history(&user_id))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default = "anonymous")]
    pub user_id: String,
}

fn anonymous() -> String {
    ANONYMOUS_CALLER.to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub user_id: String,
    pub messages: Vec<ChatMessage>,
}
