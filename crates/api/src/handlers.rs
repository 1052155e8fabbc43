// crates/api/src/handlers.rs

use campus_core::ChatMessage;
use campus_engine::Engine;
use std::sync::Arc;
use tracing::debug;

use crate::{ChatRequest, ChatResponse, HistoryResponse};

/// Glue between the routes and the shared engine.
pub struct ApiHandlers {
    engine: Arc<Engine>,
}

impl ApiHandlers {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    pub async fn chat(&self, request: ChatRequest) -> ChatResponse {
        debug!("Chat request from {}", request.user_id);
        let response = self.engine.respond(&request.message, &request.user_id).await;
        ChatResponse { response }
    }

    pub fn history(&self, user_id: &str) -> HistoryResponse {
        let messages: Vec<ChatMessage> = self.engine.history(user_id);
        HistoryResponse {
            user_id: user_id.to_string(),
            messages,
        }
    }

    pub async fn get_metrics(&self) -> String {
        self.engine.metrics().get_prometheus_metrics()
    }
}
