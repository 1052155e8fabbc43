// crates/core/src/message.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "snake_case")]
pub enum Sender {
    Caller(String),
    Engine,
}

/// One side of an exchange, as kept in the history buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: uuid::Uuid,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub sender: Sender,
}

impl ChatMessage {
    pub fn inbound(caller_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(Sender::Caller(caller_id.into()), text)
    }

    pub fn outbound(text: impl Into<String>) -> Self {
        Self::new(Sender::Engine, text)
    }

    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            text: text.into(),
            timestamp: Utc::now(),
            sender,
        }
    }

    pub fn is_from_engine(&self) -> bool {
        matches!(self.sender, Sender::Engine)
    }
}
