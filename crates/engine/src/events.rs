// crates/engine/src/events.rs

use campus_core::{Intent, LiveQuery};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::reply::Outcome;

/// Notifications published on the engine's broadcast channel.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    Replied {
        session_id: Uuid,
        caller_id: String,
        intent: Option<Intent>,
        outcome: Outcome,
        at: DateTime<Utc>,
    },
    ExternalNluFailed {
        caller_id: String,
        error: String,
    },
    LiveQueryFailed {
        caller_id: String,
        query: LiveQuery,
        error: String,
    },
}

impl EngineEvent {
    pub fn caller_id(&self) -> &str {
        match self {
            EngineEvent::Replied { caller_id, .. }
            | EngineEvent::ExternalNluFailed { caller_id, .. }
            | EngineEvent::LiveQueryFailed { caller_id, .. } => caller_id,
        }
    }
}
