// crates/engine/src/reply.rs

use campus_core::{Intent, LiveQuery};
use campus_nlu::ResolutionSource;
use serde::Serialize;

/// Why an answer came from a fallback path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DegradeReason {
    /// No stage of the chain recognized the input; the help menu was shown.
    Unresolved,
    LiveQueryFailed { query: LiveQuery, error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Resolved { source: ResolutionSource },
    Degraded { reason: DegradeReason },
    Failed { error: String },
}

impl Outcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Outcome::Resolved { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Resolved { .. } => "resolved",
            Outcome::Degraded { .. } => "degraded",
            Outcome::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub text: String,
    /// `None` when the external service answered or the pipeline failed.
    pub intent: Option<Intent>,
    pub outcome: Outcome,
}
