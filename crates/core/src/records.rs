// crates/core/src/records.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub venue: Option<String>,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub registration_open: bool,
}

impl EventRecord {
    /// Active, already started, and either still running or open-ended.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.active && self.starts_at <= now && self.ends_at.map_or(true, |end| end >= now)
    }

    pub fn starts_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        self.active && self.starts_at >= from && self.starts_at <= to
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollRecord {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub ends_at: DateTime<Utc>,
}

impl PollRecord {
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.ends_at >= now
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub caller_id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub year: Option<u8>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Idea or achievement submitted by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: String,
    pub caller_id: String,
    pub title: String,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}
