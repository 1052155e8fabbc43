// crates/live_data/src/memory.rs

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use campus_core::{
    CampusError, CampusResult, EventRecord, PollRecord, ProfileRecord, SubmissionRecord,
};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::store::LiveDataStore;

/// Seed document for [`InMemoryStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiveFixtures {
    #[serde(default)]
    pub events: Vec<EventRecord>,
    #[serde(default)]
    pub polls: Vec<PollRecord>,
    #[serde(default)]
    pub profiles: Vec<ProfileRecord>,
    #[serde(default)]
    pub ideas: Vec<SubmissionRecord>,
    #[serde(default)]
    pub achievements: Vec<SubmissionRecord>,
}

impl LiveFixtures {
    pub fn load(path: &Path) -> CampusResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CampusError::Store(format!("Failed to read fixtures {}: {}", path.display(), e))
        })?;
        let fixtures: LiveFixtures = serde_json::from_str(&contents)?;
        info!(
            "Loaded live fixtures from {} ({} events, {} polls, {} profiles)",
            path.display(),
            fixtures.events.len(),
            fixtures.polls.len(),
            fixtures.profiles.len()
        );
        Ok(fixtures)
    }
}

/// Thread-safe store backed by plain vectors.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<LiveFixtures>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixtures(fixtures: LiveFixtures) -> Self {
        Self {
            data: RwLock::new(fixtures),
        }
    }

    pub fn from_fixture_file(path: &Path) -> CampusResult<Self> {
        LiveFixtures::load(path).map(Self::from_fixtures)
    }

    pub fn add_event(&self, event: EventRecord) {
        self.data.write().events.push(event);
    }

    pub fn add_poll(&self, poll: PollRecord) {
        self.data.write().polls.push(poll);
    }

    /// Replaces any existing profile for the same caller.
    pub fn upsert_profile(&self, profile: ProfileRecord) {
        let mut data = self.data.write();
        data.profiles.retain(|p| p.caller_id != profile.caller_id);
        data.profiles.push(profile);
    }

    pub fn add_idea(&self, idea: SubmissionRecord) {
        self.data.write().ideas.push(idea);
    }

    pub fn add_achievement(&self, achievement: SubmissionRecord) {
        self.data.write().achievements.push(achievement);
    }

    pub fn snapshot(&self) -> LiveFixtures {
        self.data.read().clone()
    }
}

fn by_caller(records: &[SubmissionRecord], caller_id: &str) -> Vec<SubmissionRecord> {
    let mut found: Vec<_> = records
        .iter()
        .filter(|r| r.caller_id == caller_id)
        .cloned()
        .collect();
    found.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    found
}

#[async_trait]
impl LiveDataStore for InMemoryStore {
    async fn events_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> CampusResult<Vec<EventRecord>> {
        let mut events: Vec<_> = self
            .data
            .read()
            .events
            .iter()
            .filter(|e| e.active && e.starts_at <= to && e.ends_at.map_or(true, |end| end >= from))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.starts_at);
        Ok(events)
    }

    async fn events_starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> CampusResult<Vec<EventRecord>> {
        let mut events: Vec<_> = self
            .data
            .read()
            .events
            .iter()
            .filter(|e| e.starts_between(from, to))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.starts_at);
        Ok(events)
    }

    async fn open_polls(&self, now: DateTime<Utc>) -> CampusResult<Vec<PollRecord>> {
        let mut polls: Vec<_> = self
            .data
            .read()
            .polls
            .iter()
            .filter(|p| p.is_open_at(now))
            .cloned()
            .collect();
        polls.sort_by_key(|p| p.ends_at);
        Ok(polls)
    }

    async fn profile(&self, caller_id: &str) -> CampusResult<Option<ProfileRecord>> {
        Ok(self
            .data
            .read()
            .profiles
            .iter()
            .find(|p| p.caller_id == caller_id)
            .cloned())
    }

    async fn ideas_by(&self, caller_id: &str) -> CampusResult<Vec<SubmissionRecord>> {
        Ok(by_caller(&self.data.read().ideas, caller_id))
    }

    async fn achievements_by(&self, caller_id: &str) -> CampusResult<Vec<SubmissionRecord>> {
        Ok(by_caller(&self.data.read().achievements, caller_id))
    }

    fn name(&self) -> &str {
        "InMemoryStore"
    }
}
