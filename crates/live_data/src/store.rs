// crates/live_data/src/store.rs

use async_trait::async_trait;
use campus_core::{CampusResult, EventRecord, PollRecord, ProfileRecord, SubmissionRecord};
use chrono::{DateTime, Utc};

/// Read contracts of the persistence layer.
///
/// Collections come back ordered: events and polls chronologically,
/// submissions newest first.
#[async_trait]
pub trait LiveDataStore: Send + Sync {
    /// Active events whose time window intersects `[from, to]`.
    async fn events_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> CampusResult<Vec<EventRecord>>;

    /// Active events starting within `[from, to]`.
    async fn events_starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> CampusResult<Vec<EventRecord>>;

    async fn open_polls(&self, now: DateTime<Utc>) -> CampusResult<Vec<PollRecord>>;

    async fn profile(&self, caller_id: &str) -> CampusResult<Option<ProfileRecord>>;

    async fn ideas_by(&self, caller_id: &str) -> CampusResult<Vec<SubmissionRecord>>;

    async fn achievements_by(&self, caller_id: &str) -> CampusResult<Vec<SubmissionRecord>>;

    fn name(&self) -> &str;
}
