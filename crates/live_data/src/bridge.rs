// crates/live_data/src/bridge.rs

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use campus_core::{
    CampusError, CampusResult, EventRecord, LiveQuery, PollRecord, ProfileRecord,
    SubmissionRecord,
};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::store::LiveDataStore;

pub const NO_ACTIVE_EVENTS: &str = "No active events at the moment.";
const NO_OPEN_POLLS: &str = "No active polls right now.";
const NO_PROFILE: &str =
    "I couldn't find a profile for you. Complete your profile on the student portal first.";
const NO_IDEAS: &str = "You haven't submitted any ideas yet.";
const NO_ACHIEVEMENTS: &str = "You haven't submitted any achievements yet.";

const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_millis(3000);
const TIME_FORMAT: &str = "%d %b %Y, %H:%M";

/// Text produced by a live handler, plus the failure that forced an apology.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveAnswer {
    pub query: LiveQuery,
    pub text: String,
    pub failure: Option<String>,
}

impl LiveAnswer {
    fn answered(query: LiveQuery, text: impl Into<String>) -> Self {
        Self {
            query,
            text: text.into(),
            failure: None,
        }
    }

    fn apology(query: LiveQuery, error: &CampusError) -> Self {
        Self {
            query,
            text: apology_for(query).to_string(),
            failure: Some(error.to_string()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

fn apology_for(query: LiveQuery) -> &'static str {
    match query {
        LiveQuery::EventsNow => {
            "Sorry, I couldn't fetch the events happening right now. Please try again in a moment."
        }
        LiveQuery::UpcomingEvents { .. } => {
            "Sorry, I couldn't fetch upcoming events right now. Please try again in a moment."
        }
        LiveQuery::ActivePolls => {
            "Sorry, I couldn't fetch the active polls right now. Please try again in a moment."
        }
        LiveQuery::MyProfile => {
            "Sorry, I couldn't load your profile right now. Please try again in a moment."
        }
        LiveQuery::MyIdeas => {
            "Sorry, I couldn't load your submitted ideas right now. Please try again in a moment."
        }
        LiveQuery::MyAchievements => {
            "Sorry, I couldn't load your submitted achievements right now. Please try again in a moment."
        }
    }
}

/// Answers live queries with exactly one store read each, bounded by a
/// timeout. Store failures never escape; they turn into apologies.
pub struct LiveDataBridge {
    store: Arc<dyn LiveDataStore>,
    query_timeout: Duration,
}

impl LiveDataBridge {
    pub fn new(store: Arc<dyn LiveDataStore>) -> Self {
        Self::with_timeout(store, DEFAULT_QUERY_TIMEOUT)
    }

    pub fn with_timeout(store: Arc<dyn LiveDataStore>, query_timeout: Duration) -> Self {
        Self {
            store,
            query_timeout,
        }
    }

    pub fn store(&self) -> &Arc<dyn LiveDataStore> {
        &self.store
    }

    pub async fn handle(&self, query: LiveQuery, caller_id: &str) -> LiveAnswer {
        self.handle_at(query, caller_id, Utc::now()).await
    }

    pub async fn handle_at(
        &self,
        query: LiveQuery,
        caller_id: &str,
        now: DateTime<Utc>,
    ) -> LiveAnswer {
        let result = match query {
            LiveQuery::EventsNow => self.events_now(now).await,
            LiveQuery::UpcomingEvents { days } => self.upcoming_events(days, now).await,
            LiveQuery::ActivePolls => self.active_polls(now).await,
            LiveQuery::MyProfile => self.my_profile(caller_id).await,
            LiveQuery::MyIdeas => self.my_ideas(caller_id).await,
            LiveQuery::MyAchievements => self.my_achievements(caller_id).await,
        };

        match result {
            Ok(text) => {
                debug!("Live query {} answered for {}", query.label(), caller_id);
                LiveAnswer::answered(query, text)
            }
            Err(e) => {
                warn!(
                    "Live query {} failed on {}: {}",
                    query.label(),
                    self.store.name(),
                    e
                );
                LiveAnswer::apology(query, &e)
            }
        }
    }

    async fn read<T, F>(&self, what: &str, fut: F) -> CampusResult<T>
    where
        F: Future<Output = CampusResult<T>>,
    {
        tokio::time::timeout(self.query_timeout, fut)
            .await
            .map_err(|_| {
                CampusError::Timeout(format!(
                    "{} read exceeded {}ms",
                    what,
                    self.query_timeout.as_millis()
                ))
            })?
    }

    pub async fn events_now(&self, now: DateTime<Utc>) -> CampusResult<String> {
        let mut events = self
            .read("events_now", self.store.events_between(now, now))
            .await?;
        events.retain(|e| e.is_live_at(now));

        if events.is_empty() {
            return Ok(NO_ACTIVE_EVENTS.to_string());
        }
        Ok(format!(
            "Events happening right now:\n\n{}",
            numbered(&events, format_live_event)
        ))
    }

    pub async fn upcoming_events(&self, days: u32, now: DateTime<Utc>) -> CampusResult<String> {
        let until = chrono::Duration::try_days(i64::from(days))
            .and_then(|window| now.checked_add_signed(window))
            .ok_or_else(|| {
                CampusError::Unknown(format!("upcoming window of {} days is out of range", days))
            })?;
        let mut events = self
            .read("upcoming_events", self.store.events_starting_between(now, until))
            .await?;
        events.retain(|e| e.starts_between(now, until));

        if events.is_empty() {
            return Ok(format!("No upcoming events in the next {} days.", days));
        }
        Ok(format!(
            "Upcoming events in the next {} days:\n\n{}",
            days,
            numbered(&events, format_upcoming_event)
        ))
    }

    pub async fn active_polls(&self, now: DateTime<Utc>) -> CampusResult<String> {
        let polls = self.read("active_polls", self.store.open_polls(now)).await?;
        if polls.is_empty() {
            return Ok(NO_OPEN_POLLS.to_string());
        }
        Ok(format!(
            "Active polls:\n\n{}",
            numbered(&polls, format_poll)
        ))
    }

    pub async fn my_profile(&self, caller_id: &str) -> CampusResult<String> {
        let profile = self.read("my_profile", self.store.profile(caller_id)).await?;
        Ok(match profile {
            Some(profile) => format_profile(&profile),
            None => NO_PROFILE.to_string(),
        })
    }

    pub async fn my_ideas(&self, caller_id: &str) -> CampusResult<String> {
        let ideas = self.read("my_ideas", self.store.ideas_by(caller_id)).await?;
        if ideas.is_empty() {
            return Ok(NO_IDEAS.to_string());
        }
        Ok(format!(
            "Your submitted ideas:\n\n{}",
            numbered(&ideas, format_submission)
        ))
    }

    pub async fn my_achievements(&self, caller_id: &str) -> CampusResult<String> {
        let achievements = self
            .read("my_achievements", self.store.achievements_by(caller_id))
            .await?;
        if achievements.is_empty() {
            return Ok(NO_ACHIEVEMENTS.to_string());
        }
        Ok(format!(
            "Your submitted achievements:\n\n{}",
            numbered(&achievements, format_submission)
        ))
    }
}

fn numbered<T>(items: &[T], line: impl Fn(&T) -> String) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, line(item)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_live_event(event: &EventRecord) -> String {
    let mut line = format!("**{}**", event.name);
    if let Some(venue) = &event.venue {
        line.push_str(&format!(" at {}", venue));
    }
    match event.ends_at {
        Some(end) => line.push_str(&format!(" (until {})", end.format(TIME_FORMAT))),
        None => line.push_str(" (ongoing)"),
    }
    line
}

fn format_upcoming_event(event: &EventRecord) -> String {
    let mut line = format!("**{}** on {}", event.name, event.starts_at.format(TIME_FORMAT));
    if let Some(venue) = &event.venue {
        line.push_str(&format!(" at {}", venue));
    }
    if event.registration_open {
        line.push_str(" (registrations open)");
    }
    line
}

fn format_poll(poll: &PollRecord) -> String {
    let mut line = format!("{} (closes {})", poll.question, poll.ends_at.format(TIME_FORMAT));
    if !poll.options.is_empty() {
        line.push_str(&format!("\n   Options: {}", poll.options.join(", ")));
    }
    line
}

fn format_submission(submission: &SubmissionRecord) -> String {
    format!(
        "{} [{}] submitted {}",
        submission.title,
        submission.status,
        submission.submitted_at.format("%d %b %Y")
    )
}

fn format_profile(profile: &ProfileRecord) -> String {
    let mut text = format!("You are registered as **{}**", profile.name);
    if let Some(department) = &profile.department {
        text.push_str(&format!(" from the {} department", department));
    }
    if let Some(year) = profile.year {
        text.push_str(&format!(", year {}", year));
    }
    text.push('.');
    if let Some(email) = &profile.email {
        text.push_str(&format!(" Your contact email is {}.", email));
    }
    if !profile.roles.is_empty() {
        text.push_str(&format!(" Roles: {}.", profile.roles.join(", ")));
    }
    text
}
