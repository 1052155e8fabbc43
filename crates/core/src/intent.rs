// crates/core/src/intent.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which part of an organization the caller asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityFocus {
    Overview,
    SubGroups,
    Achievements,
}

/// Questions answered from the persistence layer rather than static knowledge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum LiveQuery {
    EventsNow,
    UpcomingEvents { days: u32 },
    ActivePolls,
    MyProfile,
    MyIdeas,
    MyAchievements,
}

impl LiveQuery {
    pub fn label(&self) -> &'static str {
        match self {
            LiveQuery::EventsNow => "events_now",
            LiveQuery::UpcomingEvents { .. } => "upcoming_events",
            LiveQuery::ActivePolls => "active_polls",
            LiveQuery::MyProfile => "my_profile",
            LiveQuery::MyIdeas => "my_ideas",
            LiveQuery::MyAchievements => "my_achievements",
        }
    }
}

/// Resolved meaning of an utterance.
///
/// Parameterized variants carry the entity they refer to, so the responder
/// never has to pick an intent name apart again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Farewell,
    Thanks,
    Help,
    ListOrganizations,
    CouncilOverview,
    Rankings,
    LandmarkOverview,
    CampusLife,
    EventsOverview,
    Benefits,
    Admissions,
    Organization { id: String, focus: EntityFocus },
    SubGroup { organization_id: String, name: String },
    Landmark { id: String },
    Training { category: String, example: usize },
    Live { query: LiveQuery },
    Unknown,
}

impl Intent {
    pub fn organization(id: impl Into<String>, focus: EntityFocus) -> Self {
        Intent::Organization {
            id: id.into(),
            focus,
        }
    }

    pub fn live(query: LiveQuery) -> Self {
        Intent::Live { query }
    }

    /// Stable label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Farewell => "farewell",
            Intent::Thanks => "thanks",
            Intent::Help => "help",
            Intent::ListOrganizations => "list_organizations",
            Intent::CouncilOverview => "council_overview",
            Intent::Rankings => "rankings",
            Intent::LandmarkOverview => "landmark_overview",
            Intent::CampusLife => "campus_life",
            Intent::EventsOverview => "events_overview",
            Intent::Benefits => "benefits",
            Intent::Admissions => "admissions",
            Intent::Organization {
                focus: EntityFocus::Overview,
                ..
            } => "organization_info",
            Intent::Organization {
                focus: EntityFocus::SubGroups,
                ..
            } => "organization_verticals",
            Intent::Organization {
                focus: EntityFocus::Achievements,
                ..
            } => "organization_achievements",
            Intent::SubGroup { .. } => "vertical_info",
            Intent::Landmark { .. } => "spot_info",
            Intent::Training { .. } => "training",
            Intent::Live { query } => query.label(),
            Intent::Unknown => "unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Intent::Unknown)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Organization { id, .. } => write!(f, "{}({})", self.label(), id),
            Intent::SubGroup {
                organization_id,
                name,
            } => write!(f, "{}({}/{})", self.label(), organization_id, name),
            Intent::Landmark { id } => write!(f, "{}({})", self.label(), id),
            Intent::Training { category, example } => {
                write!(f, "{}({}#{})", self.label(), category, example)
            }
            Intent::Live {
                query: LiveQuery::UpcomingEvents { days },
            } => write!(f, "{}({}d)", self.label(), days),
            _ => f.write_str(self.label()),
        }
    }
}

/// Prediction returned by a statistical classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierResult {
    pub intent: Intent,
    pub confidence: f32,
}

impl ClassifierResult {
    /// A prediction is only trusted strictly above the threshold.
    pub fn is_trusted(&self, threshold: f32) -> bool {
        self.confidence > threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_distinguish_organization_focus() {
        assert_eq!(
            Intent::organization("vsc", EntityFocus::Achievements).label(),
            "organization_achievements"
        );
        assert_eq!(
            Intent::organization("vsc", EntityFocus::Overview).to_string(),
            "organization_info(vsc)"
        );
    }

    #[test]
    fn confidence_threshold_is_exclusive() {
        let result = ClassifierResult {
            intent: Intent::Greeting,
            confidence: 0.5,
        };
        assert!(!result.is_trusted(0.5));
        assert!(ClassifierResult {
            confidence: 0.51,
            ..result
        }
        .is_trusted(0.5));
    }

    #[test]
    fn intents_serialize_with_kind_tag() {
        let json = serde_json::to_value(Intent::live(LiveQuery::UpcomingEvents { days: 3 })).unwrap();
        assert_eq!(json["kind"], "live");
        assert_eq!(json["query"]["query"], "upcoming_events");
        assert_eq!(json["query"]["days"], 3);
    }
}
