// crates/knowledge/src/model.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Council {
    pub name: String,
    pub short_name: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// A "vertical" inside an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubGroup {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub activities: Vec<NamedItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub description: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub sub_groups: Vec<SubGroup>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Landmark {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub highlights: Vec<NamedItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ranking {
    pub agency: String,
    pub result: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletGroup {
    pub title: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admissions {
    pub summary: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub contact: Option<String>,
}

/// Curated question/answer pair shared by the classifier corpus and the
/// fuzzy matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingExample {
    pub question: String,
    pub answer: String,
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub follow_ups: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub university: String,
    pub council: Council,
    #[serde(default)]
    pub organizations: Vec<Organization>,
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
    #[serde(default)]
    pub rankings: Vec<Ranking>,
    #[serde(default)]
    pub benefits: Vec<BulletGroup>,
    #[serde(default)]
    pub campus_life: Vec<BulletGroup>,
    #[serde(default)]
    pub flagship_events: Vec<NamedItem>,
    pub admissions: Admissions,
    #[serde(default)]
    pub training: Vec<TrainingExample>,
}

impl KnowledgeBase {
    pub fn organization(&self, id: &str) -> Option<&Organization> {
        self.organizations.iter().find(|org| org.id == id)
    }

    pub fn landmark(&self, id: &str) -> Option<&Landmark> {
        self.landmarks.iter().find(|spot| spot.id == id)
    }

    pub fn sub_group(&self, organization_id: &str, name: &str) -> Option<(&Organization, &SubGroup)> {
        let org = self.organization(organization_id)?;
        org.sub_groups
            .iter()
            .find(|group| group.name.eq_ignore_ascii_case(name))
            .map(|group| (org, group))
    }

    /// First sub-group whose name occurs in the (lowercased) text.
    pub fn sub_group_mentioned_in(&self, lowered: &str) -> Option<(&Organization, &SubGroup)> {
        self.organizations.iter().find_map(|org| {
            org.sub_groups
                .iter()
                .find(|group| lowered.contains(&group.name.to_lowercase()))
                .map(|group| (org, group))
        })
    }

    pub fn organization_mentioned_in(&self, lowered: &str) -> Option<&Organization> {
        self.organizations
            .iter()
            .find(|org| lowered.contains(&org.name.to_lowercase()))
    }

    pub fn landmark_mentioned_in(&self, lowered: &str) -> Option<&Landmark> {
        self.landmarks
            .iter()
            .find(|spot| lowered.contains(&spot.name.to_lowercase()))
    }

    /// Resolves a training reference, preferring the exact example and
    /// falling back to the first example of the same category.
    pub fn training_example(&self, category: &str, index: usize) -> Option<&TrainingExample> {
        self.training
            .get(index)
            .filter(|example| example.category == category)
            .or_else(|| self.training.iter().find(|example| example.category == category))
    }
}
