// crates/knowledge/src/lib.rs

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use campus_core::{CampusError, CampusResult};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

pub mod aliases;
pub mod model;

pub use aliases::AliasTable;
pub use model::*;

const EMBEDDED_KNOWLEDGE: &str = include_str!("../data/knowledge.yaml");

impl KnowledgeBase {
    /// Knowledge document compiled into the binary.
    pub fn embedded() -> CampusResult<Self> {
        let kb: KnowledgeBase = serde_yaml::from_str(EMBEDDED_KNOWLEDGE).map_err(|e| {
            CampusError::Knowledge(format!("Failed to parse embedded knowledge base: {}", e))
        })?;
        kb.validate()?;
        Ok(kb)
    }

    /// Loads a YAML or JSON document, chosen by file extension.
    pub fn load(path: &Path) -> CampusResult<Self> {
        let kb: KnowledgeBase = load_document(path)?;
        kb.validate()?;
        info!(
            "Loaded knowledge base from {} ({} organizations, {} landmarks, {} training examples)",
            path.display(),
            kb.organizations.len(),
            kb.landmarks.len(),
            kb.training.len()
        );
        Ok(kb)
    }

    pub fn load_or_embedded(path: Option<&Path>) -> CampusResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::embedded(),
        }
    }

    pub fn validate(&self) -> CampusResult<()> {
        let mut ids = HashSet::new();
        for org in &self.organizations {
            if org.id.trim().is_empty() {
                return Err(CampusError::Knowledge(format!(
                    "Organization '{}' has an empty id",
                    org.name
                )));
            }
            if !ids.insert(org.id.as_str()) {
                return Err(CampusError::Knowledge(format!(
                    "Duplicate organization id '{}'",
                    org.id
                )));
            }
            if let Some(alias) = org.aliases.iter().find(|a| a.to_lowercase() != **a) {
                return Err(CampusError::Knowledge(format!(
                    "Alias '{}' of '{}' must be lowercase",
                    alias, org.id
                )));
            }
        }

        let mut spot_ids = HashSet::new();
        for spot in &self.landmarks {
            if !spot_ids.insert(spot.id.as_str()) {
                return Err(CampusError::Knowledge(format!(
                    "Duplicate landmark id '{}'",
                    spot.id
                )));
            }
        }

        for example in &self.training {
            if example.keywords.is_empty() {
                return Err(CampusError::Knowledge(format!(
                    "Training example '{}' has no keywords",
                    example.question
                )));
            }
        }

        if self.training.is_empty() {
            warn!("Knowledge base has no training examples");
        }

        Ok(())
    }
}

fn load_document<T: DeserializeOwned>(path: &Path) -> CampusResult<T> {
    let contents = fs::read_to_string(path).map_err(|e| {
        CampusError::Knowledge(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");

    if ext.eq_ignore_ascii_case("json") {
        serde_json::from_str(&contents).map_err(|e| {
            CampusError::Knowledge(format!("Failed to parse {}: {}", path.display(), e))
        })
    } else {
        serde_yaml::from_str(&contents).map_err(|e| {
            CampusError::Knowledge(format!("Failed to parse {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn embedded_knowledge_loads_and_validates() {
        let kb = KnowledgeBase::embedded().unwrap();

        assert_eq!(kb.council.short_name, "SAC");
        assert!(kb.organization("vsc").is_some());
        assert!(!kb.organization("vsc").unwrap().achievements.is_empty());
        assert!(kb.training.iter().all(|e| !e.keywords.is_empty()));
    }

    #[test]
    fn alias_table_covers_every_organization() {
        let kb = KnowledgeBase::embedded().unwrap();
        let table = AliasTable::from_knowledge(&kb);

        assert_eq!(table.len(), kb.organizations.len());
        assert_eq!(table.lookup("how good is the sports body"), Some("vsc"));
        assert_eq!(table.lookup("E-Cell mentors"), Some("ecell"));
    }

    #[test]
    fn lookups_by_mention() {
        let kb = KnowledgeBase::embedded().unwrap();

        let (org, group) = kb.sub_group_mentioned_in("who leads robotics").unwrap();
        assert_eq!(org.id, "tsc");
        assert_eq!(group.name, "Robotics");
        assert_eq!(
            kb.landmark_mentioned_in("where is the clock tower").map(|l| l.id.as_str()),
            Some("clock-tower")
        );
        assert!(kb.organization_mentioned_in("about the national service scheme").is_some());
    }

    #[test]
    fn training_lookup_falls_back_to_category() {
        let kb = KnowledgeBase::embedded().unwrap();
        let first_fees = kb.training_example("fees", 0).unwrap();
        assert_eq!(first_fees.category, "fees");

        // index points at a different category
        let hostel = kb.training_example("hostel", 0).unwrap();
        assert_eq!(hostel.category, "hostel");
        assert!(kb.training_example("no-such-category", 0).is_none());
    }

    #[test]
    fn loads_json_documents_and_rejects_duplicates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kb.json");
        let org = serde_json::json!({
            "id": "dup",
            "name": "Dup Club",
            "short_name": "DC",
            "description": "d"
        });
        let doc = serde_json::json!({
            "university": "Test U",
            "council": {"name": "Council", "short_name": "C", "description": "c"},
            "organizations": [org.clone(), org],
            "admissions": {"summary": "s"}
        });
        fs::write(&path, doc.to_string()).unwrap();

        let err = KnowledgeBase::load(&path).unwrap_err();
        assert!(matches!(err, CampusError::Knowledge(_)));
        assert!(err.to_string().contains("Duplicate organization id"));
    }

    #[test]
    fn rejects_uppercase_aliases() {
        let mut kb = KnowledgeBase::embedded().unwrap();
        kb.organizations[0].aliases.push("VSC Team".to_string());
        assert!(kb.validate().is_err());
    }
}
