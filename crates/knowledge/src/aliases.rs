// crates/knowledge/src/aliases.rs

use crate::KnowledgeBase;

#[derive(Debug, Clone)]
struct AliasEntry {
    id: String,
    phrases: Vec<String>,
}

/// Entity id → synonym phrases, scanned in insertion order.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_knowledge(kb: &KnowledgeBase) -> Self {
        let mut table = Self::new();
        for org in &kb.organizations {
            let mut phrases = vec![org.id.clone()];
            phrases.extend(org.aliases.iter().cloned());
            table.insert(&org.id, phrases);
        }
        table
    }

    pub fn insert<I, S>(&mut self, id: &str, phrases: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut phrases = phrases
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>();
        phrases.dedup();

        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => entry.phrases.extend(phrases),
            None => self.entries.push(AliasEntry {
                id: id.to_string(),
                phrases,
            }),
        }
    }

    /// Returns the first entity having any phrase contained in `text`.
    pub fn lookup(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.phrases.iter().any(|p| lowered.contains(p.as_str())))
            .map(|entry| entry.id.as_str())
    }

    pub fn phrases(&self, id: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.phrases.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
