//! Skill dictionary — canonical term → category → aliases.
//!
//! Loaded once at startup and treated as read-only for the process lifetime.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// Default dictionary shipped with the binary.
const EMBEDDED_DICTIONARY: &str = include_str!("../skill_dictionary.json");

/// Coarse category of a skill. Drives the scoring weight table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Language,
    Framework,
    Devops,
    Cloud,
    Database,
    Data,
    Testing,
    Platform,
    Tool,
    Process,
    Architecture,
    #[serde(other)]
    Unknown,
}

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Language => "language",
            SkillCategory::Framework => "framework",
            SkillCategory::Devops => "devops",
            SkillCategory::Cloud => "cloud",
            SkillCategory::Database => "database",
            SkillCategory::Data => "data",
            SkillCategory::Testing => "testing",
            SkillCategory::Platform => "platform",
            SkillCategory::Tool => "tool",
            SkillCategory::Process => "process",
            SkillCategory::Architecture => "architecture",
            SkillCategory::Unknown => "unknown",
        }
    }
}

/// One dictionary entry: a canonical spelling plus its alternate spellings.
#[derive(Debug, Clone, Deserialize)]
pub struct SkillEntry {
    pub term: String,
    pub category: SkillCategory,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SkillDocument {
    skills: Vec<SkillEntry>,
}

/// Immutable skill dictionary with a precomputed alias index.
///
/// Alias keys are lower-cased; the canonical term is always indexed as an
/// alias of itself.
#[derive(Debug, Clone)]
pub struct SkillDictionary {
    entries: Vec<SkillEntry>,
    /// lower-cased alias → index into `entries`
    alias_index: HashMap<String, usize>,
    /// lower-cased canonical term → index into `entries`
    canonical_index: HashMap<String, usize>,
}

impl SkillDictionary {
    /// Loads the dictionary shipped with the binary.
    pub fn embedded() -> Self {
        // The embedded document is validated by tests; a broken asset is a
        // build defect, not a runtime condition.
        Self::from_json(EMBEDDED_DICTIONARY).expect("embedded skill dictionary is valid")
    }

    /// Loads a dictionary from a JSON file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| EngineError::DictionaryIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, EngineError> {
        let doc: SkillDocument = serde_json::from_str(raw)?;
        if doc.skills.is_empty() {
            return Err(EngineError::DictionaryEmpty);
        }

        let mut alias_index = HashMap::new();
        let mut canonical_index = HashMap::new();
        for (i, entry) in doc.skills.iter().enumerate() {
            canonical_index.insert(entry.term.to_lowercase(), i);
            alias_index.insert(entry.term.to_lowercase(), i);
            for alias in &entry.aliases {
                alias_index.insert(alias.to_lowercase(), i);
            }
        }

        Ok(SkillDictionary {
            entries: doc.skills,
            alias_index,
            canonical_index,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates every searchable alias paired with its canonical entry.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &SkillEntry)> {
        self.alias_index
            .iter()
            .map(move |(alias, &i)| (alias.as_str(), &self.entries[i]))
    }

    /// Resolves any alias or canonical spelling (case-insensitive).
    pub fn resolve(&self, term: &str) -> Option<&SkillEntry> {
        self.alias_index
            .get(&term.to_lowercase())
            .map(|&i| &self.entries[i])
    }

    /// True when `term` is a canonical dictionary term (case-insensitive).
    pub fn is_canonical(&self, term: &str) -> bool {
        self.canonical_index.contains_key(&term.to_lowercase())
    }

    pub fn category_of(&self, term: &str) -> Option<SkillCategory> {
        self.resolve(term).map(|e| e.category)
    }
}
