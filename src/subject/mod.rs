//! Static catalog of the 20 discussion subjects.
//!
//! The catalog is bundled with the binary and parsed once at startup; it is
//! never mutated afterwards.


use crate::model::SubjectId;
use serde::{Deserialize, Serialize};

const BUNDLED_SUBJECTS: &str = include_str!("../../assets/subjects.json");

/// Number of subjects a room can discuss.
pub const SUBJECT_COUNT: SubjectId = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub description: String,
    pub area: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubjectCatalog {
    subjects: Vec<Subject>,
}

impl SubjectCatalog {
    /// Parses a catalog from JSON. Subjects are kept sorted by id.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut subjects: Vec<Subject> = serde_json::from_str(json)?;
        subjects.sort_by_key(|s| s.id);
        Ok(SubjectCatalog { subjects })
    }

    /// The catalog shipped with the crate.
    pub fn bundled() -> Result<Self, serde_json::Error> {
        Self::from_json(BUNDLED_SUBJECTS)
    }

    pub fn get(&self, id: SubjectId) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: SubjectId) -> bool {
        self.get(id).is_some()
    }

    /// Display name, falling back to `Subject <id>` for unknown ids.
    pub fn name_of(&self, id: SubjectId) -> String {
        self.get(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| format!("Subject {}", id))
    }

    pub fn all(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}
