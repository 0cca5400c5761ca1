//! Reference data store — static JSON assets loaded once at startup.
//!
//! Read-only after construction; shared across requests as
//! `Arc<ReferenceData>`, so concurrent readers need no synchronization.
//! Constructed explicitly (not ambient globals) so tests can substitute
//! their own catalogs.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::models::request::Subject;

pub const STANDARDS_CATALOG_FILE: &str = "standards_catalog.json";
pub const STANDARDS_READINESS_FILE: &str = "standards_readiness.json";
pub const TOPIC_MAPPING_FILE: &str = "topic_standards_mapping.json";
pub const APPROACHES_FILE: &str = "pedagogical_approaches.json";

/// One pedagogical approach from the catalog. `detail` keeps the full entry
/// (including `lesson_structure.phases` and `selection_guidance`, which are
/// part of the prompt contract) for verbatim inclusion in prompts.
#[derive(Debug, Clone, Deserialize)]
pub struct Approach {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub detail: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ApproachCatalog {
    #[serde(default)]
    pedagogical_approaches: Vec<Approach>,
}

#[derive(Debug, Default)]
pub struct ReferenceData {
    standards_catalog: Value,
    standards_readiness: Value,
    topic_mapping: Value,
    approaches_raw: Value,
    approaches: Vec<Approach>,
}

impl ReferenceData {
    /// Loads all reference assets from `dir`. A missing or unreadable file
    /// degrades to an empty object so a trimmed deployment still starts; the
    /// composer substitutes `{}` for the missing section.
    pub fn load(dir: &Path) -> Result<Self> {
        let standards_catalog = load_json_or_empty(&dir.join(STANDARDS_CATALOG_FILE));
        let standards_readiness = load_json_or_empty(&dir.join(STANDARDS_READINESS_FILE));
        let topic_mapping = load_json_or_empty(&dir.join(TOPIC_MAPPING_FILE));
        let approaches_raw = load_json_or_empty(&dir.join(APPROACHES_FILE));

        let catalog: ApproachCatalog =
            serde_json::from_value(approaches_raw.clone()).unwrap_or_default();

        info!(
            "Reference data loaded: {} pedagogical approaches",
            catalog.pedagogical_approaches.len()
        );

        Ok(ReferenceData {
            standards_catalog,
            standards_readiness,
            topic_mapping,
            approaches_raw,
            approaches: catalog.pedagogical_approaches,
        })
    }

    /// An empty store — deterministic tests substitute their own catalogs.
    #[cfg(test)]
    pub fn empty() -> Self {
        ReferenceData::default()
    }

    /// Builds one from in-memory values (test seam).
    #[cfg(test)]
    pub fn from_values(
        standards_catalog: Value,
        standards_readiness: Value,
        topic_mapping: Value,
        approaches_raw: Value,
    ) -> Self {
        let catalog: ApproachCatalog =
            serde_json::from_value(approaches_raw.clone()).unwrap_or_default();
        ReferenceData {
            standards_catalog,
            standards_readiness,
            topic_mapping,
            approaches_raw,
            approaches: catalog.pedagogical_approaches,
        }
    }

    pub fn approach(&self, id: &str) -> Option<&Approach> {
        self.approaches.iter().find(|a| a.id == id)
    }

    pub fn approach_ids(&self) -> Vec<&str> {
        self.approaches.iter().map(|a| a.id.as_str()).collect()
    }

    /// Serialized pedagogical approach catalog for prompt substitution.
    pub fn approaches_json(&self) -> String {
        if self.approaches_raw.is_null() {
            "{}".to_string()
        } else {
            serde_json::to_string_pretty(&self.approaches_raw).unwrap_or_else(|_| "{}".to_string())
        }
    }

    /// Serialized standards payload filtered to the request's grade and
    /// subject, to keep the prompt inside the model's context window.
    ///
    /// Grades 6-8 have per-grade detailed sections; other grades fall back to
    /// band summaries. If nothing matches (an unexpected catalog shape), the
    /// full serialization is used rather than sending an empty payload.
    pub fn standards_json_for(&self, grade: u8, subject: Subject) -> String {
        let mut sections: BTreeMap<&str, Value> = BTreeMap::new();

        if let Some(catalog) = self.filter_catalog(grade, subject) {
            sections.insert("standards_catalog", catalog);
        }
        if let Some(readiness) = self.filter_readiness(grade) {
            sections.insert("readiness_indicators_detailed", readiness);
        }
        if let Some(topics) = self.filter_topic_mapping(grade, subject) {
            sections.insert("topic_to_standards_mapping", topics);
        }

        if sections.is_empty() {
            let full = json!({
                "standards_catalog": self.standards_catalog,
                "readiness_indicators_detailed": self.standards_readiness,
                "topic_to_standards_mapping": self.topic_mapping,
            });
            return serde_json::to_string_pretty(&full).unwrap_or_else(|_| "{}".to_string());
        }

        serde_json::to_string_pretty(&sections).unwrap_or_else(|_| "{}".to_string())
    }

    fn filter_catalog(&self, grade: u8, subject: Subject) -> Option<Value> {
        let grade_key = format!("grade_{grade}");
        if (6..=8).contains(&grade) {
            let section = match subject {
                Subject::Math => self
                    .standards_catalog
                    .get("math_6_8_detailed")
                    .and_then(|s| s.get(&grade_key)),
                Subject::Ela => self
                    .standards_catalog
                    .get("ela_6_8_detailed")
                    .and_then(|s| s.get(&grade_key)),
                // Middle-school science standards are banded, not per-grade.
                Subject::Science => self.standards_catalog.get("science_ms"),
                Subject::History => self
                    .standards_catalog
                    .get("history_social_science")
                    .and_then(|s| s.get(&grade_key)),
            };
            return section.cloned();
        }
        if grade <= 5 {
            return self.standards_catalog.get("elementary_summary").cloned();
        }
        self.standards_catalog.get("high_school_summary").cloned()
    }

    fn filter_readiness(&self, grade: u8) -> Option<Value> {
        let grade_key = format!("grade_{grade}");
        self.standards_readiness
            .get("readiness_indicators_detailed")
            .and_then(|r| r.get(&grade_key))
            .cloned()
    }

    fn filter_topic_mapping(&self, grade: u8, subject: Subject) -> Option<Value> {
        if !(6..=8).contains(&grade) {
            return None;
        }
        let subject_key = match subject {
            Subject::Math => "math",
            Subject::Ela => "ela",
            Subject::Science => "science",
            Subject::History => "history",
        };
        self.topic_mapping
            .get("topic_to_standards_mapping")
            .and_then(|m| m.get(subject_key))
            .cloned()
    }
}

fn load_json_or_empty(path: &Path) -> Value {
    match std::fs::read_to_string(path) {
        Ok(text) => match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                warn!("Reference file {} is not valid JSON: {e}", path.display());
                json!({})
            }
        },
        Err(_) => {
            warn!("Reference file {} not found; using empty object", path.display());
            json!({})
        }
    }
}
