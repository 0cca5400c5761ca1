//! Typed curriculum document — the wire contract between the response parser
//! and the document renderer.
//!
//! Key names and the four/three-way enumerated key sets must be preserved
//! exactly for compatibility with externally authored prompt templates.
//! Fields that are required for *rendering* but may be absent in a
//! hand-assembled document (`metadata.title`) are `Option` here; the render
//! routine enforces them and names the offending document and field.

use serde::{Deserialize, Serialize};

use crate::models::handout::StudentMaterials;

/// Root of a validated generation result. Immutable once parsed; dropped
/// after the PDFs are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurriculumDocument {
    pub teacher_guide: TeacherGuide,
    pub student_materials: StudentMaterials,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeacherGuide {
    #[serde(default)]
    pub metadata: GuideMetadata,
    #[serde(default)]
    pub learning_objectives: Vec<LearningObjective>,
    #[serde(default)]
    pub session_structure: SessionStructure,
    pub differentiation_overview: Option<DifferentiationOverview>,
    pub el_supports: Option<ElSupports>,
    #[serde(default)]
    pub materials_list: Vec<String>,
    #[serde(default)]
    pub common_misconceptions: Vec<Misconception>,
    #[serde(default)]
    pub discussion_prompts: Vec<String>,
    #[serde(default)]
    pub assessment_ideas: Vec<String>,
    #[serde(default)]
    pub extension_ideas: Vec<String>,
    pub udl_alignment: Option<UdlAlignment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuideMetadata {
    /// Render-required; absence aborts only the teacher guide document.
    pub title: Option<String>,
    pub grade: Option<u8>,
    pub subject: Option<String>,
    pub topic: Option<String>,
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub standards_addressed: Vec<String>,
    pub pedagogical_approach: Option<ApproachSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproachSummary {
    pub id: String,
    pub name: String,
    pub rationale: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningObjective {
    pub objective: String,
    pub success_criteria: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStructure {
    #[serde(default)]
    pub phases: Vec<SessionPhase>,
    pub exit_assessment: Option<ExitAssessment>,
}

impl SessionStructure {
    /// Sum of phase durations — should match the requested session length
    /// (±1 for rounding by the model).
    pub fn total_minutes(&self) -> u32 {
        self.phases.iter().filter_map(|p| p.duration_minutes).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPhase {
    pub name: String,
    pub duration_minutes: Option<u32>,
    pub description: Option<String>,
    pub teacher_actions: Option<String>,
    pub student_actions: Option<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
    pub differentiation_note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitAssessment {
    pub assessment_type: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Misconception {
    pub misconception: String,
    pub how_to_address: Option<String>,
}

/// Differentiation guidance keyed by exactly the four readiness levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DifferentiationOverview {
    pub below_level: LevelPlan,
    pub approaching_level: LevelPlan,
    pub at_level: LevelPlan,
    pub above_level: LevelPlan,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelPlan {
    pub focus: Option<String>,
    #[serde(default)]
    pub key_scaffolds: Vec<String>,
    pub monitor_for: Option<String>,
}

/// English-learner support summaries keyed by exactly the three proficiency
/// levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElSupports {
    pub emerging: String,
    pub expanding: String,
    pub bridging: String,
}

/// UDL alignment block: exactly the three principles, each with checkpoint
/// codes and a rationale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UdlAlignment {
    pub summary: Option<String>,
    pub engagement: UdlPrinciple,
    pub representation: UdlPrinciple,
    pub action_expression: UdlPrinciple,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UdlPrinciple {
    #[serde(default)]
    pub checkpoints_addressed: Vec<String>,
    pub how_addressed: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_structure_total_minutes() {
        let structure: SessionStructure = serde_json::from_value(serde_json::json!({
            "phases": [
                {"name": "Act One", "duration_minutes": 5},
                {"name": "Act Two", "duration_minutes": 10},
                {"name": "Act Three", "duration_minutes": 5}
            ]
        }))
        .unwrap();
        assert_eq!(structure.total_minutes(), 20);
    }

    #[test]
    fn test_differentiation_overview_requires_all_four_levels() {
        let result: Result<DifferentiationOverview, _> =
            serde_json::from_value(serde_json::json!({
                "below_level": {"focus": "foundations"},
                "approaching_level": {"focus": "fluency"},
                "at_level": {"focus": "mastery"}
            }));
        assert!(result.is_err(), "missing above_level must fail");
    }

    #[test]
    fn test_differentiation_overview_rejects_extra_level() {
        let result: Result<DifferentiationOverview, _> =
            serde_json::from_value(serde_json::json!({
                "below_level": {},
                "approaching_level": {},
                "at_level": {},
                "above_level": {},
                "way_above_level": {}
            }));
        assert!(result.is_err(), "fifth readiness key must fail");
    }

    #[test]
    fn test_el_supports_exactly_three_levels() {
        let ok: Result<ElSupports, _> = serde_json::from_value(serde_json::json!({
            "emerging": "visuals and gestures",
            "expanding": "sentence frames",
            "bridging": "academic vocabulary pushes"
        }));
        assert!(ok.is_ok());

        let missing: Result<ElSupports, _> = serde_json::from_value(serde_json::json!({
            "emerging": "a",
            "expanding": "b"
        }));
        assert!(missing.is_err());

        let extra: Result<ElSupports, _> = serde_json::from_value(serde_json::json!({
            "emerging": "a",
            "expanding": "b",
            "bridging": "c",
            "fluent": "d"
        }));
        assert!(extra.is_err());
    }

    #[test]
    fn test_guide_tolerates_missing_optional_sections() {
        let guide: TeacherGuide = serde_json::from_value(serde_json::json!({
            "metadata": {"title": "Equivalent Ratios", "grade": 6}
        }))
        .unwrap();
        assert_eq!(guide.metadata.title.as_deref(), Some("Equivalent Ratios"));
        assert!(guide.learning_objectives.is_empty());
        assert!(guide.udl_alignment.is_none());
    }

    #[test]
    fn test_udl_alignment_requires_three_principles() {
        let result: Result<UdlAlignment, _> = serde_json::from_value(serde_json::json!({
            "engagement": {"checkpoints_addressed": ["7.1"], "how_addressed": "choice"},
            "representation": {"checkpoints_addressed": ["1.2"], "how_addressed": "visuals"}
        }));
        assert!(result.is_err(), "missing action_expression must fail");
    }
}
