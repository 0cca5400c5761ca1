//! Per-level student handout models.
//!
//! Each readiness level has its own struct rather than one handout type with
//! optional fields: the level key sets are part of the wire contract
//! ("exactly the keys for that level — no more, no fewer"), and
//! `deny_unknown_fields` plus required fields makes deserialization enforce
//! both directions. Scaffolding intensity decreases below → above by
//! construction.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The four differentiated handouts. Exactly these keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudentMaterials {
    pub below_level: BelowLevelHandout,
    pub approaching_level: ApproachingLevelHandout,
    pub at_level: AtLevelHandout,
    pub above_level: AboveLevelHandout,
}

/// Heaviest scaffolding: organizer, frames, and a word bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BelowLevelHandout {
    pub header: HandoutHeader,
    pub vocabulary: Vec<VocabularyTerm>,
    pub worked_example: WorkedExample,
    pub guided_practice: Vec<GuidedPracticeItem>,
    pub graphic_organizer: GraphicOrganizer,
    pub sentence_frames: Vec<String>,
    pub word_bank: Vec<String>,
}

/// Same scaffolds as below-level, minus the word bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApproachingLevelHandout {
    pub header: HandoutHeader,
    pub vocabulary: Vec<VocabularyTerm>,
    pub worked_example: WorkedExample,
    pub guided_practice: Vec<GuidedPracticeItem>,
    pub graphic_organizer: GraphicOrganizer,
    pub sentence_frames: Vec<String>,
}

/// Grade-level: summarized example and an application problem; no organizer
/// or frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AtLevelHandout {
    pub header: HandoutHeader,
    pub vocabulary: Vec<VocabularyTerm>,
    pub worked_example: WorkedExample,
    pub guided_practice: Vec<GuidedPracticeItem>,
    pub application_problem: ApplicationProblem,
}

/// No guided scaffolding at all; an extension challenge instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AboveLevelHandout {
    pub header: HandoutHeader,
    pub vocabulary: Vec<VocabularyTerm>,
    pub worked_example: WorkedExample,
    pub extension_challenge: ExtensionChallenge,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HandoutHeader {
    /// Render-required; absence aborts only this handout's render.
    pub title: Option<String>,
    pub student_objective: Option<String>,
    pub i_can_statement: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyTerm {
    pub term: String,
    pub definition: String,
    pub example: Option<String>,
    /// Description of a supporting visual, present on the scaffolded levels.
    pub visual_description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkedExample {
    pub problem: Option<String>,
    #[serde(default)]
    pub steps: Vec<WorkedStep>,
    pub solution: Option<String>,
    /// At-level carries a compressed narrative instead of full steps.
    pub solution_summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkedStep {
    pub step_number: u32,
    pub action: String,
    pub result: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidedPracticeItem {
    pub problem: String,
    pub scaffold: Option<String>,
    pub hint: Option<String>,
}

impl GuidedPracticeItem {
    /// Scaffold and hint are interchangeable in model output; prefer the
    /// scaffold when both are present.
    pub fn support_text(&self) -> Option<&str> {
        self.scaffold.as_deref().or(self.hint.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationProblem {
    pub context: Option<String>,
    pub question: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionChallenge {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub guiding_questions: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Graphic organizer — tagged variant over `type`
// ────────────────────────────────────────────────────────────────────────────

/// A structured visual template the student fills in, variant-typed by its
/// `type` tag. Unknown tags (and known tags with unusable payloads) become
/// `Unknown`, which the renderer draws as a generic labeled box — an
/// unrecognized organizer must never fail a handout.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GraphicOrganizer {
    RatioTable(RatioTable),
    StoryMap(StoryMap),
    VocabularyFourSquare(VocabularyFourSquare),
    CauseEffect(CauseEffect),
    Unknown { organizer_type: String, data: Value },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioTable {
    pub columns: Vec<String>,
    /// Prefilled rows; cells may be empty strings to leave blanks.
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
    /// Additional fully blank rows appended below the prefilled ones.
    #[serde(default)]
    pub blank_rows: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryMap {
    pub sections: Vec<OrganizerSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizerSection {
    pub label: String,
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyFourSquare {
    pub term: String,
    /// Quadrant labels, clockwise from top-left. Exactly four are drawn;
    /// extras are ignored and missing ones left unlabeled.
    pub quadrants: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseEffect {
    pub pairs: Vec<CauseEffectPair>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseEffectPair {
    pub cause: String,
    pub effect: String,
}

impl GraphicOrganizer {
    pub fn type_tag(&self) -> &str {
        match self {
            GraphicOrganizer::RatioTable(_) => "ratio_table",
            GraphicOrganizer::StoryMap(_) => "story_map",
            GraphicOrganizer::VocabularyFourSquare(_) => "vocabulary_four_square",
            GraphicOrganizer::CauseEffect(_) => "cause_effect",
            GraphicOrganizer::Unknown { organizer_type, .. } => organizer_type,
        }
    }
}

impl<'de> Deserialize<'de> for GraphicOrganizer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let known = match tag.as_str() {
            "ratio_table" => serde_json::from_value(value.clone())
                .map(GraphicOrganizer::RatioTable)
                .ok(),
            "story_map" => serde_json::from_value(value.clone())
                .map(GraphicOrganizer::StoryMap)
                .ok(),
            "vocabulary_four_square" => serde_json::from_value(value.clone())
                .map(GraphicOrganizer::VocabularyFourSquare)
                .ok(),
            "cause_effect" => serde_json::from_value(value.clone())
                .map(GraphicOrganizer::CauseEffect)
                .ok(),
            _ => None,
        };

        Ok(known.unwrap_or(GraphicOrganizer::Unknown {
            organizer_type: tag,
            data: value,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    pub fn sample_organizer() -> Value {
        json!({
            "type": "ratio_table",
            "columns": ["Cups of flour", "Cups of sugar"],
            "rows": [["2", "3"]],
            "blank_rows": 3
        })
    }

    fn below_level_value() -> Value {
        json!({
            "header": {"title": "Equivalent Ratios", "i_can_statement": "I can find equivalent ratios"},
            "vocabulary": [{
                "term": "ratio",
                "definition": "A comparison of two quantities",
                "example": "2:3",
                "visual_description": "Two stacks of blocks side by side"
            }],
            "worked_example": {
                "problem": "Find a ratio equivalent to 2:3",
                "steps": [{"step_number": 1, "action": "Multiply both parts by 2", "result": "4:6"}],
                "solution": "4:6"
            },
            "guided_practice": [{"problem": "Find a ratio equivalent to 3:5", "scaffold": "Try multiplying by 2"}],
            "graphic_organizer": sample_organizer(),
            "sentence_frames": ["The ratio of ___ to ___ is ___."],
            "word_bank": ["ratio", "equivalent", "multiply"]
        })
    }

    #[test]
    fn test_below_level_parses_with_exact_keys() {
        let handout: BelowLevelHandout = serde_json::from_value(below_level_value()).unwrap();
        assert_eq!(handout.word_bank.len(), 3);
        assert_eq!(handout.vocabulary[0].term, "ratio");
    }

    #[test]
    fn test_below_level_missing_word_bank_rejected() {
        let mut value = below_level_value();
        value.as_object_mut().unwrap().remove("word_bank");
        let result: Result<BelowLevelHandout, _> = serde_json::from_value(value);
        assert!(result.is_err(), "below_level requires word_bank");
    }

    #[test]
    fn test_below_level_extra_key_rejected() {
        let mut value = below_level_value();
        value
            .as_object_mut()
            .unwrap()
            .insert("extension_challenge".into(), json!({}));
        let result: Result<BelowLevelHandout, _> = serde_json::from_value(value);
        assert!(result.is_err(), "below_level must reject extra keys");
    }

    #[test]
    fn test_at_level_rejects_graphic_organizer() {
        let result: Result<AtLevelHandout, _> = serde_json::from_value(json!({
            "header": {"title": "At Level"},
            "vocabulary": [],
            "worked_example": {"problem": "p", "solution_summary": "multiply both parts"},
            "guided_practice": [],
            "application_problem": {"context": "Recipe", "question": "How much sugar?"},
            "graphic_organizer": sample_organizer()
        }));
        assert!(result.is_err(), "at_level drops the organizer");
    }

    #[test]
    fn test_above_level_rejects_guided_practice() {
        let result: Result<AboveLevelHandout, _> = serde_json::from_value(json!({
            "header": {"title": "Above Level"},
            "vocabulary": [],
            "worked_example": {"problem": "p"},
            "guided_practice": [],
            "extension_challenge": {"title": "Scaling", "description": "Design a recipe"}
        }));
        assert!(result.is_err(), "above_level has no guided scaffolding");
    }

    #[test]
    fn test_organizer_ratio_table_dispatch() {
        let organizer: GraphicOrganizer = serde_json::from_value(sample_organizer()).unwrap();
        match organizer {
            GraphicOrganizer::RatioTable(t) => {
                assert_eq!(t.columns.len(), 2);
                assert_eq!(t.blank_rows, 3);
            }
            other => panic!("expected ratio_table, got {}", other.type_tag()),
        }
    }

    #[test]
    fn test_organizer_cause_effect_preserves_pairs() {
        let organizer: GraphicOrganizer = serde_json::from_value(json!({
            "type": "cause_effect",
            "pairs": [
                {"cause": "Heat rises", "effect": "Convection currents"},
                {"cause": "Currents move plates", "effect": "Earthquakes"},
                {"cause": "Plates collide", "effect": "Mountains form"}
            ]
        }))
        .unwrap();
        match organizer {
            GraphicOrganizer::CauseEffect(ce) => assert_eq!(ce.pairs.len(), 3),
            other => panic!("expected cause_effect, got {}", other.type_tag()),
        }
    }

    #[test]
    fn test_organizer_unknown_type_falls_back() {
        let organizer: GraphicOrganizer = serde_json::from_value(json!({
            "type": "mystery_type",
            "anything": ["goes", "here"]
        }))
        .unwrap();
        match organizer {
            GraphicOrganizer::Unknown { organizer_type, .. } => {
                assert_eq!(organizer_type, "mystery_type")
            }
            other => panic!("expected Unknown, got {}", other.type_tag()),
        }
    }

    #[test]
    fn test_organizer_known_tag_bad_payload_falls_back() {
        // ratio_table without columns is unusable; degrade, don't fail.
        let organizer: GraphicOrganizer =
            serde_json::from_value(json!({"type": "ratio_table"})).unwrap();
        assert!(matches!(organizer, GraphicOrganizer::Unknown { .. }));
    }

    #[test]
    fn test_organizer_missing_tag_falls_back() {
        let organizer: GraphicOrganizer =
            serde_json::from_value(json!({"columns": ["a"]})).unwrap();
        match organizer {
            GraphicOrganizer::Unknown { organizer_type, .. } => assert!(organizer_type.is_empty()),
            other => panic!("expected Unknown, got {}", other.type_tag()),
        }
    }

    #[test]
    fn test_student_materials_requires_all_four_levels() {
        let mut root = json!({
            "below_level": below_level_value(),
            "approaching_level": {
                "header": {"title": "Approaching"},
                "vocabulary": [],
                "worked_example": {},
                "guided_practice": [],
                "graphic_organizer": sample_organizer(),
                "sentence_frames": []
            },
            "at_level": {
                "header": {"title": "At"},
                "vocabulary": [],
                "worked_example": {},
                "guided_practice": [],
                "application_problem": {}
            },
            "above_level": {
                "header": {"title": "Above"},
                "vocabulary": [],
                "worked_example": {},
                "extension_challenge": {}
            }
        });
        assert!(serde_json::from_value::<StudentMaterials>(root.clone()).is_ok());

        root.as_object_mut().unwrap().remove("above_level");
        assert!(
            serde_json::from_value::<StudentMaterials>(root).is_err(),
            "all four readiness levels are required"
        );
    }
}
