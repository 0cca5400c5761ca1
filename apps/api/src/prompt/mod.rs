//! Prompt Composer — substitutes teacher parameters and reference data into
//! the base templates.
//!
//! Three variants share one substitution mechanism over different base
//! templates: the full curriculum in one call, or the teacher-guide /
//! student-materials halves as two independently parallelizable calls.

pub mod templates;

use serde_json::json;

use crate::errors::AppError;
use crate::models::request::LessonRequest;
use crate::reference::ReferenceData;

/// Which base template and output schema to compose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    FullCurriculum,
    TeacherGuide,
    StudentMaterials,
}

/// A composed instruction pair ready for the model gateway.
#[derive(Debug, Clone)]
pub struct ComposedPrompt {
    pub system: String,
    pub user: String,
}

/// Substituted for a reference section that is absent or empty. An explicit
/// marker, never a raw `{{...}}` token leaking into the prompt.
const EMPTY_SECTION: &str = "{}";

pub fn compose(
    kind: PromptKind,
    request: &LessonRequest,
    reference: &ReferenceData,
) -> Result<ComposedPrompt, AppError> {
    let standards = non_empty_or_marker(reference.standards_json_for(request.grade, request.subject));
    let approaches = non_empty_or_marker(reference.approaches_json());

    let body = match kind {
        PromptKind::FullCurriculum => templates::FULL_CURRICULUM_TEMPLATE,
        PromptKind::TeacherGuide => templates::TEACHER_GUIDE_TEMPLATE,
        PromptKind::StudentMaterials => templates::STUDENT_MATERIALS_TEMPLATE,
    };

    let system = format!("{}\n\n{}", templates::CURRICULUM_SYSTEM_HEADER, body)
        .replace("{{TEACHER_GUIDE_SCHEMA}}", templates::TEACHER_GUIDE_SCHEMA)
        .replace(
            "{{STUDENT_MATERIALS_SCHEMA}}",
            templates::STUDENT_MATERIALS_SCHEMA,
        )
        .replace("{{STANDARDS_JSON}}", &standards)
        .replace("{{PEDAGOGICAL_APPROACHES_JSON}}", &approaches);

    let user = build_user_message(kind, request)?;

    Ok(ComposedPrompt { system, user })
}

/// The user message embeds the teacher input as fenced JSON so the model sees
/// it as data, not instructions.
fn build_user_message(kind: PromptKind, request: &LessonRequest) -> Result<String, AppError> {
    let mut input = json!({
        "grade": request.grade,
        "subject": request.subject.as_str(),
        "topic": request.topic,
        "session_length_minutes": request.session_length_minutes,
        "learning_goal_type": request.learning_goal_type,
        "group_format": request.group_format,
    });
    if let Some(approach) = &request.pedagogical_approach {
        input["pedagogical_approach"] = json!(approach);
    }

    let serialized = serde_json::to_string_pretty(&input)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize teacher input: {e}")))?;

    let ask = match kind {
        PromptKind::FullCurriculum => "Generate curriculum for this class",
        PromptKind::TeacherGuide => "Generate the teacher guide for this class",
        PromptKind::StudentMaterials => {
            "Generate the four differentiated student handouts for this class"
        }
    };

    Ok(format!("{ask}:\n\n```json\n{serialized}\n```"))
}

fn non_empty_or_marker(serialized: String) -> String {
    if serialized.trim().is_empty() {
        EMPTY_SECTION.to_string()
    } else {
        serialized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_request() -> LessonRequest {
        serde_json::from_value(json!({
            "grade": 6,
            "subject": "Math",
            "topic": "equivalent ratios",
            "session_length_minutes": 20,
            "learning_goal_type": "introduce",
            "group_format": "whole_class",
            "pedagogical_approach": "3_act_math"
        }))
        .unwrap()
    }

    #[test]
    fn test_no_dangling_placeholders_survive_composition() {
        let reference = ReferenceData::empty();
        for kind in [
            PromptKind::FullCurriculum,
            PromptKind::TeacherGuide,
            PromptKind::StudentMaterials,
        ] {
            let prompt = compose(kind, &sample_request(), &reference).unwrap();
            assert!(
                !prompt.system.contains("{{"),
                "dangling placeholder in {kind:?} system prompt"
            );
        }
    }

    #[test]
    fn test_user_message_embeds_fenced_input() {
        let reference = ReferenceData::empty();
        let prompt = compose(PromptKind::FullCurriculum, &sample_request(), &reference).unwrap();
        assert!(prompt.user.contains("```json"));
        assert!(prompt.user.contains("\"equivalent ratios\""));
        assert!(prompt.user.contains("\"session_length_minutes\": 20"));
        assert!(prompt.user.contains("\"pedagogical_approach\": \"3_act_math\""));
    }

    #[test]
    fn test_variants_request_different_top_level_keys() {
        let reference = ReferenceData::empty();
        let guide = compose(PromptKind::TeacherGuide, &sample_request(), &reference).unwrap();
        let materials =
            compose(PromptKind::StudentMaterials, &sample_request(), &reference).unwrap();
        assert!(guide.system.contains("EXACTLY one top-level key: \"teacher_guide\""));
        assert!(materials
            .system
            .contains("EXACTLY one top-level key: \"student_materials\""));
        assert!(!guide.system.contains("word_bank"));
        assert!(materials.system.contains("word_bank"));
    }

    #[test]
    fn test_standards_data_substituted_when_present() {
        let reference = ReferenceData::from_values(
            json!({"math_6_8_detailed": {"grade_6": {"standards": ["6.RP.A.1"]}}}),
            json!({}),
            json!({}),
            json!({"pedagogical_approaches": [{"id": "3_act_math", "name": "3-Act Math"}]}),
        );
        let prompt = compose(PromptKind::FullCurriculum, &sample_request(), &reference).unwrap();
        assert!(prompt.system.contains("6.RP.A.1"));
        assert!(prompt.system.contains("3-Act Math"));
    }

    #[test]
    fn test_request_without_approach_omits_field() {
        let reference = ReferenceData::empty();
        let mut request = sample_request();
        request.pedagogical_approach = None;
        let prompt = compose(PromptKind::FullCurriculum, &request, &reference).unwrap();
        assert!(!prompt.user.contains("pedagogical_approach"));
    }
}
