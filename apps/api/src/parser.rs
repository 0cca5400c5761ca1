//! Response Parser — turns raw model text into validated curriculum objects.
//!
//! Models wrap JSON in prose and code fences despite instructions, so parsing
//! is: strip fences → structural decode → bounded brace-pair recovery →
//! typed validation. Every failure carries the original raw text; operators
//! need it to tune the prompt. This module never retries the model call —
//! the orchestration layer owns that policy.

use serde_json::Value;
use thiserror::Error;

use crate::errors::AppError;
use crate::models::curriculum::{CurriculumDocument, TeacherGuide};
use crate::models::handout::StudentMaterials;

/// The model's output did not parse or validate as the expected schema.
/// `raw` is the unmodified provider text.
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct MalformedResponse {
    pub reason: String,
    pub raw: String,
}

impl From<MalformedResponse> for AppError {
    fn from(e: MalformedResponse) -> Self {
        AppError::MalformedResponse {
            reason: e.reason,
            raw: e.raw,
        }
    }
}

pub fn parse_curriculum(raw: &str) -> Result<CurriculumDocument, MalformedResponse> {
    let value = extract_json_value(raw)?;
    typed(raw, value, "curriculum document")
}

/// Parses a teacher-guide-only response. Tolerates both `{"teacher_guide":
/// {...}}` and a bare guide object — models flip between the two.
pub fn parse_teacher_guide(raw: &str) -> Result<TeacherGuide, MalformedResponse> {
    let value = extract_json_value(raw)?;
    let section = unwrap_section(value, "teacher_guide");
    typed(raw, section, "teacher guide")
}

pub fn parse_student_materials(raw: &str) -> Result<StudentMaterials, MalformedResponse> {
    let value = extract_json_value(raw)?;
    let section = unwrap_section(value, "student_materials");
    typed(raw, section, "student materials")
}

fn typed<T: serde::de::DeserializeOwned>(
    raw: &str,
    value: Value,
    what: &str,
) -> Result<T, MalformedResponse> {
    serde_json::from_value(value).map_err(|e| MalformedResponse {
        reason: format!("{what} failed schema validation: {e}"),
        raw: raw.to_string(),
    })
}

fn unwrap_section(value: Value, key: &str) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key(key) => map.remove(key).unwrap_or(Value::Null),
        other => other,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Extraction
// ────────────────────────────────────────────────────────────────────────────

fn extract_json_value(raw: &str) -> Result<Value, MalformedResponse> {
    let candidate = strip_code_fences(raw);

    let direct_err = match serde_json::from_str::<Value>(candidate) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    // Bounded recovery: the outermost matching brace pair of the whole text.
    if let Some(slice) = outermost_braces(raw) {
        if let Ok(value) = serde_json::from_str::<Value>(slice) {
            return Ok(value);
        }
    }

    Err(MalformedResponse {
        reason: format!("response is not valid JSON: {direct_err}"),
        raw: raw.to_string(),
    })
}

/// Extracts the contents of a ```json ... ``` (or ```) fenced block,
/// tolerating prose before and after the fence. Returns the trimmed input
/// when no fence is present.
fn strip_code_fences(text: &str) -> &str {
    for opener in ["```json", "```"] {
        if let Some(start) = text.find(opener) {
            let body = &text[start + opener.len()..];
            if let Some(end) = body.find("```") {
                return body[..end].trim();
            }
            return body.trim();
        }
    }
    text.trim()
}

/// Locates the outermost `{...}` pair, counting depth while skipping string
/// literals and escapes. Returns None if no balanced pair exists.
fn outermost_braces(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_materials_json() -> String {
        json!({
            "student_materials": {
                "below_level": {
                    "header": {"title": "Below"},
                    "vocabulary": [],
                    "worked_example": {},
                    "guided_practice": [],
                    "graphic_organizer": {"type": "cause_effect", "pairs": []},
                    "sentence_frames": [],
                    "word_bank": []
                },
                "approaching_level": {
                    "header": {"title": "Approaching"},
                    "vocabulary": [],
                    "worked_example": {},
                    "guided_practice": [],
                    "graphic_organizer": {"type": "story_map", "sections": []},
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
            }
        })
        .to_string()
    }

    #[test]
    fn test_parses_clean_json() {
        let guide = parse_teacher_guide(r#"{"teacher_guide": {"metadata": {"title": "T"}}}"#)
            .unwrap();
        assert_eq!(guide.metadata.title.as_deref(), Some("T"));
    }

    #[test]
    fn test_parses_bare_section_without_wrapper_key() {
        let guide = parse_teacher_guide(r#"{"metadata": {"title": "Bare"}}"#).unwrap();
        assert_eq!(guide.metadata.title.as_deref(), Some("Bare"));
    }

    #[test]
    fn test_extracts_from_json_fence_with_surrounding_prose() {
        let raw = format!(
            "Here is the curriculum you asked for:\n\n```json\n{}\n```\n\nLet me know if you need changes.",
            minimal_materials_json()
        );
        let materials = parse_student_materials(&raw).unwrap();
        assert_eq!(
            materials.below_level.header.title.as_deref(),
            Some("Below")
        );
    }

    #[test]
    fn test_extracts_from_plain_fence() {
        let raw = "```\n{\"teacher_guide\": {\"metadata\": {\"title\": \"Plain\"}}}\n```";
        let guide = parse_teacher_guide(raw).unwrap();
        assert_eq!(guide.metadata.title.as_deref(), Some("Plain"));
    }

    #[test]
    fn test_brace_recovery_without_fence() {
        let raw = format!(
            "Sure! The JSON object is {} — hope that helps.",
            minimal_materials_json()
        );
        assert!(parse_student_materials(&raw).is_ok());
    }

    #[test]
    fn test_trailing_comma_signals_malformed_not_panic() {
        let raw = r#"{"teacher_guide": {"metadata": {"title": "T",}}}"#;
        let err = parse_teacher_guide(raw).unwrap_err();
        assert_eq!(err.raw, raw, "raw text preserved for diagnostics");
        assert!(err.reason.contains("not valid JSON"));
    }

    #[test]
    fn test_truncated_json_signals_malformed() {
        let err = parse_teacher_guide(r#"{"teacher_guide": {"metadata""#).unwrap_err();
        assert!(err.reason.contains("not valid JSON"));
    }

    #[test]
    fn test_empty_response_signals_malformed() {
        assert!(parse_teacher_guide("").is_err());
        assert!(parse_teacher_guide("I could not generate that.").is_err());
    }

    #[test]
    fn test_schema_violation_reports_validation_reason() {
        // Valid JSON, but below_level is missing its required keys.
        let raw = r#"{"student_materials": {"below_level": {}, "approaching_level": {}, "at_level": {}, "above_level": {}}}"#;
        let err = parse_student_materials(raw).unwrap_err();
        assert!(err.reason.contains("schema validation"), "{}", err.reason);
    }

    #[test]
    fn test_braces_inside_strings_do_not_confuse_recovery() {
        let raw = r#"Note {braces} ahead: {"teacher_guide": {"metadata": {"title": "a } in a string"}}}"#;
        // First '{' opens a non-JSON fragment; recovery must still fail it
        // cleanly rather than panic, or find a parseable object.
        let result = parse_teacher_guide(raw);
        if let Ok(guide) = result {
            assert_eq!(guide.metadata.title.as_deref(), Some("a } in a string"));
        }
    }

    #[test]
    fn test_outermost_braces_spans_nested_objects() {
        let text = r#"prefix {"a": {"b": 1}, "c": "x"} suffix"#;
        assert_eq!(outermost_braces(text), Some(r#"{"a": {"b": 1}, "c": "x"}"#));
    }

    #[test]
    fn test_strip_fences_no_fence_returns_trimmed() {
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }
}
