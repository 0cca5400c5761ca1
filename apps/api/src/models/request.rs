//! Teacher request model — the validated input to the generation pipeline.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::reference::ReferenceData;

pub const MAX_TOPIC_LEN: usize = 500;
pub const MIN_SESSION_MINUTES: u32 = 5;
pub const MAX_SESSION_MINUTES: u32 = 120;

/// Subject area. The four values are the only ones the reference catalogs
/// carry standards for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Subject {
    Math,
    #[serde(rename = "ELA")]
    Ela,
    Science,
    History,
}

impl Subject {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Math => "Math",
            Subject::Ela => "ELA",
            Subject::Science => "Science",
            Subject::History => "History",
        }
    }
}

/// What the session is for. Drives pacing guidance in the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningGoalType {
    Introduce,
    #[default]
    Practice,
    Assess,
    Remediate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupFormat {
    Individual,
    #[default]
    SmallGroup,
    WholeClass,
}

/// A curriculum generation request as posted to /generate.
///
/// Field names are the wire contract; `validate` enforces the bounds that
/// serde alone cannot express.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonRequest {
    /// Grade level, 0 = K.
    pub grade: u8,
    pub subject: Subject,
    pub topic: String,
    #[serde(default = "default_session_minutes")]
    pub session_length_minutes: u32,
    #[serde(default)]
    pub learning_goal_type: LearningGoalType,
    #[serde(default)]
    pub group_format: GroupFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pedagogical_approach: Option<String>,
    /// Model registry key; None selects the default model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

fn default_session_minutes() -> u32 {
    45
}

impl LessonRequest {
    /// Validates bounds and cross-references against the loaded catalogs.
    pub fn validate(&self, reference: &ReferenceData) -> Result<(), AppError> {
        if self.grade > 12 {
            return Err(AppError::Validation(format!(
                "grade must be 0 (K) through 12, got {}",
                self.grade
            )));
        }
        if self.topic.trim().is_empty() {
            return Err(AppError::Validation("topic cannot be empty".to_string()));
        }
        if self.topic.len() > MAX_TOPIC_LEN {
            return Err(AppError::Validation(format!(
                "topic exceeds {MAX_TOPIC_LEN} characters"
            )));
        }
        // Line breaks in the topic would let a request smuggle extra
        // instructions into the prompt.
        if self.topic.contains('\n') || self.topic.contains('\r') {
            return Err(AppError::Validation(
                "topic cannot contain line breaks".to_string(),
            ));
        }
        if !(MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(&self.session_length_minutes) {
            return Err(AppError::Validation(format!(
                "session_length_minutes must be {MIN_SESSION_MINUTES}-{MAX_SESSION_MINUTES}, got {}",
                self.session_length_minutes
            )));
        }
        if let Some(approach) = &self.pedagogical_approach {
            if reference.approach(approach).is_none() {
                return Err(AppError::Validation(format!(
                    "unknown pedagogical approach: {approach}"
                )));
            }
        }
        if let Some(model) = &self.model {
            if crate::llm_client::model_spec(model).is_none() {
                return Err(AppError::Validation(format!(
                    "unknown model: {model}. Available: {:?}",
                    crate::llm_client::model_keys()
                )));
            }
        }
        Ok(())
    }

    /// Grade label for display — "K" for kindergarten, the number otherwise.
    pub fn grade_label(&self) -> String {
        grade_label(self.grade)
    }
}

pub fn grade_label(grade: u8) -> String {
    if grade == 0 {
        "K".to_string()
    } else {
        grade.to_string()
    }
}
