//! Teacher guide render routine.
//!
//! Section order follows the printed guide teachers actually use: header and
//! standards, objectives, the session timeline, then the planning aids
//! (differentiation, EL supports, materials, misconceptions, prompts, UDL).
//! Missing optional sections are omitted; only `metadata.title` aborts.

use std::path::Path;

use crate::models::curriculum::TeacherGuide;
use crate::models::request::grade_label;

use super::page::PageWriter;
use super::style::{level_accent, STYLE};
use super::{DocumentKind, RenderError};

pub fn render(guide: &TeacherGuide, path: &Path) -> Result<(), RenderError> {
    let title = guide
        .metadata
        .title
        .as_deref()
        .ok_or(RenderError::MissingField {
            document: DocumentKind::TeacherGuide,
            field: "metadata.title",
        })?;

    let mut w = PageWriter::new(DocumentKind::TeacherGuide, title)?;

    w.title_band(title, &subtitle_line(guide), STYLE.navy_700);

    if !guide.metadata.standards_addressed.is_empty() {
        let badges: Vec<String> = guide
            .metadata
            .standards_addressed
            .iter()
            .map(|s| format!("[{s}]"))
            .collect();
        w.label_line("Standards:", &badges.join("  "), STYLE.gold_600);
    }
    if let Some(approach) = &guide.metadata.pedagogical_approach {
        w.label_line("Approach:", &approach.name, STYLE.navy_700);
        if let Some(rationale) = &approach.rationale {
            w.small(rationale);
        }
    }

    if !guide.learning_objectives.is_empty() {
        w.section("objectives", "LEARNING OBJECTIVES", STYLE.gold_600);
        for objective in &guide.learning_objectives {
            w.label_line("Objective:", &objective.objective, STYLE.ink_900);
            if let Some(criteria) = &objective.success_criteria {
                w.label_line("Success criteria:", criteria, STYLE.ink_500);
            }
            w.advance(STYLE.item_gap);
        }
    }

    if !guide.session_structure.phases.is_empty() {
        let total = guide.session_structure.total_minutes();
        let heading = if total > 0 {
            format!("SESSION STRUCTURE  ({total} MIN)")
        } else {
            "SESSION STRUCTURE".to_string()
        };
        w.section("structure", &heading, STYLE.navy_700);
        for phase in &guide.session_structure.phases {
            let heading = match phase.duration_minutes {
                Some(minutes) => format!("{}  ({minutes} min)", phase.name),
                None => phase.name.clone(),
            };
            w.subheading(&heading, STYLE.navy_700);
            if let Some(description) = &phase.description {
                w.body(description);
            }
            if let Some(actions) = &phase.teacher_actions {
                w.label_line("Teacher:", actions, STYLE.ink_700);
            }
            if let Some(actions) = &phase.student_actions {
                w.label_line("Students:", actions, STYLE.ink_700);
            }
            for point in &phase.key_points {
                w.bullet(point, STYLE.navy_700);
            }
            if let Some(note) = &phase.differentiation_note {
                w.hint(note);
            }
            w.advance(STYLE.item_gap);
        }
        if let Some(exit) = &guide.session_structure.exit_assessment {
            let label = exit
                .assessment_type
                .as_deref()
                .unwrap_or("Exit assessment");
            w.label_line(
                &format!("{label}:"),
                exit.description.as_deref().unwrap_or(""),
                STYLE.gold_600,
            );
        }
    }

    if let Some(diff) = &guide.differentiation_overview {
        w.section("differentiation", "DIFFERENTIATION GUIDE", STYLE.navy_700);
        let levels = [
            ("below_level", "Below Level", &diff.below_level),
            ("approaching_level", "Approaching Level", &diff.approaching_level),
            ("at_level", "At Level", &diff.at_level),
            ("above_level", "Above Level", &diff.above_level),
        ];
        for (key, name, plan) in levels {
            let (accent, _) = level_accent(key);
            w.subheading(name, accent);
            if let Some(focus) = &plan.focus {
                w.label_line("Focus:", focus, STYLE.ink_900);
            }
            for scaffold in &plan.key_scaffolds {
                w.bullet(scaffold, accent);
            }
            if let Some(monitor) = &plan.monitor_for {
                w.label_line("Monitor for:", monitor, STYLE.ink_500);
            }
            w.advance(STYLE.item_gap);
        }
    }

    if let Some(el) = &guide.el_supports {
        w.section("el_supports", "ENGLISH LEARNER SUPPORTS", STYLE.teal_600);
        w.label_line("Emerging:", &el.emerging, STYLE.teal_600);
        w.label_line("Expanding:", &el.expanding, STYLE.teal_600);
        w.label_line("Bridging:", &el.bridging, STYLE.teal_600);
    }

    if !guide.materials_list.is_empty() {
        w.section("materials", "MATERIALS NEEDED", STYLE.gold_600);
        for material in &guide.materials_list {
            w.bullet(material, STYLE.gold_600);
        }
    }

    if !guide.common_misconceptions.is_empty() {
        w.section("misconceptions", "COMMON MISCONCEPTIONS", STYLE.below);
        for item in &guide.common_misconceptions {
            w.label_line("Misconception:", &item.misconception, STYLE.below);
            if let Some(remedy) = &item.how_to_address {
                w.label_line("Address by:", remedy, STYLE.at);
            }
            w.advance(STYLE.item_gap);
        }
    }

    if !guide.discussion_prompts.is_empty() {
        w.section("discussion", "DISCUSSION PROMPTS", STYLE.navy_700);
        for prompt in &guide.discussion_prompts {
            w.bullet(prompt, STYLE.navy_700);
        }
    }

    if !guide.assessment_ideas.is_empty() {
        w.section("assessment", "ASSESSMENT IDEAS", STYLE.navy_700);
        for idea in &guide.assessment_ideas {
            w.bullet(idea, STYLE.navy_700);
        }
    }

    if !guide.extension_ideas.is_empty() {
        w.section("extension", "EXTENSION IDEAS", STYLE.above);
        for idea in &guide.extension_ideas {
            w.bullet(idea, STYLE.above);
        }
    }

    if let Some(udl) = &guide.udl_alignment {
        w.section("udl", "UDL ALIGNMENT", STYLE.udl_engagement);
        if let Some(summary) = &udl.summary {
            w.body(summary);
        }
        let principles = [
            ("Engagement", STYLE.udl_engagement, &udl.engagement),
            ("Representation", STYLE.udl_representation, &udl.representation),
            ("Action & Expression", STYLE.udl_action, &udl.action_expression),
        ];
        for (name, accent, principle) in principles {
            let checkpoints: Vec<String> = principle
                .checkpoints_addressed
                .iter()
                .map(|c| format!("[{c}]"))
                .collect();
            let heading = if checkpoints.is_empty() {
                name.to_string()
            } else {
                format!("{name}  {}", checkpoints.join(" "))
            };
            w.subheading(&heading, accent);
            w.small(&principle.how_addressed);
        }
    }

    w.finish(path)
}

fn subtitle_line(guide: &TeacherGuide) -> String {
    let meta = &guide.metadata;
    let mut parts: Vec<String> = Vec::new();
    if let Some(grade) = meta.grade {
        parts.push(format!("Grade {}", grade_label(grade)));
    }
    if let Some(subject) = &meta.subject {
        parts.push(subject.clone());
    }
    if let Some(topic) = &meta.topic {
        parts.push(topic.clone());
    }
    if let Some(minutes) = meta.duration_minutes {
        parts.push(format!("{minutes} min"));
    }
    parts.join(" \u{2022} ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subtitle_joins_present_metadata() {
        let guide: TeacherGuide = serde_json::from_value(json!({
            "metadata": {"title": "T", "grade": 0, "subject": "Math", "duration_minutes": 45}
        }))
        .unwrap();
        assert_eq!(subtitle_line(&guide), "Grade K \u{2022} Math \u{2022} 45 min");
    }

    #[test]
    fn test_minimal_guide_renders() {
        let guide: TeacherGuide =
            serde_json::from_value(json!({"metadata": {"title": "Minimal"}})).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minimal.pdf");
        render(&guide, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_missing_title_is_a_named_render_error() {
        let guide = TeacherGuide::default();
        let dir = tempfile::tempdir().unwrap();
        let err = render(&guide, &dir.path().join("x.pdf")).unwrap_err();
        assert!(matches!(err, RenderError::MissingField { field: "metadata.title", .. }));
    }
}
