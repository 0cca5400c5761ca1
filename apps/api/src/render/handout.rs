//! Student handout render routine, shared by the four readiness levels.
//!
//! The per-level structs have different key sets, so each level is first
//! flattened into a `HandoutView` naming which sections exist; one routine
//! then draws whatever the view carries. Accent colors come from the shared
//! level table so a handout's tier is visible at a glance.

use std::path::Path;

use crate::models::handout::{
    AboveLevelHandout, ApplicationProblem, ApproachingLevelHandout, AtLevelHandout,
    BelowLevelHandout, ExtensionChallenge, GraphicOrganizer, GuidedPracticeItem, HandoutHeader,
    StudentMaterials, VocabularyTerm, WorkedExample,
};

use super::metrics::{self, Face};
use super::organizer::render_organizer;
use super::page::PageWriter;
use super::style::{level_accent, Tint, STYLE};
use super::{DocumentKind, ReadinessLevel, RenderError};

/// The slice of a handout the drawing routine consumes. `None` sections are
/// simply absent at that level.
struct HandoutView<'a> {
    header: &'a HandoutHeader,
    vocabulary: &'a [VocabularyTerm],
    worked_example: &'a WorkedExample,
    guided_practice: Option<&'a [GuidedPracticeItem]>,
    graphic_organizer: Option<&'a GraphicOrganizer>,
    sentence_frames: Option<&'a [String]>,
    word_bank: Option<&'a [String]>,
    application_problem: Option<&'a ApplicationProblem>,
    extension_challenge: Option<&'a ExtensionChallenge>,
}

impl<'a> HandoutView<'a> {
    fn below(h: &'a BelowLevelHandout) -> Self {
        HandoutView {
            header: &h.header,
            vocabulary: &h.vocabulary,
            worked_example: &h.worked_example,
            guided_practice: Some(&h.guided_practice),
            graphic_organizer: Some(&h.graphic_organizer),
            sentence_frames: Some(&h.sentence_frames),
            word_bank: Some(&h.word_bank),
            application_problem: None,
            extension_challenge: None,
        }
    }

    fn approaching(h: &'a ApproachingLevelHandout) -> Self {
        HandoutView {
            header: &h.header,
            vocabulary: &h.vocabulary,
            worked_example: &h.worked_example,
            guided_practice: Some(&h.guided_practice),
            graphic_organizer: Some(&h.graphic_organizer),
            sentence_frames: Some(&h.sentence_frames),
            word_bank: None,
            application_problem: None,
            extension_challenge: None,
        }
    }

    fn at(h: &'a AtLevelHandout) -> Self {
        HandoutView {
            header: &h.header,
            vocabulary: &h.vocabulary,
            worked_example: &h.worked_example,
            guided_practice: Some(&h.guided_practice),
            graphic_organizer: None,
            sentence_frames: None,
            word_bank: None,
            application_problem: Some(&h.application_problem),
            extension_challenge: None,
        }
    }

    fn above(h: &'a AboveLevelHandout) -> Self {
        HandoutView {
            header: &h.header,
            vocabulary: &h.vocabulary,
            worked_example: &h.worked_example,
            guided_practice: None,
            graphic_organizer: None,
            sentence_frames: None,
            word_bank: None,
            application_problem: None,
            extension_challenge: Some(&h.extension_challenge),
        }
    }
}

pub fn render(
    level: ReadinessLevel,
    materials: &StudentMaterials,
    path: &Path,
) -> Result<(), RenderError> {
    let view = match level {
        ReadinessLevel::Below => HandoutView::below(&materials.below_level),
        ReadinessLevel::Approaching => HandoutView::approaching(&materials.approaching_level),
        ReadinessLevel::At => HandoutView::at(&materials.at_level),
        ReadinessLevel::Above => HandoutView::above(&materials.above_level),
    };
    render_view(level, &view, path)
}

fn render_view(
    level: ReadinessLevel,
    view: &HandoutView<'_>,
    path: &Path,
) -> Result<(), RenderError> {
    let document = DocumentKind::Student(level);
    let title = view.header.title.as_deref().ok_or(RenderError::MissingField {
        document,
        field: "header.title",
    })?;
    let (accent, accent_light) = level_accent(level.key());

    let mut w = PageWriter::new(document, title)?;

    header_band(&mut w, title, view.header, level, accent, accent_light);

    if !view.vocabulary.is_empty() {
        w.section("vocabulary", "VOCABULARY", accent);
        for term in view.vocabulary {
            w.label_line(&format!("{}:", term.term), &term.definition, accent);
            if let Some(example) = &term.example {
                w.hint(&format!("Example: {example}"));
            }
            if let Some(visual) = &term.visual_description {
                w.hint(&format!("Picture: {visual}"));
            }
        }
    }

    worked_example_section(&mut w, view.worked_example, accent);

    if let Some(problems) = view.guided_practice {
        if !problems.is_empty() {
            w.section("practice", "GUIDED PRACTICE", accent);
            for (i, item) in problems.iter().enumerate() {
                w.label_line(&format!("{}.", i + 1), &item.problem, STYLE.ink_900);
                if let Some(support) = item.support_text() {
                    w.hint(&format!("Hint: {support}"));
                }
                w.workspace(3, accent);
            }
        }
    }

    if let Some(application) = view.application_problem {
        w.section("application", "APPLY IT", accent);
        if let Some(context) = &application.context {
            w.body(context);
        }
        if let Some(question) = &application.question {
            w.label_line("Question:", question, STYLE.ink_900);
        }
        w.workspace(5, accent);
    }

    if let Some(challenge) = view.extension_challenge {
        let heading = match &challenge.title {
            Some(title) => format!("EXTENSION CHALLENGE: {title}"),
            None => "EXTENSION CHALLENGE".to_string(),
        };
        w.section("challenge", &heading, accent);
        if let Some(description) = &challenge.description {
            w.body(description);
        }
        for question in &challenge.guiding_questions {
            w.bullet(question, accent);
        }
        w.workspace(6, accent);
    }

    if let Some(organizer) = view.graphic_organizer {
        w.section("organizer", "GRAPHIC ORGANIZER", accent);
        render_organizer(&mut w, organizer, accent);
    }

    if let Some(frames) = view.sentence_frames {
        if !frames.is_empty() {
            w.section("frames", "SENTENCE FRAMES", accent);
            for frame in frames {
                w.bullet(frame, accent);
            }
        }
    }

    if let Some(words) = view.word_bank {
        if !words.is_empty() {
            word_bank_box(&mut w, words, accent, accent_light);
        }
    }

    w.finish(path)
}

/// Title row with a name/date line, level tag, accent bar, and goal band.
fn header_band(
    w: &mut PageWriter,
    title: &str,
    header: &HandoutHeader,
    level: ReadinessLevel,
    accent: Tint,
    accent_light: Tint,
) {
    w.advance(STYLE.leading(STYLE.title_size));
    w.text_at(STYLE.margin_left, title, Face::Bold, STYLE.title_size, STYLE.ink_900);
    w.text_at_xy(
        STYLE.page_width - STYLE.margin_right - 55.0,
        w.y(),
        "Name: ____________________",
        Face::Regular,
        STYLE.small_size,
        STYLE.ink_500,
    );
    w.advance(STYLE.leading(STYLE.small_size));
    w.text_at(
        STYLE.margin_left,
        level.display_name(),
        Face::Regular,
        STYLE.small_size,
        accent,
    );
    w.text_at_xy(
        STYLE.page_width - STYLE.margin_right - 55.0,
        w.y(),
        "Date: __________",
        Face::Regular,
        STYLE.small_size,
        STYLE.ink_500,
    );
    w.advance(2.0);
    w.filled_rect(STYLE.margin_left, w.y() - 1.2, STYLE.text_width(), 1.2, accent);
    w.advance(STYLE.section_gap);

    let goal = header
        .i_can_statement
        .as_deref()
        .or(header.student_objective.as_deref());
    if let Some(goal) = goal {
        let text = format!("TODAY'S GOAL:  {goal}");
        let lines = metrics::wrap(
            Face::Bold,
            &text,
            STYLE.h2_size,
            STYLE.text_width() - 8.0,
        );
        let height = lines.len() as f64 * STYLE.leading(STYLE.h2_size) + 4.0;
        w.ensure_space(height + 2.0);
        w.advance(2.0);
        let top = w.y();
        w.filled_rect(STYLE.margin_left, top - height, STYLE.text_width(), height, accent_light);
        w.stroked_rect(STYLE.margin_left, top - height, STYLE.text_width(), height, accent, 1.2);
        for (i, line) in lines.iter().enumerate() {
            w.text_at_xy(
                STYLE.margin_left + 4.0,
                top - (i + 1) as f64 * STYLE.leading(STYLE.h2_size),
                line,
                Face::Bold,
                STYLE.h2_size,
                accent,
            );
        }
        w.advance(height + STYLE.section_gap);
    }
}

fn worked_example_section(w: &mut PageWriter, example: &WorkedExample, accent: Tint) {
    let has_content = example.problem.is_some()
        || !example.steps.is_empty()
        || example.solution.is_some()
        || example.solution_summary.is_some();
    if !has_content {
        return;
    }

    w.section("example", "EXAMPLE", accent);
    if let Some(problem) = &example.problem {
        w.label_line("Problem:", problem, STYLE.ink_900);
    }
    for step in &example.steps {
        let text = match &step.result {
            Some(result) => format!("{}  ->  {result}", step.action),
            None => step.action.clone(),
        };
        w.label_line(&format!("{}.", step.step_number), &text, accent);
    }
    if let Some(summary) = &example.solution_summary {
        w.label_line("How it works:", summary, STYLE.ink_700);
    }
    if let Some(solution) = &example.solution {
        w.label_line("Answer:", solution, STYLE.at);
    }
}

/// Boxed word bank, centered content row — below-level only.
fn word_bank_box(w: &mut PageWriter, words: &[String], accent: Tint, accent_light: Tint) {
    let joined = words.join("   \u{2022}   ");
    let text = format!("WORD BANK:  {joined}");
    let lines = metrics::wrap(Face::Bold, &text, STYLE.body_size, STYLE.text_width() - 8.0);
    let height = lines.len() as f64 * STYLE.leading(STYLE.body_size) + 4.0;

    w.ensure_space(height + STYLE.section_gap);
    w.advance(STYLE.section_gap);
    let top = w.y();
    w.filled_rect(STYLE.margin_left, top - height, STYLE.text_width(), height, accent_light);
    w.stroked_rect(STYLE.margin_left, top - height, STYLE.text_width(), height, accent, 1.2);
    for (i, line) in lines.iter().enumerate() {
        w.text_at_xy(
            STYLE.margin_left + 4.0,
            top - (i + 1) as f64 * STYLE.leading(STYLE.body_size),
            line,
            Face::Bold,
            STYLE.body_size,
            accent,
        );
    }
    w.advance(height);
}
