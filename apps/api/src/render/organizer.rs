//! Graphic-organizer layout templates.
//!
//! Dispatches on the organizer's `type` tag to a fixed set of bordered-grid
//! and labeled-box templates. Unknown types (or known types with unusable
//! payloads, already downgraded by the parser) get a generic labeled box —
//! an organizer must never fail a handout.
//!
//! Returns the number of content boxes drawn: cause_effect draws exactly one
//! paired box per input pair, a ratio table one row per prefilled+blank row.

use crate::models::handout::{
    CauseEffect, GraphicOrganizer, RatioTable, StoryMap, VocabularyFourSquare,
};

use super::metrics::Face;
use super::page::PageWriter;
use super::style::{Tint, STYLE};

const ROW_HEIGHT: f64 = 8.0;
const SECTION_BOX_HEIGHT: f64 = 16.0;
const PAIR_BOX_HEIGHT: f64 = 18.0;
const QUADRANT_HEIGHT: f64 = 30.0;

pub fn render_organizer(w: &mut PageWriter, organizer: &GraphicOrganizer, accent: Tint) -> usize {
    tracing::debug!("Rendering graphic organizer: {}", organizer.type_tag());
    match organizer {
        GraphicOrganizer::RatioTable(table) => ratio_table(w, table, accent),
        GraphicOrganizer::StoryMap(map) => story_map(w, map, accent),
        GraphicOrganizer::VocabularyFourSquare(square) => four_square(w, square, accent),
        GraphicOrganizer::CauseEffect(pairs) => cause_effect(w, pairs, accent),
        GraphicOrganizer::Unknown { organizer_type, .. } => {
            generic_fallback(w, organizer_type, accent)
        }
    }
}

/// Bordered grid: bold header row, prefilled rows, then empty rows to fill in.
fn ratio_table(w: &mut PageWriter, table: &RatioTable, accent: Tint) -> usize {
    let columns = table.columns.len().max(1);
    let col_width = STYLE.text_width() / columns as f64;
    let data_rows = table.rows.len() + table.blank_rows as usize;
    let data_rows = data_rows.max(1);

    // Header row
    w.ensure_space(ROW_HEIGHT * 2.0);
    w.advance(ROW_HEIGHT);
    let header_bottom = w.y();
    w.filled_rect(
        STYLE.margin_left,
        header_bottom,
        STYLE.text_width(),
        ROW_HEIGHT,
        STYLE.ink_100,
    );
    for (i, label) in table.columns.iter().enumerate() {
        let x = STYLE.margin_left + i as f64 * col_width;
        w.stroked_rect(x, header_bottom, col_width, ROW_HEIGHT, accent, 0.9);
        w.text_at_xy(
            x + 2.0,
            header_bottom + 2.5,
            label,
            Face::Bold,
            STYLE.small_size,
            STYLE.ink_900,
        );
    }

    for row_index in 0..data_rows {
        w.ensure_space(ROW_HEIGHT);
        w.advance(ROW_HEIGHT);
        let row_bottom = w.y();
        for col in 0..columns {
            let x = STYLE.margin_left + col as f64 * col_width;
            w.stroked_rect(x, row_bottom, col_width, ROW_HEIGHT, STYLE.ink_200, 0.75);
            if let Some(cell) = table.rows.get(row_index).and_then(|r| r.get(col)) {
                w.text_at_xy(
                    x + 2.0,
                    row_bottom + 2.5,
                    cell,
                    Face::Regular,
                    STYLE.small_size,
                    STYLE.ink_700,
                );
            }
        }
    }
    w.advance(STYLE.item_gap);
    data_rows
}

/// Stacked labeled boxes, one per named section.
fn story_map(w: &mut PageWriter, map: &StoryMap, accent: Tint) -> usize {
    for section in &map.sections {
        w.ensure_space(SECTION_BOX_HEIGHT + STYLE.item_gap);
        w.advance(SECTION_BOX_HEIGHT);
        let bottom = w.y();
        w.stroked_rect(
            STYLE.margin_left,
            bottom,
            STYLE.text_width(),
            SECTION_BOX_HEIGHT,
            STYLE.ink_200,
            0.9,
        );
        w.filled_rect(STYLE.margin_left, bottom, 1.2, SECTION_BOX_HEIGHT, accent);
        w.text_at_xy(
            STYLE.margin_left + 4.0,
            bottom + SECTION_BOX_HEIGHT - 4.0,
            &section.label,
            Face::Bold,
            STYLE.small_size,
            accent,
        );
        if let Some(prompt) = &section.prompt {
            w.text_at_xy(
                STYLE.margin_left + 4.0,
                bottom + SECTION_BOX_HEIGHT - 9.0,
                prompt,
                Face::Regular,
                STYLE.small_size,
                STYLE.ink_500,
            );
        }
        w.advance(STYLE.item_gap);
    }
    map.sections.len()
}

/// 2x2 grid with the term centered above. Exactly four quadrants; extra
/// labels are ignored, missing ones drawn unlabeled.
fn four_square(w: &mut PageWriter, square: &VocabularyFourSquare, accent: Tint) -> usize {
    let grid_height = QUADRANT_HEIGHT * 2.0;
    w.ensure_space(grid_height + STYLE.leading(STYLE.h2_size) + 4.0);

    w.advance(STYLE.leading(STYLE.h2_size));
    w.text_at(STYLE.margin_left, &square.term, Face::Bold, STYLE.h2_size, accent);
    w.advance(2.0);

    let half_width = STYLE.text_width() / 2.0;
    w.advance(grid_height);
    let bottom = w.y();

    for quadrant in 0..4usize {
        let col = quadrant % 2;
        let row = quadrant / 2;
        let x = STYLE.margin_left + col as f64 * half_width;
        let y = bottom + (1 - row) as f64 * QUADRANT_HEIGHT;
        w.stroked_rect(x, y, half_width, QUADRANT_HEIGHT, STYLE.ink_200, 0.9);
        if let Some(label) = square.quadrants.get(quadrant) {
            w.text_at_xy(
                x + 2.5,
                y + QUADRANT_HEIGHT - 4.5,
                label,
                Face::Bold,
                STYLE.small_size,
                accent,
            );
        }
    }
    w.advance(STYLE.item_gap);
    4
}

/// Side-by-side cause/effect boxes joined by an arrow, one pair per input
/// pair — never fewer than the input count.
fn cause_effect(w: &mut PageWriter, organizer: &CauseEffect, accent: Tint) -> usize {
    let arrow_gap = 10.0;
    let box_width = (STYLE.text_width() - arrow_gap) / 2.0;

    for pair in &organizer.pairs {
        w.ensure_space(PAIR_BOX_HEIGHT + STYLE.item_gap);
        w.advance(PAIR_BOX_HEIGHT);
        let bottom = w.y();
        let effect_x = STYLE.margin_left + box_width + arrow_gap;

        w.stroked_rect(STYLE.margin_left, bottom, box_width, PAIR_BOX_HEIGHT, accent, 0.9);
        w.stroked_rect(effect_x, bottom, box_width, PAIR_BOX_HEIGHT, STYLE.ink_200, 0.9);

        w.text_at_xy(
            STYLE.margin_left + 2.5,
            bottom + PAIR_BOX_HEIGHT - 4.5,
            "Cause",
            Face::Bold,
            STYLE.small_size,
            accent,
        );
        w.text_at_xy(
            effect_x + 2.5,
            bottom + PAIR_BOX_HEIGHT - 4.5,
            "Effect",
            Face::Bold,
            STYLE.small_size,
            STYLE.ink_900,
        );
        w.text_at_xy(
            STYLE.margin_left + box_width + 2.5,
            bottom + PAIR_BOX_HEIGHT / 2.0,
            "->",
            Face::Bold,
            STYLE.h2_size,
            accent,
        );
        w.text_at_xy(
            STYLE.margin_left + 2.5,
            bottom + PAIR_BOX_HEIGHT - 10.0,
            &pair.cause,
            Face::Regular,
            STYLE.small_size,
            STYLE.ink_700,
        );
        w.text_at_xy(
            effect_x + 2.5,
            bottom + PAIR_BOX_HEIGHT - 10.0,
            &pair.effect,
            Face::Regular,
            STYLE.small_size,
            STYLE.ink_700,
        );
        w.advance(STYLE.item_gap);
    }
    organizer.pairs.len()
}

/// Generic labeled box for organizer types this renderer does not know.
fn generic_fallback(w: &mut PageWriter, organizer_type: &str, accent: Tint) -> usize {
    let height = 40.0;
    let label = if organizer_type.is_empty() {
        "Graphic Organizer".to_string()
    } else {
        format!("Graphic Organizer ({})", organizer_type.replace('_', " "))
    };

    w.ensure_space(height + STYLE.item_gap);
    w.advance(height);
    let bottom = w.y();
    w.stroked_rect(
        STYLE.margin_left,
        bottom,
        STYLE.text_width(),
        height,
        STYLE.ink_200,
        0.9,
    );
    w.filled_rect(STYLE.margin_left, bottom, 1.2, height, accent);
    w.text_at_xy(
        STYLE.margin_left + 4.0,
        bottom + height - 5.0,
        &label,
        Face::Bold,
        STYLE.small_size,
        accent,
    );
    w.advance(STYLE.item_gap);
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::handout::{CauseEffectPair, OrganizerSection};
    use crate::render::{DocumentKind, ReadinessLevel};
    use serde_json::json;

    fn writer() -> PageWriter {
        PageWriter::new(DocumentKind::Student(ReadinessLevel::Below), "organizer test").unwrap()
    }

    #[test]
    fn test_cause_effect_draws_one_box_per_pair() {
        let organizer = GraphicOrganizer::CauseEffect(CauseEffect {
            pairs: vec![
                CauseEffectPair {
                    cause: "Heat rises".into(),
                    effect: "Convection".into(),
                },
                CauseEffectPair {
                    cause: "Plates move".into(),
                    effect: "Earthquakes".into(),
                },
                CauseEffectPair {
                    cause: "Plates collide".into(),
                    effect: "Mountains".into(),
                },
            ],
        });
        let mut w = writer();
        assert_eq!(render_organizer(&mut w, &organizer, STYLE.below), 3);
    }

    #[test]
    fn test_ratio_table_rows_include_blanks() {
        let organizer = GraphicOrganizer::RatioTable(RatioTable {
            columns: vec!["Flour".into(), "Sugar".into()],
            rows: vec![vec!["2".into(), "3".into()]],
            blank_rows: 3,
        });
        let mut w = writer();
        assert_eq!(render_organizer(&mut w, &organizer, STYLE.below), 4);
    }

    #[test]
    fn test_ratio_table_without_rows_still_draws_a_row() {
        let organizer = GraphicOrganizer::RatioTable(RatioTable {
            columns: vec!["A".into()],
            rows: vec![],
            blank_rows: 0,
        });
        let mut w = writer();
        assert_eq!(render_organizer(&mut w, &organizer, STYLE.at), 1);
    }

    #[test]
    fn test_story_map_draws_each_section() {
        let organizer = GraphicOrganizer::StoryMap(StoryMap {
            sections: vec![
                OrganizerSection {
                    label: "Characters".into(),
                    prompt: Some("Who is in the story?".into()),
                },
                OrganizerSection {
                    label: "Setting".into(),
                    prompt: None,
                },
            ],
        });
        let mut w = writer();
        assert_eq!(render_organizer(&mut w, &organizer, STYLE.approaching), 2);
    }

    #[test]
    fn test_four_square_always_draws_four_quadrants() {
        let organizer = GraphicOrganizer::VocabularyFourSquare(VocabularyFourSquare {
            term: "ratio".into(),
            quadrants: vec!["Definition".into(), "Example".into()],
        });
        let mut w = writer();
        assert_eq!(render_organizer(&mut w, &organizer, STYLE.below), 4);
    }

    #[test]
    fn test_unknown_type_renders_generic_box() {
        let organizer: GraphicOrganizer =
            serde_json::from_value(json!({"type": "mystery_type"})).unwrap();
        let mut w = writer();
        assert_eq!(render_organizer(&mut w, &organizer, STYLE.below), 1);
    }

    #[test]
    fn test_many_pairs_overflow_across_pages() {
        let pairs: Vec<CauseEffectPair> = (0..30)
            .map(|i| CauseEffectPair {
                cause: format!("Cause {i}"),
                effect: format!("Effect {i}"),
            })
            .collect();
        let organizer = GraphicOrganizer::CauseEffect(CauseEffect { pairs });
        let mut w = writer();
        assert_eq!(render_organizer(&mut w, &organizer, STYLE.below), 30);
    }
}
