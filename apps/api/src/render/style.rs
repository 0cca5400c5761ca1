//! Shared style and icon tables for the document renderer.
//!
//! All five render routines consume these tables; none defines its own
//! colors, sizes, or glyphs. Divergence between routines is a defect, so the
//! constants live in exactly one place.

use printpdf::{Color, Rgb};

/// An sRGB color in the style palette. Converted to a printpdf color at draw
/// time; stored as plain components so the table can be `const`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Tint {
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Tint { r, g, b }
    }

    pub fn color(&self) -> Color {
        Color::Rgb(Rgb::new(self.r, self.g, self.b, None))
    }
}

/// The "Scholarly Modern" palette, font scale, and spacing constants.
pub struct StyleTable {
    // Ink (warm gray) ramp
    pub ink_900: Tint,
    pub ink_700: Tint,
    pub ink_500: Tint,
    pub ink_300: Tint,
    pub ink_200: Tint,
    pub ink_100: Tint,

    // Accents
    pub navy_700: Tint,
    pub navy_100: Tint,
    pub gold_600: Tint,
    pub gold_100: Tint,
    pub teal_600: Tint,

    // Readiness level accents
    pub below: Tint,
    pub below_light: Tint,
    pub approaching: Tint,
    pub approaching_light: Tint,
    pub at: Tint,
    pub at_light: Tint,
    pub above: Tint,
    pub above_light: Tint,

    // UDL principle accents
    pub udl_engagement: Tint,
    pub udl_representation: Tint,
    pub udl_action: Tint,

    // Font scale (pt)
    pub title_size: f64,
    pub h1_size: f64,
    pub h2_size: f64,
    pub body_size: f64,
    pub small_size: f64,

    // Page geometry (mm, US letter)
    pub page_width: f64,
    pub page_height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,

    // Vertical rhythm (mm)
    pub leading_factor: f64,
    pub section_gap: f64,
    pub item_gap: f64,
    pub workspace_line_height: f64,
}

impl StyleTable {
    pub fn text_width(&self) -> f64 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Baseline-to-baseline distance in mm for a font size in pt.
    pub fn leading(&self, font_size: f64) -> f64 {
        font_size * self.leading_factor * PT_TO_MM
    }
}

pub const PT_TO_MM: f64 = 25.4 / 72.0;

pub static STYLE: StyleTable = StyleTable {
    ink_900: Tint::rgb(0.102, 0.102, 0.180),
    ink_700: Tint::rgb(0.251, 0.251, 0.345),
    ink_500: Tint::rgb(0.478, 0.478, 0.549),
    ink_300: Tint::rgb(0.769, 0.769, 0.804),
    ink_200: Tint::rgb(0.878, 0.878, 0.902),
    ink_100: Tint::rgb(0.941, 0.941, 0.953),

    navy_700: Tint::rgb(0.118, 0.227, 0.373),
    navy_100: Tint::rgb(0.910, 0.933, 0.957),
    gold_600: Tint::rgb(0.722, 0.525, 0.043),
    gold_100: Tint::rgb(0.992, 0.965, 0.922),
    teal_600: Tint::rgb(0.051, 0.580, 0.533),

    below: Tint::rgb(0.863, 0.149, 0.149),
    below_light: Tint::rgb(0.996, 0.949, 0.949),
    approaching: Tint::rgb(0.918, 0.345, 0.047),
    approaching_light: Tint::rgb(1.0, 0.969, 0.929),
    at: Tint::rgb(0.086, 0.639, 0.290),
    at_light: Tint::rgb(0.941, 0.992, 0.957),
    above: Tint::rgb(0.486, 0.227, 0.929),
    above_light: Tint::rgb(0.961, 0.953, 1.0),

    udl_engagement: Tint::rgb(0.486, 0.227, 0.929),
    udl_representation: Tint::rgb(0.031, 0.569, 0.698),
    udl_action: Tint::rgb(0.022, 0.588, 0.412),

    title_size: 20.0,
    h1_size: 12.0,
    h2_size: 10.5,
    body_size: 9.5,
    small_size: 8.0,

    page_width: 215.9,
    page_height: 279.4,
    margin_left: 15.0,
    margin_right: 15.0,
    margin_top: 16.0,
    margin_bottom: 16.0,

    leading_factor: 1.35,
    section_gap: 5.0,
    item_gap: 2.0,
    workspace_line_height: 7.0,
};

/// Accent pair (strong, light) for a readiness level key.
pub fn level_accent(level: &str) -> (Tint, Tint) {
    match level {
        "below_level" => (STYLE.below, STYLE.below_light),
        "approaching_level" => (STYLE.approaching, STYLE.approaching_light),
        "at_level" => (STYLE.at, STYLE.at_light),
        "above_level" => (STYLE.above, STYLE.above_light),
        _ => (STYLE.navy_700, STYLE.navy_100),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Icon table
// ────────────────────────────────────────────────────────────────────────────

/// Symbolic key → glyph. The builtin Type1 fonts are WinAnsi-encoded, so
/// every glyph here must exist in WinAnsi (Latin-1 plus the 0x80-0x9F
/// extras); anything fancier would print as garbage.
static ICONS: &[(&str, &str)] = &[
    ("goal", "\u{2022}"),          // •
    ("objectives", "\u{2022}"),    // •
    ("structure", "\u{BB}"),       // »
    ("vocabulary", "\u{BB}"),      // »
    ("example", "\u{B6}"),         // ¶
    ("practice", "\u{2022}"),      // •
    ("application", "\u{A4}"),     // ¤
    ("challenge", "\u{A4}"),       // ¤
    ("organizer", "#"),
    ("frames", "\u{AB}"),          // «
    ("word_bank", "\u{AB}"),       // «
    ("differentiation", "\u{B1}"), // ±
    ("el_supports", "\u{B6}"),     // ¶
    ("materials", "\u{2022}"),     // •
    ("misconceptions", "\u{2020}"),// †
    ("discussion", "\u{B6}"),      // ¶
    ("assessment", "\u{A7}"),      // §
    ("extension", "\u{A4}"),       // ¤
    ("standards", "\u{A7}"),       // §
    ("udl", "\u{A7}"),             // §
];

pub fn icon(key: &str) -> &'static str {
    ICONS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, glyph)| *glyph)
        .unwrap_or("\u{2022}")
}

/// Transliterates text to WinAnsi-printable characters. Model output is full
/// of arrows and math glyphs the builtin fonts cannot encode.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2192}' => out.push_str("->"),
            '\u{2190}' => out.push_str("<-"),
            '\u{2212}' => out.push('-'),
            '\u{2713}' | '\u{2714}' => out.push('*'),
            '\u{2264}' => out.push_str("<="),
            '\u{2265}' => out.push_str(">="),
            '\u{2248}' => out.push('~'),
            '\u{00A0}' => out.push(' '),
            c if winansi_printable(c) => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn winansi_printable(c: char) -> bool {
    let code = c as u32;
    matches!(code,
        0x20..=0x7E
        | 0xA1..=0xFF
        // The WinAnsi 0x80-0x9F extras actually mapped to glyphs
        | 0x2013 | 0x2014                   // – —
        | 0x2018 | 0x2019 | 0x201C | 0x201D // ‘ ’ “ ”
        | 0x2022 | 0x2026 | 0x2030 | 0x20AC // • … ‰ €
        | 0x2122                            // ™
    )
}
