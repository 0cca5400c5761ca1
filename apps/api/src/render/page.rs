//! PageWriter — a top-down cursor over a printpdf document.
//!
//! Every routine draws through this type: it owns the page-break policy
//! (a block that will not fit in the remaining height starts a new page) and
//! the page-number pass at finish time. Coordinates handed to printpdf are
//! mm from the bottom-left corner; the cursor tracks the next baseline.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerIndex,
    PdfLayerReference, PdfPageIndex, Point,
};

use super::metrics::{self, Face};
use super::style::{icon, sanitize, Tint, STYLE};
use super::{DocumentKind, RenderError};

pub struct PageWriter {
    kind: DocumentKind,
    doc: PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    current: (PdfPageIndex, PdfLayerIndex),
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
    /// Next baseline, mm above the bottom edge.
    y: f64,
}

impl PageWriter {
    pub fn new(kind: DocumentKind, doc_title: &str) -> Result<Self, RenderError> {
        let (doc, page, layer) = PdfDocument::new(
            doc_title,
            Mm(STYLE.page_width),
            Mm(STYLE.page_height),
            "content",
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| pdf_error(kind, e))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| pdf_error(kind, e))?;
        let oblique = doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(|e| pdf_error(kind, e))?;

        Ok(PageWriter {
            kind,
            doc,
            pages: vec![(page, layer)],
            current: (page, layer),
            regular,
            bold,
            oblique,
            y: STYLE.page_height - STYLE.margin_top,
        })
    }

    fn layer(&self) -> PdfLayerReference {
        self.doc.get_page(self.current.0).get_layer(self.current.1)
    }

    fn font(&self, face: Face) -> &IndirectFontRef {
        match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
        }
    }

    /// Starts a new page when fewer than `needed` mm remain above the bottom
    /// margin.
    pub fn ensure_space(&mut self, needed: f64) {
        if self.y - needed < STYLE.margin_bottom {
            let (page, layer) = self.doc.add_page(
                Mm(STYLE.page_width),
                Mm(STYLE.page_height),
                "content",
            );
            self.pages.push((page, layer));
            self.current = (page, layer);
            self.y = STYLE.page_height - STYLE.margin_top;
        }
    }

    pub fn advance(&mut self, mm: f64) {
        self.y -= mm;
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Draws one line of text at the current baseline without moving the
    /// cursor. Text is transliterated to WinAnsi here, in one place.
    pub fn text_at(&self, x: f64, text: &str, face: Face, size: f64, tint: Tint) {
        let layer = self.layer();
        layer.set_fill_color(tint.color());
        layer.use_text(sanitize(text), size, Mm(x), Mm(self.y), self.font(face));
    }

    /// Text at an explicit baseline, independent of the cursor — used by the
    /// organizer templates, which place text inside fixed boxes.
    pub fn text_at_xy(&self, x: f64, y: f64, text: &str, face: Face, size: f64, tint: Tint) {
        let layer = self.layer();
        layer.set_fill_color(tint.color());
        layer.use_text(sanitize(text), size, Mm(x), Mm(y), self.font(face));
    }

    fn oblique_at(&self, x: f64, text: &str, size: f64, tint: Tint) {
        let layer = self.layer();
        layer.set_fill_color(tint.color());
        layer.use_text(sanitize(text), size, Mm(x), Mm(self.y), &self.oblique);
    }

    /// Word-wrapped paragraph starting at `x`, `width` mm wide.
    pub fn wrapped(&mut self, text: &str, face: Face, size: f64, x: f64, width: f64, tint: Tint) {
        let clean = sanitize(text);
        let leading = STYLE.leading(size);
        for line in metrics::wrap(face, &clean, size, width) {
            self.ensure_space(leading);
            self.advance(leading);
            self.text_at(x, &line, face, size, tint);
        }
    }

    pub fn body(&mut self, text: &str) {
        self.wrapped(
            text,
            Face::Regular,
            STYLE.body_size,
            STYLE.margin_left,
            STYLE.text_width(),
            STYLE.ink_700,
        );
    }

    pub fn small(&mut self, text: &str) {
        self.wrapped(
            text,
            Face::Regular,
            STYLE.small_size,
            STYLE.margin_left,
            STYLE.text_width(),
            STYLE.ink_500,
        );
    }

    /// Italic helper text on a gold band, indented — hints and scaffolds.
    pub fn hint(&mut self, text: &str) {
        let clean = sanitize(text);
        let size = STYLE.small_size;
        let leading = STYLE.leading(size);
        let x = STYLE.margin_left + 5.0;
        let lines = metrics::wrap(Face::Regular, &clean, size, STYLE.text_width() - 5.0);
        if lines.is_empty() {
            return;
        }
        let height = lines.len() as f64 * leading + 1.5;
        self.ensure_space(height);
        self.filled_rect(
            x - 2.0,
            self.y - height,
            STYLE.text_width() - 3.0,
            height,
            STYLE.gold_100,
        );
        for line in &lines {
            self.advance(leading);
            self.oblique_at(x, line, size, STYLE.ink_500);
        }
        self.advance(1.5);
    }

    /// `Label:` in bold followed by wrapped regular text.
    pub fn label_line(&mut self, label: &str, value: &str, tint: Tint) {
        let size = STYLE.body_size;
        let label_width = metrics::text_width_mm(Face::Bold, label, size);
        let value_width = metrics::text_width_mm(Face::Regular, value, size);
        let available = STYLE.text_width() - label_width - 2.0;

        let leading = STYLE.leading(size);
        self.ensure_space(leading);
        self.advance(leading);
        self.text_at(STYLE.margin_left, label, Face::Bold, size, tint);

        if value_width <= available {
            self.text_at(
                STYLE.margin_left + label_width + 2.0,
                value,
                Face::Regular,
                size,
                STYLE.ink_700,
            );
        } else {
            self.wrapped(
                value,
                Face::Regular,
                size,
                STYLE.margin_left + 4.0,
                STYLE.text_width() - 4.0,
                STYLE.ink_700,
            );
        }
    }

    /// Accent-colored bullet with wrapped text.
    pub fn bullet(&mut self, text: &str, accent: Tint) {
        let size = STYLE.small_size;
        let leading = STYLE.leading(size);
        let clean = sanitize(text);
        let indent = STYLE.margin_left + 4.0;
        let mut first = true;
        for line in metrics::wrap(Face::Regular, &clean, size, STYLE.text_width() - 4.0) {
            self.ensure_space(leading);
            self.advance(leading);
            if first {
                self.text_at(STYLE.margin_left, "\u{2022}", Face::Regular, size, accent);
                first = false;
            }
            self.text_at(indent, &line, Face::Regular, size, STYLE.ink_700);
        }
    }

    /// Document title band: title, dotted metadata line, accent rule.
    pub fn title_band(&mut self, title: &str, subtitle: &str, accent: Tint) {
        self.advance(STYLE.leading(STYLE.title_size));
        self.text_at(
            STYLE.margin_left,
            title,
            Face::Bold,
            STYLE.title_size,
            STYLE.ink_900,
        );
        if !subtitle.is_empty() {
            self.advance(STYLE.leading(STYLE.body_size));
            self.text_at(
                STYLE.margin_left,
                subtitle,
                Face::Regular,
                STYLE.body_size,
                STYLE.ink_500,
            );
        }
        self.advance(2.5);
        self.filled_rect(STYLE.margin_left, self.y - 1.2, STYLE.text_width(), 1.2, accent);
        self.advance(STYLE.section_gap);
    }

    /// Labeled section header: gray band, accent left bar, icon + heading.
    pub fn section(&mut self, icon_key: &str, heading: &str, accent: Tint) {
        let band_height = 7.0;
        // Keep the header attached to at least a line of its body.
        self.ensure_space(band_height + STYLE.leading(STYLE.body_size) * 2.0);
        self.advance(STYLE.section_gap);

        let band_bottom = self.y - band_height;
        self.filled_rect(
            STYLE.margin_left,
            band_bottom,
            STYLE.text_width(),
            band_height,
            STYLE.ink_100,
        );
        self.filled_rect(STYLE.margin_left, band_bottom, 1.4, band_height, accent);

        self.advance(band_height - 2.0);
        self.text_at(
            STYLE.margin_left + 4.0,
            icon(icon_key),
            Face::Bold,
            STYLE.h1_size,
            accent,
        );
        self.text_at(
            STYLE.margin_left + 9.0,
            heading,
            Face::Bold,
            STYLE.h1_size,
            STYLE.ink_900,
        );
        self.advance(2.0 + STYLE.item_gap);
    }

    /// Subheading in the accent color.
    pub fn subheading(&mut self, text: &str, accent: Tint) {
        let leading = STYLE.leading(STYLE.h2_size);
        self.ensure_space(leading + STYLE.leading(STYLE.body_size));
        self.advance(leading + 1.0);
        self.text_at(STYLE.margin_left, text, Face::Bold, STYLE.h2_size, accent);
    }

    /// Bordered, accent-barred work area with faint guide lines.
    pub fn workspace(&mut self, lines: u32, accent: Tint) {
        let height = f64::from(lines.max(1)) * STYLE.workspace_line_height + 3.0;
        self.ensure_space(height + 2.0);
        self.advance(2.0);
        let top = self.y;
        let bottom = top - height;

        self.stroked_rect(STYLE.margin_left, bottom, STYLE.text_width(), height, STYLE.ink_200, 0.9);
        self.filled_rect(STYLE.margin_left, bottom, 1.2, height, accent);
        for i in 1..=lines {
            let line_y = top - f64::from(i) * STYLE.workspace_line_height;
            self.hline(
                STYLE.margin_left + 4.0,
                STYLE.page_width - STYLE.margin_right - 4.0,
                line_y,
                STYLE.ink_300,
                0.5,
            );
        }
        self.advance(height + STYLE.item_gap);
    }

    // ── Primitive shapes ───────────────────────────────────────────────────

    pub fn filled_rect(&self, x: f64, y_bottom: f64, width: f64, height: f64, tint: Tint) {
        let layer = self.layer();
        layer.set_fill_color(tint.color());
        layer.add_shape(rect(x, y_bottom, width, height, true, false));
    }

    pub fn stroked_rect(
        &self,
        x: f64,
        y_bottom: f64,
        width: f64,
        height: f64,
        tint: Tint,
        thickness: f64,
    ) {
        let layer = self.layer();
        layer.set_outline_color(tint.color());
        layer.set_outline_thickness(thickness);
        layer.add_shape(rect(x, y_bottom, width, height, false, true));
    }

    pub fn hline(&self, x1: f64, x2: f64, y: f64, tint: Tint, thickness: f64) {
        let layer = self.layer();
        layer.set_outline_color(tint.color());
        layer.set_outline_thickness(thickness);
        layer.add_shape(Line {
            points: vec![
                (Point::new(Mm(x1), Mm(y)), false),
                (Point::new(Mm(x2), Mm(y)), false),
            ],
            is_closed: false,
            has_fill: false,
            has_stroke: true,
            is_clipping_path: false,
        });
    }

    /// Stamps page numbers (documents longer than one page only) and writes
    /// the file.
    pub fn finish(self, path: &Path) -> Result<(), RenderError> {
        let total = self.pages.len();
        if total > 1 {
            for (i, (page, layer_idx)) in self.pages.iter().enumerate() {
                let label = format!("Page {} of {}", i + 1, total);
                let width = metrics::text_width_mm(Face::Regular, &label, STYLE.small_size);
                let layer: PdfLayerReference = self.doc.get_page(*page).get_layer(*layer_idx);
                layer.set_fill_color(STYLE.ink_500.color());
                layer.use_text(
                    label,
                    STYLE.small_size,
                    Mm(STYLE.page_width - STYLE.margin_right - width),
                    Mm(STYLE.margin_bottom * 0.5),
                    &self.regular,
                );
            }
        }

        let file = File::create(path).map_err(|e| RenderError::Io {
            document: self.kind,
            message: e.to_string(),
        })?;
        let kind = self.kind;
        self.doc
            .save(&mut BufWriter::new(file))
            .map_err(|e| pdf_error(kind, e))
    }
}

fn pdf_error(document: DocumentKind, e: impl std::fmt::Display) -> RenderError {
    RenderError::Pdf {
        document,
        message: e.to_string(),
    }
}

fn rect(x: f64, y_bottom: f64, width: f64, height: f64, fill: bool, stroke: bool) -> Line {
    Line {
        points: vec![
            (Point::new(Mm(x), Mm(y_bottom)), false),
            (Point::new(Mm(x + width), Mm(y_bottom)), false),
            (Point::new(Mm(x + width), Mm(y_bottom + height)), false),
            (Point::new(Mm(x), Mm(y_bottom + height)), false),
        ],
        is_closed: true,
        has_fill: fill,
        has_stroke: stroke,
        is_clipping_path: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_starts_below_top_margin() {
        let writer = PageWriter::new(DocumentKind::TeacherGuide, "t").unwrap();
        assert!((writer.y() - (STYLE.page_height - STYLE.margin_top)).abs() < 1e-9);
    }

    #[test]
    fn test_ensure_space_breaks_page_near_bottom() {
        let mut writer = PageWriter::new(DocumentKind::TeacherGuide, "t").unwrap();
        writer.advance(STYLE.page_height - STYLE.margin_top - STYLE.margin_bottom - 5.0);
        writer.ensure_space(20.0);
        assert_eq!(writer.pages.len(), 2);
        assert!((writer.y() - (STYLE.page_height - STYLE.margin_top)).abs() < 1e-9);
    }

    #[test]
    fn test_ensure_space_no_break_when_room_remains() {
        let mut writer = PageWriter::new(DocumentKind::TeacherGuide, "t").unwrap();
        writer.ensure_space(50.0);
        assert_eq!(writer.pages.len(), 1);
    }

    #[test]
    fn test_long_body_overflows_to_second_page_and_saves() {
        let mut writer = PageWriter::new(DocumentKind::TeacherGuide, "overflow").unwrap();
        let paragraph = "Equivalent ratios describe the same relationship. ".repeat(12);
        for _ in 0..40 {
            writer.body(&paragraph);
        }
        assert!(writer.pages.len() > 1, "40 paragraphs must overflow a page");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overflow.pdf");
        writer.finish(&path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_single_page_document_saves() {
        let mut writer = PageWriter::new(DocumentKind::TeacherGuide, "short").unwrap();
        writer.title_band("Short", "Grade 6", STYLE.navy_700);
        writer.body("One line of content.");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.pdf");
        writer.finish(&path).unwrap();
        assert!(path.exists());
    }
}
