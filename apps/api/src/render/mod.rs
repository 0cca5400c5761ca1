//! Document Renderer — five print-ready PDFs from one validated curriculum.
//!
//! Each output document has its own routine keyed by `DocumentKind`; all five
//! share the immutable style/icon tables in `style` and the metric tables in
//! `metrics`. Routines are synchronous and CPU-bound — the orchestration
//! layer runs them inside `tokio::task::spawn_blocking`.

pub mod handout;
pub mod metrics;
pub mod organizer;
pub mod page;
pub mod style;
pub mod teacher_guide;

use std::fmt;
use std::path::Path;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::models::curriculum::CurriculumDocument;

/// The four differentiation tiers, in increasing difficulty order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessLevel {
    Below,
    Approaching,
    At,
    Above,
}

impl ReadinessLevel {
    pub fn key(&self) -> &'static str {
        match self {
            ReadinessLevel::Below => "below_level",
            ReadinessLevel::Approaching => "approaching_level",
            ReadinessLevel::At => "at_level",
            ReadinessLevel::Above => "above_level",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ReadinessLevel::Below => "Below Level",
            ReadinessLevel::Approaching => "Approaching Level",
            ReadinessLevel::At => "At Level",
            ReadinessLevel::Above => "Above Level",
        }
    }
}

/// One of the five output documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    TeacherGuide,
    Student(ReadinessLevel),
}

/// Render order: teacher guide first, then handouts below → above.
pub const ALL_DOCUMENTS: [DocumentKind; 5] = [
    DocumentKind::TeacherGuide,
    DocumentKind::Student(ReadinessLevel::Below),
    DocumentKind::Student(ReadinessLevel::Approaching),
    DocumentKind::Student(ReadinessLevel::At),
    DocumentKind::Student(ReadinessLevel::Above),
];

impl DocumentKind {
    pub fn file_stem(&self) -> &'static str {
        match self {
            DocumentKind::TeacherGuide => "teacher_guide",
            DocumentKind::Student(ReadinessLevel::Below) => "student_below_level",
            DocumentKind::Student(ReadinessLevel::Approaching) => "student_approaching_level",
            DocumentKind::Student(ReadinessLevel::At) => "student_at_level",
            DocumentKind::Student(ReadinessLevel::Above) => "student_above_level",
        }
    }

    pub fn label(&self) -> String {
        match self {
            DocumentKind::TeacherGuide => "Teacher Guide".to_string(),
            DocumentKind::Student(level) => {
                format!("Student Handout - {}", level.display_name())
            }
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

impl Serialize for DocumentKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.file_stem())
    }
}

/// A render failure scoped to one document. The other four documents are
/// unaffected; partial success is an accepted outcome.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{document}: required field '{field}' is missing")]
    MissingField {
        document: DocumentKind,
        field: &'static str,
    },

    #[error("{document}: PDF write failed: {message}")]
    Pdf {
        document: DocumentKind,
        message: String,
    },

    #[error("{document}: could not create output file: {message}")]
    Io {
        document: DocumentKind,
        message: String,
    },
}

impl RenderError {
    pub fn document(&self) -> DocumentKind {
        match self {
            RenderError::MissingField { document, .. }
            | RenderError::Pdf { document, .. }
            | RenderError::Io { document, .. } => *document,
        }
    }
}

/// A successfully written PDF.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedFile {
    pub document: DocumentKind,
    pub name: String,
    pub filename: String,
}

/// Renders one document of the curriculum into `output_dir`. Reads only its
/// slice of the (immutable) curriculum object; safe to run the five kinds
/// concurrently.
pub fn render_document(
    kind: DocumentKind,
    curriculum: &CurriculumDocument,
    output_dir: &Path,
    session_id: &str,
) -> Result<RenderedFile, RenderError> {
    let filename = format!("{session_id}_{}.pdf", kind.file_stem());
    let path = output_dir.join(&filename);

    match kind {
        DocumentKind::TeacherGuide => {
            teacher_guide::render(&curriculum.teacher_guide, &path)?;
        }
        DocumentKind::Student(level) => {
            handout::render(level, &curriculum.student_materials, &path)?;
        }
    }

    Ok(RenderedFile {
        document: kind,
        name: kind.label(),
        filename,
    })
}
