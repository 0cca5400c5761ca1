//! Generation pipeline — orchestrates one curriculum request end to end.
//!
//! Flow: validate request → compose prompts → model call(s) → parse with one
//! bounded retry → merge → fan out the five renders → collect per-document
//! statuses.
//!
//! Under the split plan the teacher-guide and student-materials calls run
//! concurrently — they have no data dependency on each other — and neither
//! do the five renders; the only joins are before rendering starts and
//! before completion is reported.

pub mod handlers;
pub mod progress;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::ModelGateway;
use crate::models::curriculum::CurriculumDocument;
use crate::models::request::LessonRequest;
use crate::parser::{self, MalformedResponse};
use crate::prompt::{compose, ComposedPrompt, PromptKind};
use crate::render::{render_document, RenderedFile, ALL_DOCUMENTS};
use crate::state::AppState;

use self::progress::{ProgressSender, Stage};

/// Max re-calls of the model per half when its output fails to parse.
/// One retry: a model call is expensive, and non-deterministic retries are
/// not guaranteed to converge. Transport failures are never retried here.
const MAX_PARSE_RETRIES: u32 = 1;

/// How the curriculum is requested from the model. The halves have no data
/// dependency, so the split plan runs them concurrently; the single plan
/// asks for both in one (larger) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelCallPlan {
    SingleCall,
    ParallelSplit,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub session_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub files: Vec<FileInfo>,
    pub failures: Vec<DocumentFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileInfo {
    pub document: crate::render::DocumentKind,
    pub name: String,
    pub filename: String,
    pub download_url: String,
}

impl From<RenderedFile> for FileInfo {
    fn from(file: RenderedFile) -> Self {
        let download_url = format!("/download/{}", file.filename);
        FileInfo {
            document: file.document,
            name: file.name,
            filename: file.filename,
            download_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentFailure {
    pub document: crate::render::DocumentKind,
    pub error: String,
}

/// Runs the full pipeline. Takes owned state so callers can run it in a
/// spawned task that outlives a disconnected client.
pub async fn run_generation(
    state: AppState,
    request: LessonRequest,
    plan: ModelCallPlan,
    progress: ProgressSender,
) -> Result<GenerateResponse, AppError> {
    request.validate(&state.reference)?;

    let model_key = request.model.as_deref();
    let gateway = state.llm.as_ref();

    let curriculum = match plan {
        ModelCallPlan::SingleCall => {
            progress.stage(Stage::ComposingPrompt, "Composing prompt");
            let prompt = compose(PromptKind::FullCurriculum, &request, &state.reference)?;
            progress.stage(Stage::AwaitingModel, "Generating curriculum");
            call_and_parse(gateway, &prompt, model_key, parser::parse_curriculum).await?
        }
        ModelCallPlan::ParallelSplit => {
            progress.stage(Stage::ComposingPrompt, "Composing prompts");
            let guide_prompt = compose(PromptKind::TeacherGuide, &request, &state.reference)?;
            let materials_prompt =
                compose(PromptKind::StudentMaterials, &request, &state.reference)?;
            progress.stage(
                Stage::AwaitingModel,
                "Generating teacher guide and student materials",
            );
            let (teacher_guide, student_materials) = tokio::try_join!(
                call_and_parse(gateway, &guide_prompt, model_key, parser::parse_teacher_guide),
                call_and_parse(
                    gateway,
                    &materials_prompt,
                    model_key,
                    parser::parse_student_materials
                ),
            )?;
            CurriculumDocument {
                teacher_guide,
                student_materials,
            }
        }
    };

    progress.stage(Stage::ParsingResponse, "Model output validated");
    let curriculum = Arc::new(curriculum);

    let session_id = Uuid::new_v4();
    info!(
        "Rendering {} documents for session {session_id}",
        ALL_DOCUMENTS.len()
    );
    progress.stage(
        Stage::Rendering,
        format!("Rendering {} documents", ALL_DOCUMENTS.len()),
    );

    let (files, failures) = render_fan_out(&state, &curriculum, session_id, &progress).await;

    progress.stage(Stage::Complete, "Complete");
    Ok(GenerateResponse {
        session_id,
        generated_at: Utc::now(),
        files,
        failures,
    })
}

/// One model call + parse, retried once on malformed output. Provider and
/// configuration failures surface immediately — only a malformed response is
/// worth another expensive call.
async fn call_and_parse<T>(
    gateway: &dyn ModelGateway,
    prompt: &ComposedPrompt,
    model_key: Option<&str>,
    parse: fn(&str) -> Result<T, MalformedResponse>,
) -> Result<T, AppError> {
    let mut last_failure: Option<MalformedResponse> = None;

    for attempt in 0..=MAX_PARSE_RETRIES {
        let raw = gateway
            .generate(&prompt.user, &prompt.system, model_key)
            .await?;

        match parse(&raw) {
            Ok(parsed) => {
                if attempt > 0 {
                    info!("Model output parsed successfully after retry");
                }
                return Ok(parsed);
            }
            Err(e) => {
                warn!(
                    "Malformed model response (attempt {}/{}): {}",
                    attempt + 1,
                    MAX_PARSE_RETRIES + 1,
                    e.reason
                );
                last_failure = Some(e);
            }
        }
    }

    Err(last_failure
        .map(AppError::from)
        .unwrap_or_else(|| AppError::Provider("model produced no output".to_string())))
}

/// Dispatches the five render routines concurrently and joins before
/// reporting. Routines are CPU-bound, hence `spawn_blocking`; each reads
/// only its slice of the immutable curriculum, so no synchronization beyond
/// the join is needed. A failed document never aborts the others.
async fn render_fan_out(
    state: &AppState,
    curriculum: &Arc<CurriculumDocument>,
    session_id: Uuid,
    progress: &ProgressSender,
) -> (Vec<FileInfo>, Vec<DocumentFailure>) {
    let total = ALL_DOCUMENTS.len();
    let mut set = JoinSet::new();

    for kind in ALL_DOCUMENTS {
        let curriculum = Arc::clone(curriculum);
        let output_dir = state.config.output_dir.clone();
        let session = session_id.to_string();
        set.spawn_blocking(move || {
            (
                kind,
                render_document(kind, &curriculum, &output_dir, &session),
            )
        });
    }

    let mut files: Vec<FileInfo> = Vec::new();
    let mut failures: Vec<DocumentFailure> = Vec::new();
    let mut completed = 0usize;

    while let Some(joined) = set.join_next().await {
        completed += 1;
        match joined {
            Ok((_, Ok(rendered))) => {
                progress.stage(
                    Stage::Rendering,
                    format!("Rendered document {completed} of {total}"),
                );
                files.push(rendered.into());
            }
            Ok((kind, Err(e))) => {
                warn!("Document {kind} failed to render: {e}");
                failures.push(DocumentFailure {
                    document: kind,
                    error: e.to_string(),
                });
            }
            Err(join_error) => {
                // A panic inside a render routine; the other tasks proceed.
                tracing::error!("Render task aborted: {join_error}");
            }
        }
    }

    // Completion order is nondeterministic; report in document order.
    files.sort_by_key(|f| ALL_DOCUMENTS.iter().position(|k| *k == f.document));
    failures.sort_by_key(|f| ALL_DOCUMENTS.iter().position(|k| *k == f.document));
    (files, failures)
}
