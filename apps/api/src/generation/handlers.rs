//! Axum route handlers for the generation API.

use axum::{
    extract::{Path, State},
    http::header,
    response::sse::{Event, KeepAlive, Sse},
    response::IntoResponse,
    Json,
};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;

use crate::errors::AppError;
use crate::generation::progress::{ProgressEvent, ProgressSender};
use crate::generation::{run_generation, GenerateResponse, ModelCallPlan};
use crate::models::request::LessonRequest;
use crate::state::AppState;

/// POST /generate
///
/// Synchronous generation: returns the five file identifiers (or the
/// per-document failure list) once rendering finishes. The pipeline runs in
/// a spawned task so a client that disconnects mid-request does not cancel
/// work whose model cost has already been incurred.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<LessonRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let job = tokio::spawn(run_generation(
        state,
        request,
        ModelCallPlan::SingleCall,
        ProgressSender::noop(),
    ));
    let response = job
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("generation task aborted: {e}")))??;
    Ok(Json(response))
}

/// POST /generate-stream
///
/// Server-sent events: named milestones in monotonically increasing order,
/// terminated by a `result` event with file identifiers or an `error` event
/// with a taxonomy code. Disconnecting consumers do not cancel the job; its
/// outputs stay downloadable under their stable filenames.
pub async fn handle_generate_stream(
    State(state): State<AppState>,
    Json(request): Json<LessonRequest>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, axum::Error>>> {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let progress = ProgressSender::new(tx.clone());

    tokio::spawn(async move {
        match run_generation(state, request, ModelCallPlan::ParallelSplit, progress).await {
            Ok(response) => {
                let _ = tx.send(ProgressEvent::Result(response));
            }
            Err(e) => {
                let _ = tx.send(ProgressEvent::Error {
                    code: e.code(),
                    message: e.to_string(),
                });
            }
        }
    });

    let stream = UnboundedReceiverStream::new(rx).map(|event| Event::default().json_data(&event));
    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// GET /download/{file_id}
///
/// Serves a generated PDF from the flat output directory. The identifier is
/// the generated filename; anything that could escape the directory is
/// treated as unknown.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !is_safe_file_id(&file_id) {
        return Err(AppError::NotFound(format!("File {file_id} not found")));
    }

    let path = state.config.output_dir.join(&file_id);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::NotFound(format!("File {file_id} not found")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_id}\""),
            ),
        ],
        bytes,
    ))
}

/// A downloadable identifier is exactly a generated PDF filename: one flat
/// path segment, conservative characters, `.pdf` suffix.
fn is_safe_file_id(file_id: &str) -> bool {
    !file_id.is_empty()
        && file_id.ends_with(".pdf")
        && !file_id.contains("..")
        && file_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
