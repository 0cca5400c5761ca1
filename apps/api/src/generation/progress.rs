//! Progress events for the generation pipeline.
//!
//! A fixed sequence of named milestones emitted in monotonically increasing
//! order; SSE consumers render them directly. A dropped receiver is not an
//! error — the pipeline keeps running and sends become no-ops.

use serde::Serialize;
use tokio::sync::mpsc;

/// Pipeline milestones, in order. `Ord` is the emission contract: a consumer
/// never sees a stage smaller than one it already received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ComposingPrompt,
    AwaitingModel,
    ParsingResponse,
    Rendering,
    Complete,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    Progress { stage: Stage, message: String },
    Result(crate::generation::GenerateResponse),
    Error { code: &'static str, message: String },
}

/// Send half of the progress stream. `noop()` gives the synchronous endpoint
/// the same pipeline code path without a channel.
#[derive(Clone)]
pub struct ProgressSender {
    tx: Option<mpsc::UnboundedSender<ProgressEvent>>,
}

impl ProgressSender {
    pub fn new(tx: mpsc::UnboundedSender<ProgressEvent>) -> Self {
        ProgressSender { tx: Some(tx) }
    }

    pub fn noop() -> Self {
        ProgressSender { tx: None }
    }

    /// Emits an event. A disconnected consumer must not cancel the pipeline,
    /// so send failures are ignored.
    pub fn emit(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }

    pub fn stage(&self, stage: Stage, message: impl Into<String>) {
        self.emit(ProgressEvent::Progress {
            stage,
            message: message.into(),
        });
    }
}
