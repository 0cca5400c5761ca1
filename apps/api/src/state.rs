use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ModelGateway;
use crate::reference::ReferenceData;

/// Shared application state injected into all route handlers via Axum
/// extractors. Everything here is read-only after startup, so clones are
/// cheap and concurrent handlers need no locking.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Reference tables loaded once at process start.
    pub reference: Arc<ReferenceData>,
    /// Pluggable model gateway. Production uses `LlmClient`; tests swap in a
    /// canned double.
    pub llm: Arc<dyn ModelGateway>,
}
