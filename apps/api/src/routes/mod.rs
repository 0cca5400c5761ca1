pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/generate", post(handlers::handle_generate))
        .route("/generate-stream", post(handlers::handle_generate_stream))
        .route("/download/:file_id", get(handlers::handle_download))
        .with_state(state)
}
