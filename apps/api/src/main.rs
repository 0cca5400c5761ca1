mod config;
mod errors;
mod generation;
mod llm_client;
mod models;
mod parser;
mod prompt;
mod reference;
mod render;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::reference::ReferenceData;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting curriculum API v{}", env!("CARGO_PKG_VERSION"));

    // Reference tables: loaded once, read-only for the process lifetime.
    let reference = Arc::new(ReferenceData::load(&config.files_dir)?);

    // Ensure the output directory exists before the first render.
    std::fs::create_dir_all(&config.output_dir)?;
    info!("Writing generated PDFs to {}", config.output_dir.display());

    let llm = Arc::new(LlmClient::new(
        config.anthropic_api_key.clone(),
        config.gemini_api_key.clone(),
    ));
    info!(
        "Model gateway initialized (default model: {})",
        llm_client::DEFAULT_MODEL
    );

    let state = AppState {
        config: config.clone(),
        reference,
        llm,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
