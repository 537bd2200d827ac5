//! Application setup and initialization
//!
//! Startup lifecycle: construct → validate/ensure-ready → serve. All state
//! is built here and injected; nothing global, nothing reinitialized after
//! this returns.

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::Result;
use photowall_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Initialize telemetry first
    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {e}"))?;

    tracing::info!("Configuration loaded successfully");

    // Setup storage: both backends must exist before any request is served
    let (blob, share) = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState {
        config,
        blob,
        share,
    });

    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}
