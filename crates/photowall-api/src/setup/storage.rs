//! Storage setup and initialization

use anyhow::{Context, Result};
use photowall_core::Config;
use photowall_storage::{create_stores, PhotoStore};
use std::sync::Arc;

/// Construct both backends and make sure the container and the share exist.
/// Any failure here aborts startup; there are no retries.
pub async fn setup_storage(
    config: &Config,
) -> Result<(Arc<dyn PhotoStore>, Arc<dyn PhotoStore>)> {
    tracing::info!(account = %config.account_name, "Initializing storage backends...");

    let (blob, share) =
        create_stores(config).context("failed to construct storage backends")?;

    for store in [&blob, &share] {
        store.ensure_ready().await.with_context(|| {
            format!("storage backend {} is not usable", store.backend_kind())
        })?;
        tracing::info!(backend = %store.backend_kind(), "Storage backend ready");
    }

    Ok((blob, share))
}
