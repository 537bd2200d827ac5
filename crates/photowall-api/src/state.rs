//! Application state.
//!
//! Both storage backends are constructed once during setup and shared across
//! requests; handlers receive them through axum's `State` extractor. There is
//! no other process-wide state and nothing is reinitialized after startup.

use photowall_core::Config;
use photowall_storage::PhotoStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Blob container backend (first write target).
    pub blob: Arc<dyn PhotoStore>,
    /// File share backend (second write target).
    pub share: Arc<dyn PhotoStore>,
}
