use crate::{BlobStorage, FileShareStorage, PhotoStore, StorageResult};
use photowall_core::constants::PHOTOS_CONTAINER;
use photowall_core::Config;
use std::sync::Arc;

/// Construct the storage backend pair from configuration.
///
/// Returns `(blob, file_share)`. Construction is purely local; call
/// `ensure_ready()` on each backend before serving requests.
pub fn create_stores(
    config: &Config,
) -> StorageResult<(Arc<dyn PhotoStore>, Arc<dyn PhotoStore>)> {
    let blob = BlobStorage::new(
        config.account_name.clone(),
        config.account_key.clone(),
        PHOTOS_CONTAINER.to_string(),
        config.endpoint_suffix.clone(),
    )?;

    let share = FileShareStorage::new(
        config.account_name.clone(),
        config.account_key.clone(),
        config.file_share_name.clone(),
        config.endpoint_suffix.clone(),
    )?;

    Ok((Arc::new(blob), Arc::new(share)))
}
