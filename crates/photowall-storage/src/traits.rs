//! Storage abstraction trait
//!
//! This module defines the PhotoStore trait that both storage backends
//! implement.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;

use photowall_core::BackendKind;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Listing failed: {0}")]
    ListFailed(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A single object visible in a backend listing. Directories on the file
/// share are filtered out before this type is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub name: String,
}

/// Storage abstraction trait
///
/// Both backends (blob container, file share) implement this trait so the
/// HTTP handlers can treat them uniformly. Clients are cheap to share and
/// internally thread-safe; construct once, wrap in `Arc`, and reuse.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Idempotently guarantee the backing container/share exists, creating
    /// it on first run. Re-running against an existing resource is a no-op
    /// aside from one metadata round-trip. Called once at startup; any error
    /// is fatal there.
    async fn ensure_ready(&self) -> StorageResult<()>;

    /// Write full content under `filename`, overwriting any existing object
    /// of the same name. The declared content type is stored with the object.
    async fn put(&self, filename: &str, content_type: &str, data: Bytes) -> StorageResult<()>;

    /// Enumerate top-level objects. No pagination; every call is a fresh
    /// round-trip.
    async fn list(&self) -> StorageResult<Vec<StoredObject>>;

    /// Mint a read-only signed URL for `filename`, valid for `expires_in`
    /// from now. The token never grants write or delete access and always
    /// carries an expiry.
    async fn signed_get_url(&self, filename: &str, expires_in: Duration)
        -> StorageResult<String>;

    /// Which backend this is, for logs.
    fn backend_kind(&self) -> BackendKind;
}
