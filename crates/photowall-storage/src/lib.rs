//! Photowall Storage Library
//!
//! This crate provides the storage connector: a backend abstraction over the
//! two places every photo is written to, plus implementations for Azure Blob
//! Storage and an Azure Files share.
//!
//! # Storage key format
//!
//! Objects are keyed by their literal upload filename in both backends, so
//! the same name addresses the same photo everywhere. Re-uploading a name
//! overwrites; nothing is versioned. Keys must be single path segments
//! without traversal sequences; see the `keys` module.

pub mod blob;
pub mod factory;
pub mod keys;
pub(crate) mod rest;
pub mod share;
pub(crate) mod signing;
pub mod traits;

// Re-export commonly used types
pub use blob::BlobStorage;
pub use factory::create_stores;
pub use photowall_core::BackendKind;
pub use share::FileShareStorage;
pub use traits::{PhotoStore, StorageError, StorageResult, StoredObject};
