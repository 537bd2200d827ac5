//! Photowall API Library
//!
//! This crate provides the HTTP handlers and application setup.

pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use state::AppState;
