//! Tubely API Library
//!
//! This crate provides the HTTP surface, the bearer-token gate, and the video
//! and thumbnail ingestion pipelines that tie the storage, processing and
//! datastore crates together.

mod handlers;
mod utils;

// Public modules
pub mod auth;
pub mod error;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
