//! Taskdeck Core Library
//!
//! This crate provides the domain models, error types and configuration shared by
//! the API server, the database layer, the storage layer and the HTTP client.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, ImageUrlMode, LogFormat};
pub use error::{AppError, ErrorMetadata, LogLevel};
