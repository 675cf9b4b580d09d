//! Error types for the tutor-content library.
//!
//! Segmentation and rendering never fail; these errors come from loading
//! configuration, decoding API payloads and I/O at the edges.

use thiserror::Error;

/// Result type alias for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while loading renderer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(String),

    #[error("Failed to read config file {path}: {message}")]
    Read { path: String, message: String },
}

/// Errors that occur while decoding an API payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Duplicate step number: {0}")]
    DuplicateStep(u32),
}

/// Errors raised by math backends. The renderer absorbs these by falling
/// back to literal text.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Math rendering error: {0}")]
    Math(String),
}
