//! Unified error types for void_engine

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for void_engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    // === Glyph codec ===
    #[error("Glyph code must be {expected} characters after whitespace removal, got {actual}")]
    InvalidGlyphLength { expected: usize, actual: usize },

    #[error("Unknown module tag '{tag}' (expected one of E, S, C, J, L, R, B)")]
    InvalidModuleTag { tag: char },

    #[error("Invalid rotation digit '{digit}' (expected 0-3)")]
    InvalidRotation { digit: char },

    // === Library store ===
    #[error("Failed to read glyph library '{path}': {message}")]
    ReadLibrary { path: PathBuf, message: String },

    #[error("Failed to write glyph library '{path}': {message}")]
    WriteLibrary { path: PathBuf, message: String },

    // === External errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type alias for void_engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
