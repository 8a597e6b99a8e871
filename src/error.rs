//! Error types for the pidgin-to-gajim library.
//!
//! This module provides custom error types using `thiserror` for the parse,
//! store and export stages. The binary wraps them in `anyhow` for reporting.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while importing transcripts.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal errors
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Transcript pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Transcript file name carries no `YYYY-MM-DD` date
    #[error("No YYYY-MM-DD date in transcript file name: {}", .0.display())]
    MissingDate(PathBuf),

    /// Transcript file name carries a date that does not exist
    #[error("Invalid date in transcript file name: {0}")]
    InvalidDate(String),

    /// A transcript line carries a time of day that does not exist
    #[error("Invalid time {time} in {}", path.display())]
    InvalidTimestamp {
        /// Transcript the line came from
        path: PathBuf,
        /// Raw `HH:MM:SS` text
        time: String,
    },

    /// Path is not laid out as `<protocol>/<account>/<contact>`
    #[error("Expected <protocol>/<account>/<contact> layout, got: {}", .0.display())]
    InvalidLayout(PathBuf),

    /// Destination database lacks the expected history tables
    #[error("Destination schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience type alias for Result with `ImportError`
pub type Result<T> = std::result::Result<T, ImportError>;

impl From<config::ConfigError> for ImportError {
    fn from(err: config::ConfigError) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}
