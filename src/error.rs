//! Top-level error types for converter operations.
//!
//! The conversion pipeline has its own taxonomy in [`crate::convert::error`];
//! this module wraps it together with CLI, IO and serialization failures.

use thiserror::Error;

/// Result type alias for converter operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Main error type for all converter operations
#[derive(Error, Debug)]
pub enum AppError {
    /// CLI command errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Conversion pipeline errors
    #[error("conversion error: {0}")]
    Convert(#[from] crate::convert::ConvertError),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}
