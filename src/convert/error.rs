//! Conversion error taxonomy.
//!
//! Every failure inside one conversion collapses into exactly one of these
//! variants; the pipeline boundary turns the variant into a terminal
//! `Failure` message and nothing escapes to crash the host process.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Error taxonomy for one conversion run.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Missing tool paths or blank request fields, caught before any
    /// process spawns.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The external tool failed to start, timed out, or exited nonzero.
    ///
    /// For a nonzero exit the payload is the captured stderr text verbatim.
    #[error("{0}")]
    Process(String),

    /// Corrupt result archive, destination write failure, or a rejected
    /// zip-slip entry.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// Rename/delete failure while placing the final artifact.
    #[error("finalization error: {0}")]
    Finalization(String),

    /// Any other failure, message passed through unchanged.
    #[error("{0}")]
    Unexpected(String),
}

impl From<std::io::Error> for ConvertError {
    fn from(e: std::io::Error) -> Self {
        ConvertError::Unexpected(e.to_string())
    }
}
