//! Error types for the CLI application.

use modelgrade_evaluator::EvaluationError;
use modelgrade_extractor::ExtractorError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Gold standard file could not be used
    #[error("Gold standard error in {}: {reason}", path.display())]
    Gold {
        /// File the gold standard was read from
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// Evaluation error
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// Transcript parsing error
    #[error(transparent)]
    Extractor(#[from] ExtractorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
