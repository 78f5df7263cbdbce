//! Error types for the transcript parser

use thiserror::Error;

/// Errors that can occur while parsing a transcript
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractorError {
    /// The answer region could not be located in the transcript
    #[error("Malformed output: {0}")]
    MalformedOutput(String),

    /// Transcript exceeds the configured maximum length
    #[error("Transcript too long: {0} bytes (max: {1})")]
    TranscriptTooLong(usize, usize),

    /// A profile anchor or optional-marker pattern does not compile
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Compiler message
        reason: String,
    },

    /// No built-in transcript profile has this name
    #[error("Unknown transcript profile: {0}")]
    UnknownProfile(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
