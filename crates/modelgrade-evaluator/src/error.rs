//! Error types for evaluation runs

use modelgrade_domain::{GoldSetError, NormalizerError, StoryId};
use modelgrade_extractor::ExtractorError;
use thiserror::Error;

/// Errors that can occur while configuring or running an evaluation
///
/// Everything except [`EvaluationError::DuplicateRound`] and
/// [`EvaluationError::UnknownStory`] is raised before any transcript is
/// scored. Malformed transcripts are not errors; they become failed rounds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// A configured story has no gold elements
    #[error("Story '{0}' has an empty gold set")]
    EmptyGoldSet(StoryId),

    /// A configured story is absent from the gold standard
    #[error("No gold standard for story '{0}'")]
    MissingGold(StoryId),

    /// Extraction mode is unknown or inconsistent with the gold standard
    #[error("Invalid mode: {0}")]
    InvalidMode(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    /// The same story and round were folded twice
    #[error("Round {round} of story '{story}' was already recorded")]
    DuplicateRound {
        /// Story id
        story: StoryId,
        /// 1-based round number
        round: u32,
    },

    /// A round was submitted for a story outside the run
    #[error("Story '{0}' is not part of this evaluation")]
    UnknownStory(StoryId),

    /// Round number outside `1..=rounds`
    #[error("Round {round} is outside 1..={rounds}")]
    RoundOutOfRange {
        /// Submitted round
        round: u32,
        /// Configured number of rounds
        rounds: u32,
    },

    /// The transcript parser could not be built
    #[error("Extractor error: {0}")]
    Extractor(#[from] ExtractorError),
}

impl From<GoldSetError> for EvaluationError {
    fn from(err: GoldSetError) -> Self {
        match err {
            GoldSetError::EmptyGoldSet(story) => EvaluationError::EmptyGoldSet(story),
            mismatch @ GoldSetError::ModeMismatch { .. } => {
                EvaluationError::InvalidMode(mismatch.to_string())
            }
        }
    }
}

impl From<NormalizerError> for EvaluationError {
    fn from(err: NormalizerError) -> Self {
        EvaluationError::InvalidConfig(format!("synonym table: {}", err))
    }
}

/// Result type for evaluation operations
pub type Result<T> = std::result::Result<T, EvaluationError>;
