//! Trait definitions for external collaborators
//!
//! The model-invocation layer sits outside the scoring core. It is modelled
//! here as a source of raw transcript text; implementations live elsewhere.

use crate::gold::StoryId;

/// Supplies the raw transcript produced for one story and round
///
/// Implemented by the outer layers (the CLI reads transcripts from disk;
/// tests use in-memory maps).
pub trait TranscriptSource {
    /// Error type for transcript retrieval
    type Error;

    /// Fetch the transcript for `story` at 1-based `round`
    fn transcript(&self, story: &StoryId, round: u32) -> Result<String, Self::Error>;
}
