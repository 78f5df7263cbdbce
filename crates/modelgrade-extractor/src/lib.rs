//! Modelgrade Extractor
//!
//! Turns raw model transcripts into ordered lists of predicted domain-model
//! elements.
//!
//! # Overview
//!
//! A transcript is the full conversation with a model: the prompts, the
//! model's intermediate reasoning and, somewhere near the end, its final list
//! of classes or associations. The parser only trusts that final list.
//!
//! # Architecture
//!
//! ```text
//! Transcript → Profile anchors → Answer region → List items → Line parser → Predictions
//! ```
//!
//! # Key Features
//!
//! - **Transcript profiles**: ordered regex anchors per model family locate the final answer
//! - **Malformed detection**: a missing anchor fails the transcript instead of guessing
//! - **Line cleaning**: Markdown emphasis, notes and parentheticals are stripped
//! - **Optional predictions**: `(optional)` markers and post-list extras are flagged
//! - **Skipped lines**: association lines without two endpoints are recorded, not fatal
//!
//! # Example Usage
//!
//! ```
//! use modelgrade_domain::{Element, ExtractionMode};
//! use modelgrade_extractor::{ExtractorConfig, TranscriptParser};
//!
//! let config = ExtractorConfig::generic(ExtractionMode::Association);
//! let parser = TranscriptParser::new(config)?;
//!
//! let transcript = "\
//! Reasoning about the story...
//! ## Final Associations
//! 1. Driver-(drives)-Vehicle
//! 2. Payment
//! ";
//! let parsed = parser.parse(transcript)?;
//!
//! assert_eq!(parsed.predictions[0].element, Element::labelled("Driver", "Vehicle", "drives"));
//! assert_eq!(parsed.skipped_count(), 1);
//! # Ok::<(), modelgrade_extractor::ExtractorError>(())
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod profile;
mod region;
pub mod serde_mode;
mod types;


pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::TranscriptParser;
pub use parser::DEFAULT_OPTIONAL_MARKER;
pub use profile::{Anchor, CompiledProfile, Occurrence, TranscriptProfile};
pub use types::{ParsedTranscript, SkippedLine};
