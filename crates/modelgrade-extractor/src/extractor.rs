//! Core TranscriptParser implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::{LineOutcome, LineParser};
use crate::profile::CompiledProfile;
use crate::region::list_items;
use crate::types::{ParsedTranscript, SkippedLine};
use modelgrade_domain::{ExtractionMode, Prediction};
use tracing::{debug, warn};

/// Turns one raw model transcript into an ordered list of predictions
#[derive(Debug, Clone)]
pub struct TranscriptParser {
    config: ExtractorConfig,
    profile: CompiledProfile,
    lines: LineParser,
}

impl TranscriptParser {
    /// Create a parser, validating the configuration and compiling patterns
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        let profile = config.transcript_profile()?.compile()?;
        let lines = LineParser::new(config.mode, config.separator.clone(), &config.optional_marker)?;
        Ok(Self { config, profile, lines })
    }

    /// Extraction mode this parser was built for
    pub fn mode(&self) -> ExtractionMode {
        self.config.mode
    }

    /// Name of the transcript profile in use
    pub fn profile_name(&self) -> &str {
        self.profile.name()
    }

    /// The configuration this parser was built from
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Parse a transcript
    ///
    /// Fails with [`ExtractorError::MalformedOutput`] when the answer region
    /// cannot be located. Lines that do not parse are returned in
    /// [`ParsedTranscript::skipped`]; they never fail the whole transcript.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelgrade_domain::{Element, ExtractionMode};
    /// use modelgrade_extractor::{ExtractorConfig, TranscriptParser};
    ///
    /// let parser = TranscriptParser::new(ExtractorConfig::generic(ExtractionMode::Class)).unwrap();
    /// let parsed = parser
    ///     .parse("Thinking...\n### Final Classes\n1. Customer\n2. Order\n")
    ///     .unwrap();
    /// assert_eq!(parsed.predictions.len(), 2);
    /// assert_eq!(parsed.predictions[0].element, Element::class("Customer"));
    /// ```
    pub fn parse(&self, transcript: &str) -> Result<ParsedTranscript, ExtractorError> {
        if transcript.len() > self.config.max_transcript_length {
            return Err(ExtractorError::TranscriptTooLong(
                transcript.len(),
                self.config.max_transcript_length,
            ));
        }

        let region = self.profile.locate(transcript)?;
        let items = list_items(region, |text| self.lines.has_optional_marker(text));
        debug!(
            "Profile '{}' located answer region with {} list items",
            self.profile.name(),
            items.len()
        );

        let mut predictions = Vec::with_capacity(items.len());
        let mut skipped = Vec::new();

        for item in items {
            match self.lines.parse(&item.text) {
                LineOutcome::Parsed(elements, optional) => {
                    for element in elements {
                        let mut prediction = Prediction::new(element).with_raw(item.text.clone());
                        if optional || item.after_break {
                            prediction = prediction.optional();
                        }
                        predictions.push(prediction);
                    }
                }
                LineOutcome::Ignored => {}
                LineOutcome::Skipped(reason) => {
                    warn!("Skipping line {} ('{}'): {}", item.line_number, item.text, reason);
                    skipped.push(SkippedLine {
                        line_number: item.line_number,
                        text: item.text,
                        reason,
                    });
                }
            }
        }

        debug!(
            "Parsed {} predictions ({} optional), {} skipped lines",
            predictions.len(),
            predictions.iter().filter(|p| p.optional).count(),
            skipped.len()
        );

        Ok(ParsedTranscript {
            mode: self.config.mode,
            predictions,
            skipped,
        })
    }
}
