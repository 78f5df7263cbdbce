//! Parse result types

use modelgrade_domain::{ExtractionMode, Prediction};

/// A list line that could not be turned into an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number within the answer region
    pub line_number: usize,

    /// The line text after bullet removal
    pub text: String,

    /// Why the line was skipped
    pub reason: String,
}

/// Result of parsing one transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTranscript {
    /// Mode the transcript was parsed in
    pub mode: ExtractionMode,

    /// Predictions in answer order; duplicates are preserved
    pub predictions: Vec<Prediction>,

    /// Lines that failed to parse
    pub skipped: Vec<SkippedLine>,
}

impl ParsedTranscript {
    /// Number of skipped lines
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// True if the answer region listed no elements
    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    /// Number of predictions flagged optional
    pub fn optional_count(&self) -> usize {
        self.predictions.iter().filter(|p| p.optional).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelgrade_domain::Element;

    #[test]
    fn test_counts() {
        let parsed = ParsedTranscript {
            mode: ExtractionMode::Class,
            predictions: vec![
                Prediction::new(Element::class("A")),
                Prediction::new(Element::class("B")).optional(),
            ],
            skipped: vec![SkippedLine {
                line_number: 3,
                text: "???".to_string(),
                reason: "no endpoints".to_string(),
            }],
        };
        assert_eq!(parsed.skipped_count(), 1);
        assert_eq!(parsed.optional_count(), 1);
        assert!(!parsed.is_empty());
    }
}
