//! Transcript profiles: where a model family puts its final answer
//!
//! A profile is an ordered list of anchors. Each anchor narrows the
//! transcript to the text after one of its matches; the answer region is
//! whatever follows the last anchor. If any anchor is missing the transcript
//! is malformed.

use crate::error::ExtractorError;
use modelgrade_domain::ExtractionMode;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Which match of an anchor pattern to cut after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occurrence {
    /// The first match
    First,
    /// The 1-based nth match
    Nth(usize),
    /// The last match
    Last,
}

/// One narrowing step in a transcript profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    /// Case-insensitive, multi-line regular expression
    pub pattern: String,

    /// Which match to cut after
    pub occurrence: Occurrence,
}

impl Anchor {
    /// Anchor on the first match
    pub fn first(pattern: impl Into<String>) -> Self {
        Self { pattern: pattern.into(), occurrence: Occurrence::First }
    }

    /// Anchor on the 1-based nth match
    pub fn nth(pattern: impl Into<String>, n: usize) -> Self {
        Self { pattern: pattern.into(), occurrence: Occurrence::Nth(n) }
    }

    /// Anchor on the last match
    pub fn last(pattern: impl Into<String>) -> Self {
        Self { pattern: pattern.into(), occurrence: Occurrence::Last }
    }
}

/// Named sequence of anchors for one model family and extraction mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptProfile {
    /// Profile name, used in logs and error messages
    pub name: String,

    /// Anchors applied in order
    pub anchors: Vec<Anchor>,
}

const GENERIC_CLASS_HEADER: &str =
    r"^[#*\s]*(?:here\s+is\s+the\s+)?(?:final|refined)\b[^\n]*\bclass(?:es)?\b[^\n]*$";
const GENERIC_ASSOCIATION_HEADER: &str =
    r"^[#*\s]*(?:here\s+is\s+the\s+)?(?:final|refined)\b[^\n]*\bassociations?\b[^\n]*$";
const FINAL_CLASS_LIST: &str = r"(?:Here is the final list of classes:|#+\s*Final Class List|#+\s*Refined List of Classes|Here is the final class list in a structured format:)";
const FINAL_ASSOCIATION_LIST: &str = r"Here is the final list of associations?:";

impl TranscriptProfile {
    /// Names accepted by [`TranscriptProfile::named`]
    pub const BUILT_IN: &'static [&'static str] = &["generic", "gpt-o1", "llama3-8b", "qwen-14b"];

    /// Create a profile from explicit anchors
    pub fn new(name: impl Into<String>, anchors: Vec<Anchor>) -> Self {
        Self { name: name.into(), anchors }
    }

    /// Model-agnostic profile: the last "final/refined ... classes" (or
    /// "associations") header line starts the answer
    pub fn generic(mode: ExtractionMode) -> Self {
        let header = match mode {
            ExtractionMode::Class => GENERIC_CLASS_HEADER,
            ExtractionMode::Association => GENERIC_ASSOCIATION_HEADER,
        };
        Self::new("generic", vec![Anchor::last(header)])
    }

    /// GPT-o1 transcripts: answer follows the second model turn and the
    /// "Step 3" refinement header
    pub fn gpt_o1(mode: ExtractionMode) -> Self {
        let anchors = match mode {
            ExtractionMode::Class => vec![
                Anchor::nth(r"GPT-o1", 2),
                Anchor::first(
                    r"step\s*3\s*:\s*.*?final\s+(?:refined\s+)?(?:class(?:es)?|list(?:\s+of\s+classes)?|list of class candidates)",
                ),
                Anchor::first(
                    r"final\s+(?:refined list of class candidates|list of class candidates|list of classes|list|class(?:es)?)[\s:]*",
                ),
            ],
            ExtractionMode::Association => vec![
                Anchor::nth(r"ASSISTANT :", 2),
                Anchor::first(r"Step\s*3:.*?Associations? in 'X-Y'"),
                Anchor::first(FINAL_ASSOCIATION_LIST),
            ],
        };
        Self::new("gpt-o1", anchors)
    }

    /// Llama 3 8B transcripts: answer follows the third assistant turn
    pub fn llama3_8b(mode: ExtractionMode) -> Self {
        let anchors = match mode {
            ExtractionMode::Class => vec![
                Anchor::nth(r"Assistant :", 3),
                Anchor::first(FINAL_CLASS_LIST),
            ],
            ExtractionMode::Association => vec![
                Anchor::nth(r"Assistant\s?:", 3),
                Anchor::first(FINAL_ASSOCIATION_LIST),
            ],
        };
        Self::new("llama3-8b", anchors)
    }

    /// Qwen 14B transcripts: answer follows the third assistant turn and the
    /// end of the reasoning block
    pub fn qwen_14b(mode: ExtractionMode) -> Self {
        let last = match mode {
            ExtractionMode::Class => {
                r"(?:Here is the final list of classes:|#+\s*Final Class List|#+\s*Refined List of Classes)"
            }
            ExtractionMode::Association => FINAL_ASSOCIATION_LIST,
        };
        Self::new(
            "qwen-14b",
            vec![
                Anchor::nth(r"Assistant :", 3),
                Anchor::first(r"</think>"),
                Anchor::first(last),
            ],
        )
    }

    /// Look up a built-in profile by name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use modelgrade_domain::ExtractionMode;
    /// use modelgrade_extractor::TranscriptProfile;
    ///
    /// let profile = TranscriptProfile::named("Qwen-14B", ExtractionMode::Class).unwrap();
    /// assert_eq!(profile.anchors.len(), 3);
    /// assert!(TranscriptProfile::named("gpt-2", ExtractionMode::Class).is_err());
    /// ```
    pub fn named(name: &str, mode: ExtractionMode) -> Result<Self, ExtractorError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "generic" => Ok(Self::generic(mode)),
            "gpt-o1" => Ok(Self::gpt_o1(mode)),
            "llama3-8b" => Ok(Self::llama3_8b(mode)),
            "qwen-14b" => Ok(Self::qwen_14b(mode)),
            other => Err(ExtractorError::UnknownProfile(other.to_string())),
        }
    }

    /// Compile every anchor pattern
    pub fn compile(&self) -> Result<CompiledProfile, ExtractorError> {
        if self.anchors.is_empty() {
            return Err(ExtractorError::Config(format!(
                "profile '{}' has no anchors",
                self.name
            )));
        }
        let mut anchors = Vec::with_capacity(self.anchors.len());
        for anchor in &self.anchors {
            if anchor.occurrence == Occurrence::Nth(0) {
                return Err(ExtractorError::Config(format!(
                    "anchor '{}' uses occurrence 0; occurrences are 1-based",
                    anchor.pattern
                )));
            }
            let regex = RegexBuilder::new(&anchor.pattern)
                .case_insensitive(true)
                .multi_line(true)
                .build()
                .map_err(|e| ExtractorError::InvalidPattern {
                    pattern: anchor.pattern.clone(),
                    reason: e.to_string(),
                })?;
            anchors.push((regex, anchor.occurrence));
        }
        Ok(CompiledProfile { name: self.name.clone(), anchors })
    }
}

/// A profile with its patterns compiled
#[derive(Debug, Clone)]
pub struct CompiledProfile {
    name: String,
    anchors: Vec<(Regex, Occurrence)>,
}

impl CompiledProfile {
    /// Profile name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the answer region: the text after the final anchor
    pub fn locate<'a>(&self, transcript: &'a str) -> Result<&'a str, ExtractorError> {
        let mut rest = transcript;
        for (step, (regex, occurrence)) in self.anchors.iter().enumerate() {
            let found = match occurrence {
                Occurrence::First => regex.find(rest),
                Occurrence::Nth(n) => regex.find_iter(rest).nth(n.saturating_sub(1)),
                Occurrence::Last => regex.find_iter(rest).last(),
            };
            let Some(m) = found else {
                return Err(ExtractorError::MalformedOutput(format!(
                    "profile '{}': anchor {} ('{}', {:?}) not found",
                    self.name,
                    step + 1,
                    regex.as_str(),
                    occurrence
                )));
            };
            rest = &rest[m.end()..];
        }
        Ok(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_class_uses_last_header() {
        let text = "Final classes draft:\n1. A\n\nRefined class list:\n1. B\n";
        let compiled = TranscriptProfile::generic(ExtractionMode::Class).compile().unwrap();
        let region = compiled.locate(text).unwrap();
        assert_eq!(region.trim(), "1. B");
    }

    #[test]
    fn test_gpt_o1_region_starts_at_first_item() {
        let text = "GPT-o1 : Step 1\nGPT-o1 : Step 3: Produce the final class list\nFinal list of classes:\n\n1. Customer\n";
        let compiled = TranscriptProfile::gpt_o1(ExtractionMode::Class).compile().unwrap();
        assert_eq!(compiled.locate(text).unwrap(), "1. Customer\n");
    }

    #[test]
    fn test_generic_association_header() {
        let text = "Some reasoning\n### Final Associations\n- A-B\n";
        let compiled = TranscriptProfile::generic(ExtractionMode::Association).compile().unwrap();
        assert_eq!(compiled.locate(text).unwrap().trim(), "- A-B");
    }

    #[test]
    fn test_missing_anchor_is_malformed() {
        let compiled = TranscriptProfile::generic(ExtractionMode::Class).compile().unwrap();
        let err = compiled.locate("no answer here").unwrap_err();
        assert!(matches!(err, ExtractorError::MalformedOutput(_)));
    }

    #[test]
    fn test_nth_occurrence() {
        let profile = TranscriptProfile::new("t", vec![Anchor::nth("turn", 2)]);
        let compiled = profile.compile().unwrap();
        assert_eq!(compiled.locate("turn a turn b turn c").unwrap(), " b turn c");
        assert!(compiled.locate("turn a").is_err());
    }

    #[test]
    fn test_zero_occurrence_rejected() {
        let profile = TranscriptProfile::new("t", vec![Anchor::nth("turn", 0)]);
        assert!(matches!(profile.compile(), Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_invalid_pattern() {
        let profile = TranscriptProfile::new("t", vec![Anchor::first("(unclosed")]);
        assert!(matches!(profile.compile(), Err(ExtractorError::InvalidPattern { .. })));
    }

    #[test]
    fn test_empty_profile_rejected() {
        let profile = TranscriptProfile::new("t", vec![]);
        assert!(matches!(profile.compile(), Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_all_built_ins_compile() {
        for name in TranscriptProfile::BUILT_IN {
            for mode in [ExtractionMode::Class, ExtractionMode::Association] {
                let profile = TranscriptProfile::named(name, mode).unwrap();
                assert!(profile.compile().is_ok(), "{} {:?}", name, mode);
            }
        }
    }
}
