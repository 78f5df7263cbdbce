//! Configuration for the transcript parser

use crate::error::ExtractorError;
use crate::parser::DEFAULT_OPTIONAL_MARKER;
use crate::profile::{Anchor, TranscriptProfile};
use modelgrade_domain::ExtractionMode;
use serde::{Deserialize, Serialize};

/// Configuration for the [`TranscriptParser`](crate::TranscriptParser)
///
/// Fields missing from a TOML document take their [`Default`] values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Whether transcripts list classes or associations
    #[serde(with = "crate::serde_mode")]
    pub mode: ExtractionMode,

    /// Built-in profile name, or the label of the custom `anchors`
    pub profile: String,

    /// Token separating association endpoints
    pub separator: String,

    /// Case-insensitive pattern marking a prediction as optional
    pub optional_marker: String,

    /// Maximum transcript length (bytes)
    pub max_transcript_length: usize,

    /// Custom anchors; when non-empty they replace the built-in profile
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub anchors: Vec<Anchor>,
}

impl ExtractorConfig {
    /// Configuration for one of the built-in transcript profiles
    pub fn for_profile(profile: impl Into<String>, mode: ExtractionMode) -> Self {
        Self {
            mode,
            profile: profile.into(),
            ..Self::default()
        }
    }

    /// Generic profile preset
    pub fn generic(mode: ExtractionMode) -> Self {
        Self::for_profile("generic", mode)
    }

    /// GPT-o1 preset
    pub fn gpt_o1(mode: ExtractionMode) -> Self {
        Self::for_profile("gpt-o1", mode)
    }

    /// Llama 3 8B preset
    pub fn llama3_8b(mode: ExtractionMode) -> Self {
        Self::for_profile("llama3-8b", mode)
    }

    /// Qwen 14B preset
    pub fn qwen_14b(mode: ExtractionMode) -> Self {
        Self::for_profile("qwen-14b", mode)
    }

    /// Resolve the transcript profile this configuration describes
    pub fn transcript_profile(&self) -> Result<TranscriptProfile, ExtractorError> {
        if self.anchors.is_empty() {
            TranscriptProfile::named(&self.profile, self.mode)
        } else {
            Ok(TranscriptProfile::new(self.profile.clone(), self.anchors.clone()))
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.separator.trim().is_empty() {
            return Err("separator must contain a non-whitespace character".to_string());
        }
        if self.optional_marker.is_empty() {
            return Err("optional_marker must not be empty".to_string());
        }
        if self.max_transcript_length == 0 {
            return Err("max_transcript_length must be greater than 0".to_string());
        }
        if self.anchors.is_empty()
            && !TranscriptProfile::BUILT_IN
                .iter()
                .any(|name| name.eq_ignore_ascii_case(self.profile.trim()))
        {
            return Err(format!(
                "unknown profile '{}' (built-in: {}); supply anchors for a custom profile",
                self.profile,
                TranscriptProfile::BUILT_IN.join(", ")
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    /// Class extraction with the generic profile
    fn default() -> Self {
        Self {
            mode: ExtractionMode::Class,
            profile: "generic".to_string(),
            anchors: Vec::new(),
            separator: "-".to_string(),
            optional_marker: DEFAULT_OPTIONAL_MARKER.to_string(),
            max_transcript_length: 2_000_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ExtractorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        for mode in [ExtractionMode::Class, ExtractionMode::Association] {
            for config in [
                ExtractorConfig::generic(mode),
                ExtractorConfig::gpt_o1(mode),
                ExtractorConfig::llama3_8b(mode),
                ExtractorConfig::qwen_14b(mode),
            ] {
                assert!(config.validate().is_ok(), "{}", config.profile);
                assert!(config.transcript_profile().is_ok());
            }
        }
    }

    #[test]
    fn test_blank_separator() {
        let mut config = ExtractorConfig::default();
        config.separator = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_profile_without_anchors() {
        let config = ExtractorConfig::for_profile("gpt-2", ExtractionMode::Class);
        assert!(config.validate().is_err());
        assert!(matches!(
            config.transcript_profile(),
            Err(ExtractorError::UnknownProfile(_))
        ));
    }

    #[test]
    fn test_custom_anchors() {
        let mut config = ExtractorConfig::for_profile("house-style", ExtractionMode::Class);
        config.anchors = vec![Anchor::last("^ANSWER:")];
        assert!(config.validate().is_ok());
        let profile = config.transcript_profile().unwrap();
        assert_eq!(profile.name, "house-style");
        assert_eq!(profile.anchors.len(), 1);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = ExtractorConfig::qwen_14b(ExtractionMode::Association);
        config.separator = "->".to_string();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_toml_custom_profile() {
        let toml_str = r#"
mode = "associations"
profile = "house-style"
separator = "-"
optional_marker = "\\(opt\\)"
max_transcript_length = 1000

[[anchors]]
pattern = "^ANSWER:"
occurrence = "last"

[[anchors]]
pattern = "List"
occurrence = { nth = 2 }
"#;
        let config = ExtractorConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.mode, ExtractionMode::Association);
        assert_eq!(config.anchors[1], Anchor::nth("List", 2));
    }

    #[test]
    fn test_toml_partial_document() {
        let config = ExtractorConfig::from_toml("profile = \"gpt-o1\"\n").unwrap();
        assert_eq!(config.profile, "gpt-o1");
        assert_eq!(config.separator, "-");
        assert_eq!(config.mode, ExtractionMode::Class);
    }

    #[test]
    fn test_toml_bad_mode() {
        let toml_str = r#"
mode = "diagram"
profile = "generic"
separator = "-"
optional_marker = "x"
max_transcript_length = 1000
"#;
        assert!(ExtractorConfig::from_toml(toml_str).is_err());
    }
}
