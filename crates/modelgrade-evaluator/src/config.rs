//! Configuration for evaluation runs
//!
//! Covers the scoring knobs (mode, label sensitivity, endpoint order,
//! synonyms), the number of rounds per story and the transcript parser.

use crate::error::{EvaluationError, Result};
use modelgrade_domain::{EndpointOrder, ExtractionMode, Normalizer, StoryId};
use modelgrade_extractor::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for an [`Evaluation`](crate::Evaluation)
///
/// # Examples
///
/// ```
/// use modelgrade_domain::ExtractionMode;
/// use modelgrade_evaluator::EvaluationConfig;
///
/// let config = EvaluationConfig::from_toml(r#"
/// mode = "association"
/// rounds = 3
/// label_sensitive = true
///
/// [synonyms]
/// client = "customer"
/// "#).unwrap();
///
/// assert_eq!(config.mode, ExtractionMode::Association);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Whether transcripts and gold list classes or associations
    #[serde(with = "modelgrade_extractor::serde_mode")]
    pub mode: ExtractionMode,

    /// Compare association labels as well as endpoints
    /// Default: false
    #[serde(default)]
    pub label_sensitive: bool,

    /// Association endpoint ordering
    /// Default: unordered
    #[serde(default, with = "serde_order")]
    pub endpoint_order: EndpointOrder,

    /// Rounds evaluated per story
    /// Default: 1
    #[serde(default = "default_rounds")]
    pub rounds: u32,

    /// Stories to evaluate; empty means every story in the gold standard
    #[serde(default)]
    pub stories: Vec<String>,

    /// `synonym = "standard"` pairs applied during normalization
    #[serde(default)]
    pub synonyms: BTreeMap<String, String>,

    /// Transcript parser settings; its mode always follows `mode`
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

fn default_rounds() -> u32 {
    1
}

mod serde_order {
    use modelgrade_domain::EndpointOrder;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(order: &EndpointOrder, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(match order {
            EndpointOrder::Unordered => "unordered",
            EndpointOrder::Ordered => "ordered",
        })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<EndpointOrder, D::Error> {
        let raw = String::deserialize(d)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "unordered" => Ok(EndpointOrder::Unordered),
            "ordered" => Ok(EndpointOrder::Ordered),
            other => Err(serde::de::Error::custom(format!(
                "unknown endpoint order '{}' (expected 'unordered' or 'ordered')",
                other
            ))),
        }
    }
}

impl EvaluationConfig {
    /// Default configuration for a mode
    pub fn new(mode: ExtractionMode) -> Self {
        Self {
            mode,
            label_sensitive: false,
            endpoint_order: EndpointOrder::Unordered,
            rounds: default_rounds(),
            stories: Vec::new(),
            synonyms: BTreeMap::new(),
            extractor: ExtractorConfig::generic(mode),
        }
    }

    /// Parse a mode name, reporting [`EvaluationError::InvalidMode`]
    pub fn parse_mode(raw: &str) -> Result<ExtractionMode> {
        raw.parse().map_err(EvaluationError::InvalidMode)
    }

    /// Set the number of rounds
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    /// Use a built-in transcript profile
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.extractor.profile = profile.into();
        self.extractor.anchors.clear();
        self
    }

    /// Restrict the run to these stories
    pub fn with_stories<I, S>(mut self, stories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stories = stories.into_iter().map(Into::into).collect();
        self
    }

    /// Configured stories as ids
    pub fn story_ids(&self) -> Vec<StoryId> {
        self.stories.iter().map(|s| StoryId::new(s.trim())).collect()
    }

    /// Parser configuration with the mode forced to this run's mode
    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            mode: self.mode,
            ..self.extractor.clone()
        }
    }

    /// Build the normalizer shared by gold and predictions
    pub fn normalizer(&self) -> Result<Normalizer> {
        let normalizer = Normalizer::new()
            .with_endpoint_order(self.endpoint_order)
            .label_sensitive(self.label_sensitive)
            .with_synonyms(&self.synonyms)?;
        Ok(normalizer)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.rounds == 0 {
            return Err(EvaluationError::InvalidConfig(
                "rounds must be at least 1".to_string(),
            ));
        }
        if let Some(blank) = self.stories.iter().find(|s| s.trim().is_empty()) {
            return Err(EvaluationError::InvalidConfig(format!(
                "story id '{}' is blank",
                blank
            )));
        }
        self.extractor_config()
            .validate()
            .map_err(|e| EvaluationError::InvalidConfig(format!("extractor: {}", e)))?;
        self.normalizer()?;
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| EvaluationError::InvalidConfig(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            EvaluationError::InvalidConfig(format!("Failed to serialize to TOML: {}", e))
        })
    }
}

impl Default for EvaluationConfig {
    /// Class extraction, one round, generic transcript profile
    fn default() -> Self {
        Self::new(ExtractionMode::Class)
    }
}
