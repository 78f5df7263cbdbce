//! Serde adapter for [`ExtractionMode`]
//!
//! The domain crate stays serde-free; configs that carry a mode use
//! `#[serde(with = "modelgrade_extractor::serde_mode")]`.

use modelgrade_domain::ExtractionMode;
use serde::{Deserialize, Deserializer, Serializer};

/// Serialize a mode as `"class"` or `"association"`
pub fn serialize<S>(mode: &ExtractionMode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(mode.as_str())
}

/// Deserialize a mode from its name (singular or plural)
pub fn deserialize<'de, D>(deserializer: D) -> Result<ExtractionMode, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}
