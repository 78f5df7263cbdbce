//! Gold standard files.
//!
//! ```toml
//! [stories.shop]
//! classes = ["Customer", "Order", "Invoice"]
//! associations = [["Customer", "Order"], ["Order", "Invoice", "billed by"], "Customer-Invoice"]
//! ```
//!
//! An association written as a single string is split once on the configured
//! separator; use the array form to give a label.

use crate::error::{CliError, Result};
use modelgrade_domain::{Element, ExtractionMode, StoryId};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Gold elements grouped by story.
pub type GoldEntries = Vec<(StoryId, Vec<Element>)>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GoldFile {
    #[serde(default)]
    stories: BTreeMap<String, GoldStory>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GoldStory {
    classes: Option<Vec<String>>,
    associations: Option<Vec<AssociationEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AssociationEntry {
    Parts(Vec<String>),
    Line(String),
}

impl AssociationEntry {
    fn to_element(&self, separator: &str) -> std::result::Result<Element, String> {
        match self {
            AssociationEntry::Parts(parts) => match parts.as_slice() {
                [source, target] => Ok(Element::association(source.trim(), target.trim())),
                [source, target, label] => {
                    Ok(Element::labelled(source.trim(), target.trim(), label.trim()))
                }
                _ => Err(format!(
                    "association {:?} must have two endpoints and an optional label",
                    parts
                )),
            },
            AssociationEntry::Line(line) => line
                .split_once(separator)
                .map(|(source, target)| Element::association(source.trim(), target.trim()))
                .ok_or_else(|| format!("association '{}' has no '{}' separator", line, separator)),
        }
    }
}

/// Read a gold standard file for one extraction mode.
///
/// Content problems are reported against the file's path; malformed TOML
/// surfaces as [`CliError::Toml`].
pub fn load(path: &Path, mode: ExtractionMode, separator: &str) -> Result<GoldEntries> {
    let contents = fs::read_to_string(path)?;
    parse(&contents, mode, separator).map_err(|e| match e {
        CliError::InvalidInput(reason) => CliError::Gold {
            path: path.to_path_buf(),
            reason,
        },
        other => other,
    })
}

/// Parse gold standard TOML for one extraction mode.
pub fn parse(contents: &str, mode: ExtractionMode, separator: &str) -> Result<GoldEntries> {
    let file: GoldFile = toml::from_str(contents)?;
    collect(file, mode, separator).map_err(CliError::InvalidInput)
}

/// Stories that do not list the mode's key at all are left out; a key that is
/// present but empty is passed through so the evaluation can reject it.
fn collect(
    file: GoldFile,
    mode: ExtractionMode,
    separator: &str,
) -> std::result::Result<GoldEntries, String> {
    let mut entries = Vec::new();

    for (story, gold) in file.stories {
        let elements: Option<Vec<Element>> = match mode {
            ExtractionMode::Class => gold
                .classes
                .map(|names| names.iter().map(|n| Element::class(n.trim())).collect()),
            ExtractionMode::Association => gold
                .associations
                .map(|list| {
                    list.iter()
                        .map(|a| a.to_element(separator))
                        .collect::<std::result::Result<Vec<_>, _>>()
                })
                .transpose()
                .map_err(|e| format!("story '{}': {}", story, e))?,
        };
        match elements {
            Some(elements) => entries.push((StoryId::new(story), elements)),
            None => debug!("Story '{}' has no {} gold; left out", story, mode),
        }
    }

    if entries.is_empty() {
        return Err(format!("no story lists {} gold", mode));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const GOLD: &str = r#"
[stories.shop]
classes = ["Customer", " Order "]
associations = [["Customer", "Order"], ["Order", "Invoice", "billed by"], "Customer-Invoice"]

[stories.library]
classes = ["Book"]
"#;

    #[test]
    fn test_class_gold() {
        let entries = parse(GOLD, ExtractionMode::Class, "-").unwrap();
        assert_eq!(entries.len(), 2);
        let (story, elements) = &entries[1];
        assert_eq!(story.as_str(), "shop");
        assert_eq!(elements, &vec![Element::class("Customer"), Element::class("Order")]);
    }

    #[test]
    fn test_association_gold_forms() {
        let entries = parse(GOLD, ExtractionMode::Association, "-").unwrap();
        assert_eq!(entries.len(), 1, "library has no associations");
        assert_eq!(
            entries[0].1,
            vec![
                Element::association("Customer", "Order"),
                Element::labelled("Order", "Invoice", "billed by"),
                Element::association("Customer", "Invoice"),
            ]
        );
    }

    #[test]
    fn test_bad_association_arity() {
        let gold = "[stories.shop]\nassociations = [[\"Customer\"]]\n";
        let err = parse(gold, ExtractionMode::Association, "-").unwrap_err();
        assert!(matches!(&err, CliError::InvalidInput(reason) if reason.contains("shop")));
    }

    #[test]
    fn test_line_without_separator() {
        let gold = "[stories.shop]\nassociations = [\"Customer Order\"]\n";
        assert!(parse(gold, ExtractionMode::Association, "-").is_err());
    }

    #[test]
    fn test_no_gold_for_mode() {
        let gold = "[stories.shop]\nclasses = [\"Customer\"]\n";
        assert!(parse(gold, ExtractionMode::Association, "-").is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let gold = "[stories.shop]\nclass = [\"Customer\"]\n";
        assert!(matches!(
            parse(gold, ExtractionMode::Class, "-"),
            Err(CliError::Toml(_))
        ));
    }

    #[test]
    fn test_malformed_toml() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not toml [").unwrap();
        let err = load(file.path(), ExtractionMode::Class, "-").unwrap_err();
        assert!(matches!(err, CliError::Toml(_)));
        assert!(err.to_string().starts_with("TOML parsing error"));
    }

    #[test]
    fn test_load_reports_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[stories.shop]\nclasses = [\"Customer\"]\n").unwrap();
        match load(file.path(), ExtractionMode::Association, "-") {
            Err(CliError::Gold { path, reason }) => {
                assert_eq!(path, file.path());
                assert!(reason.contains("association"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
