//! Element module - the unit a model proposes and a gold standard lists

use std::fmt;
use std::str::FromStr;

/// Which kind of domain-model element a transcript is expected to contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExtractionMode {
    /// One class name per list line
    Class,

    /// Two endpoint class names plus an optional relation label per line
    Association,
}

impl ExtractionMode {
    /// Lowercase name used in configuration files and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMode::Class => "class",
            ExtractionMode::Association => "association",
        }
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtractionMode {
    type Err = String;

    /// Parse a mode name
    ///
    /// # Examples
    ///
    /// ```
    /// use modelgrade_domain::ExtractionMode;
    ///
    /// assert_eq!("Class".parse::<ExtractionMode>(), Ok(ExtractionMode::Class));
    /// assert!("diagram".parse::<ExtractionMode>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "class" | "classes" => Ok(ExtractionMode::Class),
            "association" | "associations" => Ok(ExtractionMode::Association),
            other => Err(format!(
                "unknown extraction mode '{}' (expected 'class' or 'association')",
                other
            )),
        }
    }
}

/// A single extracted or gold domain concept
///
/// Each variant carries exactly the fields it needs, so an association can
/// never be missing an endpoint and a class can never carry a label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    /// A class name
    Class {
        /// Class name as written
        name: String,
    },

    /// A pair of class names with an optional relation label
    Association {
        /// First endpoint as written
        source: String,

        /// Second endpoint as written
        target: String,

        /// Relation phrase, if the line carried one
        label: Option<String>,
    },
}

impl Element {
    /// Create a class element
    pub fn class(name: impl Into<String>) -> Self {
        Element::Class { name: name.into() }
    }

    /// Create an association element without a label
    pub fn association(source: impl Into<String>, target: impl Into<String>) -> Self {
        Element::Association {
            source: source.into(),
            target: target.into(),
            label: None,
        }
    }

    /// Create a labelled association element
    pub fn labelled(
        source: impl Into<String>,
        target: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Element::Association {
            source: source.into(),
            target: target.into(),
            label: Some(label.into()),
        }
    }

    /// The extraction mode this element belongs to
    pub fn mode(&self) -> ExtractionMode {
        match self {
            Element::Class { .. } => ExtractionMode::Class,
            Element::Association { .. } => ExtractionMode::Association,
        }
    }

    /// True if any required field is empty after trimming
    pub fn is_blank(&self) -> bool {
        match self {
            Element::Class { name } => name.trim().is_empty(),
            Element::Association { source, target, .. } => {
                source.trim().is_empty() || target.trim().is_empty()
            }
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Class { name } => write!(f, "{}", name),
            Element::Association { source, target, label: None } => {
                write!(f, "{}-{}", source, target)
            }
            Element::Association { source, target, label: Some(label) } => {
                write!(f, "{}-({})-{}", source, label, target)
            }
        }
    }
}

/// An element as proposed by a model in one transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    /// The parsed element
    pub element: Element,

    /// The list line the element came from, after bullet removal
    pub raw: String,

    /// Whether the model flagged the element as optional
    pub optional: bool,
}

impl Prediction {
    /// Create a mandatory prediction whose raw text is the element's display form
    pub fn new(element: Element) -> Self {
        let raw = element.to_string();
        Self {
            element,
            raw,
            optional: false,
        }
    }

    /// Mark this prediction as optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Replace the raw text
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = raw.into();
        self
    }
}
