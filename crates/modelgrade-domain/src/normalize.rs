//! Element normalization
//!
//! Canonicalizes predicted and gold elements so the matcher can compare them
//! with plain equality. Normalization is a pure, total and idempotent
//! function: `normalize(normalize(x)) == normalize(x)` for every input.

use crate::element::Element;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Leading tokens dropped from a name while more than one token remains
const DETERMINERS: &[&str] = &["a", "an", "the"];

/// Words whose trailing `s` is not a plural marker
const PRESERVED_WORDS: &[&str] = &[
    "business", "class", "news", "process", "progress", "address", "status",
    "series", "species", "analysis", "canvas", "alias", "bonus", "campus",
];

/// Irregular plural forms
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("people", "person"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("mice", "mouse"),
];

/// Words shorter than this are never singularized
const MIN_SINGULARIZE_LEN: usize = 4;

/// Whether the two endpoints of an association are compared in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndpointOrder {
    /// `(A, B)` and `(B, A)` are the same association
    #[default]
    Unordered,

    /// `(A, B)` and `(B, A)` are different associations
    Ordered,
}

/// Canonical form of an element, used only for matching
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NormalizedElement {
    /// Normalized class name
    Class(String),

    /// Normalized association
    Association {
        /// First endpoint (lexicographically smaller when unordered)
        source: String,

        /// Second endpoint
        target: String,

        /// Normalized label, present only under label-sensitive matching
        label: Option<String>,
    },
}

impl fmt::Display for NormalizedElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedElement::Class(name) => f.write_str(name),
            NormalizedElement::Association { source, target, label: None } => {
                write!(f, "{}-{}", source, target)
            }
            NormalizedElement::Association { source, target, label: Some(label) } => {
                write!(f, "{}-({})-{}", source, label, target)
            }
        }
    }
}

/// Errors raised while building a normalizer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizerError {
    /// A synonym's standard term is itself listed as a synonym
    #[error("synonym '{synonym}' maps to '{standard}', which is itself a synonym")]
    SynonymCycle {
        /// The synonym being mapped
        synonym: String,
        /// Its standard term, which is also a synonym key
        standard: String,
    },

    /// Two different standard terms were given for one synonym
    #[error("synonym '{synonym}' maps to both '{first}' and '{second}'")]
    ConflictingSynonym {
        /// The synonym with more than one target
        synonym: String,
        /// First standard term seen
        first: String,
        /// Second standard term seen
        second: String,
    },
}

/// Maps raw elements to their canonical comparison form
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    endpoint_order: EndpointOrder,
    label_sensitive: bool,
    synonyms: HashMap<String, String>,
}

impl Normalizer {
    /// Create a normalizer with unordered, label-insensitive associations
    pub fn new() -> Self {
        Self::default()
    }

    /// Set association endpoint ordering
    pub fn with_endpoint_order(mut self, order: EndpointOrder) -> Self {
        self.endpoint_order = order;
        self
    }

    /// Keep association labels in the normalized form
    pub fn label_sensitive(mut self, sensitive: bool) -> Self {
        self.label_sensitive = sensitive;
        self
    }

    /// Install a synonym table of `(synonym, standard)` pairs
    ///
    /// Both sides are normalized first. Pairs that normalize to the same term
    /// are dropped. A standard term that is also a synonym key is rejected so
    /// that normalization stays idempotent.
    pub fn with_synonyms<I, S, T>(mut self, pairs: I) -> Result<Self, NormalizerError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut table: HashMap<String, String> = HashMap::new();
        for (synonym, standard) in pairs {
            let synonym = base_name(synonym.as_ref());
            let standard = base_name(standard.as_ref());
            if synonym.is_empty() || standard.is_empty() || synonym == standard {
                continue;
            }
            if let Some(existing) = table.get(&synonym) {
                if *existing != standard {
                    return Err(NormalizerError::ConflictingSynonym {
                        synonym,
                        first: existing.clone(),
                        second: standard,
                    });
                }
                continue;
            }
            table.insert(synonym, standard);
        }

        for (synonym, standard) in &table {
            if table.contains_key(standard) {
                return Err(NormalizerError::SynonymCycle {
                    synonym: synonym.clone(),
                    standard: standard.clone(),
                });
            }
        }

        self.synonyms = table;
        Ok(self)
    }

    /// Endpoint ordering in effect
    pub fn endpoint_order(&self) -> EndpointOrder {
        self.endpoint_order
    }

    /// Whether labels take part in comparison
    pub fn is_label_sensitive(&self) -> bool {
        self.label_sensitive
    }

    /// Normalize a single name (class name, endpoint or label)
    ///
    /// # Examples
    ///
    /// ```
    /// use modelgrade_domain::Normalizer;
    ///
    /// let n = Normalizer::new();
    /// assert_eq!(n.normalize_name("  The   Delivery  Persons "), "delivery person");
    /// assert_eq!(n.normalize_name("Activities"), "activity");
    /// assert_eq!(n.normalize_name("Address"), "address");
    /// ```
    pub fn normalize_name(&self, raw: &str) -> String {
        let base = base_name(raw);
        match self.synonyms.get(&base) {
            Some(standard) => standard.clone(),
            None => base,
        }
    }

    /// Normalize an element
    pub fn normalize(&self, element: &Element) -> NormalizedElement {
        match element {
            Element::Class { name } => NormalizedElement::Class(self.normalize_name(name)),
            Element::Association { source, target, label } => {
                let mut source = self.normalize_name(source);
                let mut target = self.normalize_name(target);
                if self.endpoint_order == EndpointOrder::Unordered && source > target {
                    std::mem::swap(&mut source, &mut target);
                }
                let label = if self.label_sensitive {
                    label
                        .as_deref()
                        .map(|l| self.normalize_name(l))
                        .filter(|l| !l.is_empty())
                } else {
                    None
                };
                NormalizedElement::Association { source, target, label }
            }
        }
    }

    /// Re-normalize an already normalized element
    ///
    /// Returns the input unchanged for values produced by this normalizer.
    pub fn renormalize(&self, element: &NormalizedElement) -> NormalizedElement {
        match element {
            NormalizedElement::Class(name) => self.normalize(&Element::class(name.as_str())),
            NormalizedElement::Association { source, target, label } => {
                self.normalize(&Element::Association {
                    source: source.clone(),
                    target: target.clone(),
                    label: label.clone(),
                })
            }
        }
    }
}

/// Lowercase, collapse whitespace, strip leading determiners, singularize
fn base_name(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let mut tokens: Vec<&str> = lowered.split_whitespace().collect();

    while tokens.len() > 1 && DETERMINERS.contains(&tokens[0]) {
        tokens.remove(0);
    }

    let Some(last) = tokens.pop() else {
        return String::new();
    };
    let singular = singularize(last);

    let mut out = tokens.join(" ");
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(&singular);
    out
}

/// Rule-based singularization of one lowercase word
fn singularize(word: &str) -> String {
    if let Some((_, singular)) = IRREGULAR_PLURALS.iter().find(|(plural, _)| *plural == word) {
        return (*singular).to_string();
    }
    if word.chars().count() < MIN_SINGULARIZE_LEN || PRESERVED_WORDS.contains(&word) {
        return word.to_string();
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{}y", stem);
    }
    for suffix in ["sses", "xes", "ches", "shes", "zzes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    match word.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_normalization() {
        let n = Normalizer::new();
        assert_eq!(n.normalize_name("Customer"), "customer");
        assert_eq!(n.normalize_name("  Order   Items "), "order item");
        assert_eq!(n.normalize_name("An Invoice"), "invoice");
        assert_eq!(n.normalize_name("the"), "the");
        assert_eq!(n.normalize_name("The The Order"), "order");
    }

    #[test]
    fn test_singularization_rules() {
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("addresses"), "address");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("matches"), "match");
        assert_eq!(singularize("wishes"), "wish");
        assert_eq!(singularize("orders"), "order");
        assert_eq!(singularize("status"), "status");
        assert_eq!(singularize("glass"), "glass");
        assert_eq!(singularize("people"), "person");
        assert_eq!(singularize("bus"), "bus");
        assert_eq!(singularize("series"), "series");
    }

    #[test]
    fn test_unordered_association() {
        let n = Normalizer::new();
        let a = n.normalize(&Element::labelled("Driver", "Vehicle", "drives"));
        let b = n.normalize(&Element::labelled("vehicle", "driver", "owns"));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "driver-vehicle");
    }

    #[test]
    fn test_ordered_association() {
        let n = Normalizer::new().with_endpoint_order(EndpointOrder::Ordered);
        let a = n.normalize(&Element::association("Driver", "Vehicle"));
        let b = n.normalize(&Element::association("Vehicle", "Driver"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_label_sensitive_association() {
        let n = Normalizer::new().label_sensitive(true);
        let a = n.normalize(&Element::labelled("Driver", "Vehicle", "Drives"));
        let b = n.normalize(&Element::labelled("vehicle", "driver", "drives"));
        let c = n.normalize(&Element::labelled("vehicle", "driver", "owns"));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "driver-(drive)-vehicle");
    }

    #[test]
    fn test_blank_label_is_dropped() {
        let n = Normalizer::new().label_sensitive(true);
        let a = n.normalize(&Element::labelled("A", "B", "  "));
        assert_eq!(a, n.normalize(&Element::association("a", "b")));
    }

    #[test]
    fn test_synonyms() {
        let n = Normalizer::new()
            .with_synonyms([("Client", "Customer"), ("Purchasers", "customer")])
            .unwrap();
        assert_eq!(n.normalize_name("clients"), "customer");
        assert_eq!(n.normalize_name("Purchaser"), "customer");
        assert_eq!(n.normalize_name("Customer"), "customer");
    }

    #[test]
    fn test_synonym_cycle_rejected() {
        let err = Normalizer::new()
            .with_synonyms([("client", "customer"), ("customer", "buyer")])
            .unwrap_err();
        assert!(matches!(err, NormalizerError::SynonymCycle { .. }));
    }

    #[test]
    fn test_conflicting_synonym_rejected() {
        let err = Normalizer::new()
            .with_synonyms([("client", "customer"), ("clients", "buyer")])
            .unwrap_err();
        assert!(matches!(err, NormalizerError::ConflictingSynonym { .. }));
        assert_eq!(
            err.to_string(),
            "synonym 'client' maps to both 'customer' and 'buyer'"
        );
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(Normalizer::new().normalize_name("   "), "");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn normalizer() -> Normalizer {
        Normalizer::new()
            .with_synonyms([("client", "customer"), ("staff member", "employee")])
            .unwrap()
    }

    proptest! {
        /// Property: name normalization is idempotent
        #[test]
        fn test_name_idempotent(raw in "[A-Za-z ]{0,40}") {
            let n = normalizer();
            let once = n.normalize_name(&raw);
            prop_assert_eq!(n.normalize_name(&once), once);
        }

        /// Property: idempotence holds for arbitrary unicode text
        #[test]
        fn test_name_idempotent_unicode(raw in "\\PC{0,30}") {
            let n = Normalizer::new();
            let once = n.normalize_name(&raw);
            prop_assert_eq!(n.normalize_name(&once), once);
        }

        /// Property: association normalization is idempotent in every configuration
        #[test]
        fn test_association_idempotent(
            a in "[A-Za-z ]{1,20}",
            b in "[A-Za-z ]{1,20}",
            label in proptest::option::of("[A-Za-z ]{1,12}"),
            ordered: bool,
            sensitive: bool,
        ) {
            let order = if ordered { EndpointOrder::Ordered } else { EndpointOrder::Unordered };
            let n = normalizer().with_endpoint_order(order).label_sensitive(sensitive);
            let element = Element::Association { source: a, target: b, label };
            let once = n.normalize(&element);
            prop_assert_eq!(n.renormalize(&once), once);
        }

        /// Property: unordered normalization ignores endpoint order
        #[test]
        fn test_unordered_symmetry(a in "[A-Za-z]{1,12}", b in "[A-Za-z]{1,12}") {
            let n = Normalizer::new();
            prop_assert_eq!(
                n.normalize(&Element::association(a.clone(), b.clone())),
                n.normalize(&Element::association(b, a))
            );
        }
    }
}
