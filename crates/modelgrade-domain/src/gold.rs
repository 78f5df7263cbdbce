//! Gold standard module - the human-curated reference elements per story

use crate::element::{Element, ExtractionMode};
use crate::normalize::{NormalizedElement, Normalizer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// Identifier of a user story (or story collection) being evaluated
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StoryId(String);

impl StoryId {
    /// Create a story identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StoryId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for StoryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Errors raised while building a gold set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GoldSetError {
    /// A story has no usable gold elements
    #[error("story '{0}' has no gold elements")]
    EmptyGoldSet(StoryId),

    /// A gold element does not belong to the gold set's extraction mode
    #[error("gold element '{element}' of story '{story}' is not a {expected} element")]
    ModeMismatch {
        /// Story the element was listed under
        story: StoryId,
        /// Expected mode
        expected: ExtractionMode,
        /// Display form of the offending element
        element: String,
    },
}

/// Reference mapping from story to its normalized gold elements
///
/// Built once per evaluation run and read-only afterwards. Gold strings are
/// normalized here with the run's normalizer so both sides of a comparison
/// are canonicalized identically.
#[derive(Debug, Clone)]
pub struct GoldSet {
    mode: ExtractionMode,
    stories: BTreeMap<StoryId, BTreeSet<NormalizedElement>>,
}

impl GoldSet {
    /// Normalize and index gold elements per story
    ///
    /// Blank elements are ignored. A story whose element list is empty after
    /// that is rejected with [`GoldSetError::EmptyGoldSet`].
    ///
    /// # Examples
    ///
    /// ```
    /// use modelgrade_domain::{Element, ExtractionMode, GoldSet, Normalizer, StoryId};
    ///
    /// let gold = GoldSet::new(
    ///     ExtractionMode::Class,
    ///     &Normalizer::new(),
    ///     vec![(StoryId::new("shop"), vec![Element::class("Customers"), Element::class("customer")])],
    /// )
    /// .unwrap();
    /// assert_eq!(gold.elements(&StoryId::new("shop")).unwrap().len(), 1);
    /// ```
    pub fn new<I, E>(
        mode: ExtractionMode,
        normalizer: &Normalizer,
        entries: I,
    ) -> Result<Self, GoldSetError>
    where
        I: IntoIterator<Item = (StoryId, E)>,
        E: IntoIterator<Item = Element>,
    {
        let mut stories = BTreeMap::new();
        for (story, elements) in entries {
            let mut normalized = BTreeSet::new();
            for element in elements {
                if element.mode() != mode {
                    return Err(GoldSetError::ModeMismatch {
                        story,
                        expected: mode,
                        element: element.to_string(),
                    });
                }
                if element.is_blank() {
                    continue;
                }
                normalized.insert(normalizer.normalize(&element));
            }
            if normalized.is_empty() {
                return Err(GoldSetError::EmptyGoldSet(story));
            }
            stories
                .entry(story)
                .or_insert_with(BTreeSet::new)
                .extend(normalized);
        }
        Ok(Self { mode, stories })
    }

    /// Extraction mode of every element in this set
    pub fn mode(&self) -> ExtractionMode {
        self.mode
    }

    /// Gold elements of a story
    pub fn elements(&self, story: &StoryId) -> Option<&BTreeSet<NormalizedElement>> {
        self.stories.get(story)
    }

    /// Whether a story has gold elements
    pub fn contains_story(&self, story: &StoryId) -> bool {
        self.stories.contains_key(story)
    }

    /// All story identifiers in order
    pub fn stories(&self) -> impl Iterator<Item = &StoryId> {
        self.stories.keys()
    }

    /// Number of stories
    pub fn len(&self) -> usize {
        self.stories.len()
    }

    /// True if no story is configured
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }
}
