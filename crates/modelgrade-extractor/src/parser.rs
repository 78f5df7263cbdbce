//! Parse cleaned list lines into elements

use crate::error::ExtractorError;
use modelgrade_domain::{Element, ExtractionMode};
use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

/// Default pattern for the `(optional)` / `(opt)` / `[optional]` marker
pub const DEFAULT_OPTIONAL_MARKER: &str = r"[(\[]\s*opt(?:ional)?\.?\s*[)\]]";

/// What one list line turned into
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineOutcome {
    /// Parsed elements and the line's optional flag
    ///
    /// A class line naming several classes yields one element per class.
    Parsed(Vec<Element>, bool),

    /// Nothing left after cleaning; not an error
    Ignored,

    /// The line failed to parse
    Skipped(String),
}

fn parenthetical_regex() -> &'static Regex {
    static PAREN: OnceLock<Regex> = OnceLock::new();
    PAREN.get_or_init(|| Regex::new(r"\s*\([^()]*\)").expect("parenthetical pattern is valid"))
}

fn conjunction_regex() -> &'static Regex {
    static AND: OnceLock<Regex> = OnceLock::new();
    AND.get_or_init(|| Regex::new(r"(?i)\s+and\s+").expect("conjunction pattern is valid"))
}

fn explanation_regex() -> &'static Regex {
    static EXPLANATION: OnceLock<Regex> = OnceLock::new();
    EXPLANATION.get_or_init(|| {
        Regex::new(r"(?i)\s*\([^()]*explanation[^()]*\)").expect("explanation pattern is valid")
    })
}

/// Drop Markdown emphasis and inline code markers
fn strip_emphasis(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '*' | '`')).collect()
}

/// Cut the line at the first trailing-note delimiter
fn cut_note<'a>(text: &'a str, delimiters: &[&str]) -> &'a str {
    let cut = delimiters
        .iter()
        .filter_map(|d| text.find(d))
        .min()
        .unwrap_or(text.len());
    &text[..cut]
}

fn strip_parentheticals(text: &str) -> String {
    parenthetical_regex().replace_all(text, "").into_owned()
}

/// Split a class line that groups several classes
///
/// `A, B and C` names three classes. Within each name, `/` introduces an
/// alternative spelling of the same class and only the first is kept.
fn split_grouped(text: &str) -> Vec<String> {
    text.split(',')
        .flat_map(|part| conjunction_regex().split(part))
        .map(|name| tidy(name.split('/').next().unwrap_or_default()))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Remove one pair of parentheses wrapping the whole text
///
/// `(x (y))` becomes `x (y)`; `(x)-(y)` is left alone because its first
/// parenthesis closes before the end.
fn unwrap_parens(text: &str) -> &str {
    let text = text.trim();
    let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) else {
        return text;
    };
    let mut depth = 0usize;
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return text,
            ')' => depth -= 1,
            _ => {}
        }
    }
    inner.trim()
}

/// Trim whitespace, quotes and stray punctuation; collapse inner whitespace
fn tidy(text: &str) -> String {
    let trimmed = text.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '.' | ',' | ';' | ':' | '>' | '<' | '"' | '\'' | '“' | '”')
    });
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Turns cleaned list lines into elements for one extraction mode
#[derive(Debug, Clone)]
pub(crate) struct LineParser {
    mode: ExtractionMode,
    separator: String,
    optional: Regex,
}

impl LineParser {
    pub(crate) fn new(
        mode: ExtractionMode,
        separator: impl Into<String>,
        optional_marker: &str,
    ) -> Result<Self, ExtractorError> {
        let optional = RegexBuilder::new(optional_marker)
            .case_insensitive(true)
            .build()
            .map_err(|e| ExtractorError::InvalidPattern {
                pattern: optional_marker.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { mode, separator: separator.into(), optional })
    }

    /// True if the line carries the optional marker
    pub(crate) fn has_optional_marker(&self, text: &str) -> bool {
        self.optional.is_match(text)
    }

    /// Remove the optional marker, reporting whether one was present
    fn take_optional(&self, text: &str) -> (String, bool) {
        let optional = self.has_optional_marker(text);
        let stripped = self.optional.replace_all(text, " ");
        (stripped.into_owned(), optional)
    }

    pub(crate) fn parse(&self, text: &str) -> LineOutcome {
        match self.mode {
            ExtractionMode::Class => self.parse_class_line(text),
            ExtractionMode::Association => self.parse_association_line(text),
        }
    }

    /// Parse a class list line
    ///
    /// Parenthetical notes (including `(or X)` alternatives) and trailing
    /// notes after `:` or a spaced dash are removed. What remains is split on
    /// commas and `and` into one class per name.
    fn parse_class_line(&self, text: &str) -> LineOutcome {
        let (text, optional) = self.take_optional(text);
        let text = strip_emphasis(&text);
        let text = strip_parentheticals(&text);
        let names = split_grouped(cut_note(&text, &[":", " - ", " – ", " — "]));
        if names.is_empty() {
            return LineOutcome::Ignored;
        }
        LineOutcome::Parsed(names.into_iter().map(Element::class).collect(), optional)
    }

    /// True if `text` already holds two endpoints on its own
    fn has_endpoints(&self, text: &str) -> bool {
        let text = text.trim();
        if text.starts_with('(') && text.ends_with(')') {
            return true;
        }
        text.split(self.separator.as_str())
            .filter(|t| !t.trim().is_empty())
            .count()
            >= 2
    }

    /// Parse an association list line
    ///
    /// Accepts `X<sep>Y`, `X<sep>(label)<sep>Y`, `X <sep> label <sep> Y` and the
    /// tuple forms `(X, Y)` / `(X, Y, label)`. The first and last tokens are the
    /// endpoints; anything between them is the label. A spaced ` - ` ends the
    /// association once the text before it already names both endpoints.
    fn parse_association_line(&self, text: &str) -> LineOutcome {
        let (text, optional) = self.take_optional(text);
        let text = strip_emphasis(&text);
        let text = explanation_regex().replace_all(&text, "");
        let mut core = cut_note(&text, &[":", " — ", " – "]).trim();
        if let Some((head, _note)) = core.split_once(" - ") {
            if self.has_endpoints(head) {
                core = head.trim();
            }
        }

        let separator = self.separator.as_str();
        let tokens: Vec<&str> = match core.strip_prefix('(').and_then(|c| c.strip_suffix(')')) {
            Some(inner) => inner.split(',').map(str::trim).filter(|t| !t.is_empty()).collect(),
            None => core.split(separator).map(str::trim).filter(|t| !t.is_empty()).collect(),
        };
        let tuple = core.starts_with('(') && core.ends_with(')');

        if tokens.len() < 2 {
            return LineOutcome::Skipped(format!(
                "expected two endpoints separated by '{}'",
                if tuple { "," } else { separator }
            ));
        }

        let (source, target, middle) = if tuple {
            (tokens[0], tokens[1], &tokens[2..])
        } else {
            (tokens[0], tokens[tokens.len() - 1], &tokens[1..tokens.len() - 1])
        };

        let source = tidy(&strip_parentheticals(source));
        let target = tidy(&strip_parentheticals(target));
        if source.is_empty() || target.is_empty() {
            return LineOutcome::Skipped("empty endpoint after cleaning".to_string());
        }

        let joiner = if tuple { ", " } else { separator };
        let label = tidy(unwrap_parens(&middle.join(joiner)));
        let element = if label.is_empty() {
            Element::association(source, target)
        } else {
            Element::labelled(source, target, label)
        };
        LineOutcome::Parsed(vec![element], optional)
    }
}
