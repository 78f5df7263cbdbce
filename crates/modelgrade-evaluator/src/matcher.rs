//! Exact matching of predictions against gold
//!
//! Matching is plain equality on [`NormalizedElement`] values. Near misses
//! are scored as one false positive plus one false negative.

use modelgrade_domain::{AggregateCounts, NormalizedElement, Normalizer, Prediction};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Outcome of matching one round against its story's gold set
///
/// The three sets are pairwise disjoint; `true_positives ∪ false_positives`
/// is the deduplicated prediction set and `true_positives ∪ false_negatives`
/// is the gold set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// Predicted and in gold
    pub true_positives: BTreeSet<NormalizedElement>,

    /// Predicted but not in gold
    pub false_positives: BTreeSet<NormalizedElement>,

    /// In gold but never predicted
    pub false_negatives: BTreeSet<NormalizedElement>,
}

impl MatchResult {
    /// Match predicted elements against gold
    ///
    /// Duplicated predictions collapse to a single credit.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelgrade_domain::NormalizedElement;
    /// use modelgrade_evaluator::MatchResult;
    /// use std::collections::BTreeSet;
    ///
    /// let class = |s: &str| NormalizedElement::Class(s.to_string());
    /// let gold: BTreeSet<_> = [class("customer")].into_iter().collect();
    ///
    /// let result = MatchResult::compute(
    ///     vec![class("customer"), class("customer"), class("bogus")],
    ///     &gold,
    /// );
    /// assert_eq!(result.counts().true_positives, 1);
    /// assert_eq!(result.counts().false_positives, 1);
    /// ```
    pub fn compute<I>(predicted: I, gold: &BTreeSet<NormalizedElement>) -> Self
    where
        I: IntoIterator<Item = NormalizedElement>,
    {
        let predicted: BTreeSet<NormalizedElement> = predicted.into_iter().collect();
        let (true_positives, false_positives): (BTreeSet<_>, BTreeSet<_>) =
            predicted.into_iter().partition(|element| gold.contains(element));
        let false_negatives = gold.difference(&true_positives).cloned().collect();
        Self {
            true_positives,
            false_positives,
            false_negatives,
        }
    }

    /// Cardinalities of the three sets
    pub fn counts(&self) -> AggregateCounts {
        AggregateCounts::new(
            self.true_positives.len(),
            self.false_positives.len(),
            self.false_negatives.len(),
        )
    }
}

/// Which predictions take part in a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Every prediction, optional ones included
    All,

    /// Only predictions the model did not flag as optional
    Mandatory,
}

impl Scope {
    /// Both scopes, primary first
    pub const ALL: [Scope; 2] = [Scope::All, Scope::Mandatory];

    /// Lowercase name used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::All => "all",
            Scope::Mandatory => "mandatory",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Match results for one round in both scopes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundMatch {
    /// Every prediction against gold
    pub all: MatchResult,

    /// Mandatory predictions against gold
    pub mandatory: MatchResult,

    /// First raw line seen for each normalized prediction
    pub raw_forms: BTreeMap<NormalizedElement, String>,
}

impl RoundMatch {
    /// Normalize predictions and match them in both scopes
    ///
    /// An element counts as mandatory if any of its occurrences is.
    pub fn compute(
        normalizer: &Normalizer,
        predictions: &[Prediction],
        gold: &BTreeSet<NormalizedElement>,
    ) -> Self {
        let mut raw_forms = BTreeMap::new();
        let mut all = Vec::with_capacity(predictions.len());
        let mut mandatory = Vec::new();

        for prediction in predictions {
            let normalized = normalizer.normalize(&prediction.element);
            raw_forms
                .entry(normalized.clone())
                .or_insert_with(|| prediction.raw.clone());
            if !prediction.optional {
                mandatory.push(normalized.clone());
            }
            all.push(normalized);
        }

        Self {
            all: MatchResult::compute(all, gold),
            mandatory: MatchResult::compute(mandatory, gold),
            raw_forms,
        }
    }

    /// Result for a scope
    pub fn scope(&self, scope: Scope) -> &MatchResult {
        match scope {
            Scope::All => &self.all,
            Scope::Mandatory => &self.mandatory,
        }
    }

    /// Raw text for a normalized prediction, falling back to its display form
    pub fn raw_form(&self, element: &NormalizedElement) -> String {
        self.raw_forms
            .get(element)
            .cloned()
            .unwrap_or_else(|| element.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelgrade_domain::Element;

    fn class(name: &str) -> NormalizedElement {
        NormalizedElement::Class(name.to_string())
    }

    fn set(names: &[&str]) -> BTreeSet<NormalizedElement> {
        names.iter().map(|n| class(n)).collect()
    }

    #[test]
    fn test_partition() {
        let gold = set(&["customer", "order", "invoice"]);
        let result = MatchResult::compute(vec![class("customer"), class("order")], &gold);
        assert_eq!(result.true_positives, set(&["customer", "order"]));
        assert!(result.false_positives.is_empty());
        assert_eq!(result.false_negatives, set(&["invoice"]));
        assert_eq!(result.counts(), AggregateCounts::new(2, 0, 1));
    }

    #[test]
    fn test_no_predictions() {
        let gold = set(&["customer"]);
        let result = MatchResult::compute(Vec::new(), &gold);
        assert_eq!(result.counts(), AggregateCounts::new(0, 0, 1));
    }

    #[test]
    fn test_near_miss_is_fp_and_fn() {
        let gold = set(&["delivery person"]);
        let result = MatchResult::compute(vec![class("courier")], &gold);
        assert_eq!(result.counts(), AggregateCounts::new(0, 1, 1));
    }

    #[test]
    fn test_round_match_scopes() {
        let normalizer = Normalizer::new();
        let gold = set(&["customer", "coupon"]);
        let predictions = vec![
            Prediction::new(Element::class("Customers")),
            Prediction::new(Element::class("Coupon")).optional(),
            Prediction::new(Element::class("Bogus")).optional(),
        ];
        let round = RoundMatch::compute(&normalizer, &predictions, &gold);

        assert_eq!(round.all.counts(), AggregateCounts::new(2, 1, 0));
        assert_eq!(round.mandatory.counts(), AggregateCounts::new(1, 0, 1));
        assert_eq!(round.scope(Scope::Mandatory), &round.mandatory);
    }

    #[test]
    fn test_mandatory_if_any_occurrence_is() {
        let normalizer = Normalizer::new();
        let gold = set(&["coupon"]);
        let predictions = vec![
            Prediction::new(Element::class("Coupon")).optional(),
            Prediction::new(Element::class("coupons")),
        ];
        let round = RoundMatch::compute(&normalizer, &predictions, &gold);
        assert_eq!(round.mandatory.counts(), AggregateCounts::new(1, 0, 0));
    }

    #[test]
    fn test_raw_form_keeps_first_occurrence() {
        let normalizer = Normalizer::new();
        let gold = set(&["customer"]);
        let predictions = vec![
            Prediction::new(Element::class("Bogus")).with_raw("**Bogus**: first"),
            Prediction::new(Element::class("bogus")).with_raw("bogus again"),
        ];
        let round = RoundMatch::compute(&normalizer, &predictions, &gold);
        assert_eq!(round.raw_form(&class("bogus")), "**Bogus**: first");
        assert_eq!(round.raw_form(&class("unseen")), "unseen");
    }

    #[test]
    fn test_scope_names() {
        assert_eq!(Scope::All.to_string(), "all");
        assert_eq!(Scope::Mandatory.as_str(), "mandatory");
    }
}
