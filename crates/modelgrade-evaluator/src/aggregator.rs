//! Folding per-round match results into running totals

use crate::error::{EvaluationError, Result};
use crate::matcher::{RoundMatch, Scope};
use modelgrade_domain::{AggregateCounts, StoryId};
use std::collections::{BTreeMap, BTreeSet};
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use tracing::debug;

/// Counts for both matching scopes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopedCounts {
    /// Every prediction
    pub all: AggregateCounts,

    /// Mandatory predictions only
    pub mandatory: AggregateCounts,
}

impl ScopedCounts {
    /// Counts of one round's match results
    pub fn of(matched: &RoundMatch) -> Self {
        Self {
            all: matched.all.counts(),
            mandatory: matched.mandatory.counts(),
        }
    }

    /// Counts for a scope
    pub fn scope(&self, scope: Scope) -> AggregateCounts {
        match scope {
            Scope::All => self.all,
            Scope::Mandatory => self.mandatory,
        }
    }
}

impl Add for ScopedCounts {
    type Output = ScopedCounts;

    fn add(self, other: ScopedCounts) -> ScopedCounts {
        ScopedCounts {
            all: self.all + other.all,
            mandatory: self.mandatory + other.mandatory,
        }
    }
}

impl AddAssign for ScopedCounts {
    fn add_assign(&mut self, other: ScopedCounts) {
        *self = *self + other;
    }
}

impl Sum for ScopedCounts {
    fn sum<I: Iterator<Item = ScopedCounts>>(iter: I) -> Self {
        iter.fold(ScopedCounts::default(), Add::add)
    }
}

/// What became of one round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundStatus {
    /// Parsed and matched
    Scored(RoundMatch),

    /// Excluded from aggregation, with the reason
    Failed(String),
}

/// One folded round, kept for per-round reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRecord {
    /// Story the round belongs to
    pub story: StoryId,

    /// 1-based round number
    pub round: u32,

    /// Match results or failure reason
    pub status: RoundStatus,

    /// List lines the parser could not use
    pub skipped_lines: usize,
}

impl RoundRecord {
    /// True if the round was excluded from aggregation
    pub fn is_failed(&self) -> bool {
        matches!(self.status, RoundStatus::Failed(_))
    }

    /// Match results of a scored round
    pub fn matched(&self) -> Option<&RoundMatch> {
        match &self.status {
            RoundStatus::Scored(matched) => Some(matched),
            RoundStatus::Failed(_) => None,
        }
    }

    /// Counts of a scored round
    pub fn counts(&self) -> Option<ScopedCounts> {
        self.matched().map(ScopedCounts::of)
    }

    /// Failure reason of a failed round
    pub fn failure(&self) -> Option<&str> {
        match &self.status {
            RoundStatus::Failed(reason) => Some(reason),
            RoundStatus::Scored(_) => None,
        }
    }
}

/// Owns the running totals of an evaluation run
///
/// Totals start at zero and only grow. Each (story, round) pair may be
/// recorded once; failed rounds are kept for diagnostics but contribute
/// nothing to the totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundAggregator {
    records: BTreeMap<(StoryId, u32), RoundRecord>,
    totals: ScopedCounts,
}

impl RoundAggregator {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a scored round into the totals
    ///
    /// Returns the round's own counts.
    pub fn fold(
        &mut self,
        story: StoryId,
        round: u32,
        matched: RoundMatch,
        skipped_lines: usize,
    ) -> Result<ScopedCounts> {
        let counts = ScopedCounts::of(&matched);
        self.insert(RoundRecord {
            story,
            round,
            status: RoundStatus::Scored(matched),
            skipped_lines,
        })?;
        Ok(counts)
    }

    /// Record a round that could not be scored
    pub fn record_failure(
        &mut self,
        story: StoryId,
        round: u32,
        reason: impl Into<String>,
        skipped_lines: usize,
    ) -> Result<()> {
        self.insert(RoundRecord {
            story,
            round,
            status: RoundStatus::Failed(reason.into()),
            skipped_lines,
        })
    }

    fn insert(&mut self, record: RoundRecord) -> Result<()> {
        let key = (record.story.clone(), record.round);
        if self.records.contains_key(&key) {
            return Err(EvaluationError::DuplicateRound {
                story: record.story,
                round: record.round,
            });
        }
        if let Some(counts) = record.counts() {
            self.totals += counts;
        }
        debug!(
            "Folded story '{}' round {} ({}); totals now tp={} fp={} fn={}",
            record.story,
            record.round,
            if record.is_failed() { "failed" } else { "scored" },
            self.totals.all.true_positives,
            self.totals.all.false_positives,
            self.totals.all.false_negatives
        );
        self.records.insert(key, record);
        Ok(())
    }

    /// Combine two partial aggregates built from disjoint rounds
    pub fn merge(mut self, other: RoundAggregator) -> Result<RoundAggregator> {
        for record in other.records.into_values() {
            self.insert(record)?;
        }
        Ok(self)
    }

    /// Totals over every scored round
    pub fn totals(&self) -> ScopedCounts {
        self.totals
    }

    /// Totals over the scored rounds of one story
    pub fn story_totals(&self, story: &StoryId) -> ScopedCounts {
        self.story_records(story).filter_map(RoundRecord::counts).sum()
    }

    /// Totals over every story's scored rounds with this round number
    pub fn round_totals(&self, round: u32) -> ScopedCounts {
        self.records
            .values()
            .filter(|r| r.round == round)
            .filter_map(RoundRecord::counts)
            .sum()
    }

    /// Every record, ordered by story then round
    pub fn records(&self) -> impl Iterator<Item = &RoundRecord> {
        self.records.values()
    }

    /// Records of one story, ordered by round
    pub fn story_records<'a>(&'a self, story: &'a StoryId) -> impl Iterator<Item = &'a RoundRecord> {
        self.records.values().filter(move |r| &r.story == story)
    }

    /// Look up one round
    pub fn record(&self, story: &StoryId, round: u32) -> Option<&RoundRecord> {
        self.records.get(&(story.clone(), round))
    }

    /// Stories with at least one record
    pub fn stories(&self) -> BTreeSet<&StoryId> {
        self.records.keys().map(|(story, _)| story).collect()
    }

    /// Round numbers with at least one scored record
    pub fn scored_round_numbers(&self) -> BTreeSet<u32> {
        self.records
            .values()
            .filter(|r| !r.is_failed())
            .map(|r| r.round)
            .collect()
    }

    /// Number of recorded rounds, failed ones included
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rounds excluded as failed
    pub fn failed_rounds(&self) -> usize {
        self.records.values().filter(|r| r.is_failed()).count()
    }

    /// Total skipped lines across all rounds
    pub fn skipped_lines(&self) -> usize {
        self.records.values().map(|r| r.skipped_lines).sum()
    }

    /// True once every round `1..=rounds` of every story has been recorded
    pub fn is_complete(&self, stories: &[StoryId], rounds: u32) -> bool {
        stories.iter().all(|story| {
            (1..=rounds).all(|round| self.records.contains_key(&(story.clone(), round)))
        })
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::matcher::MatchResult;
    use modelgrade_domain::NormalizedElement;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn round() -> impl Strategy<Value = (Vec<String>, BTreeSet<String>)> {
        (
            prop::collection::vec("[a-d]", 0..6),
            prop::collection::btree_set("[a-d]", 1..4),
        )
    }

    fn to_match(predicted: &[String], gold: &BTreeSet<String>) -> RoundMatch {
        let gold: BTreeSet<_> = gold.iter().cloned().map(NormalizedElement::Class).collect();
        let result = MatchResult::compute(
            predicted.iter().cloned().map(NormalizedElement::Class),
            &gold,
        );
        RoundMatch {
            all: result.clone(),
            mandatory: result,
            raw_forms: Default::default(),
        }
    }

    fn keyed(rounds: Vec<(Vec<String>, BTreeSet<String>)>) -> Vec<(StoryId, u32, RoundMatch)> {
        rounds
            .iter()
            .enumerate()
            .map(|(i, (p, g))| {
                (
                    StoryId::new(format!("story-{}", i % 3)),
                    i as u32 + 1,
                    to_match(p, g),
                )
            })
            .collect()
    }

    fn fold_all(items: &[(StoryId, u32, RoundMatch)]) -> RoundAggregator {
        let mut aggregator = RoundAggregator::new();
        for (story, round, matched) in items {
            aggregator.fold(story.clone(), *round, matched.clone(), 0).unwrap();
        }
        aggregator
    }

    proptest! {
        #[test]
        fn test_fold_order_independent(
            (items, shuffled) in prop::collection::vec(round(), 0..10)
                .prop_map(keyed)
                .prop_flat_map(|items| (Just(items.clone()), Just(items).prop_shuffle()))
        ) {
            let forward = fold_all(&items);
            let permuted = fold_all(&shuffled);
            prop_assert_eq!(forward.totals(), permuted.totals());
            prop_assert_eq!(forward, permuted);
        }

        #[test]
        fn test_merge_equals_sequential(
            items in prop::collection::vec(round(), 0..10).prop_map(keyed),
            split in 0usize..10,
        ) {
            let split = split.min(items.len());
            let sequential = fold_all(&items);
            let merged = fold_all(&items[..split]).merge(fold_all(&items[split..])).unwrap();
            prop_assert_eq!(sequential.totals(), merged.totals());
        }

        #[test]
        fn test_totals_only_grow(items in prop::collection::vec(round(), 1..10).prop_map(keyed)) {
            let mut aggregator = RoundAggregator::new();
            for (story, round, matched) in items {
                let before = aggregator.totals();
                aggregator.fold(story, round, matched, 0).unwrap();
                prop_assert!(aggregator.totals().all.dominates(&before.all));
                prop_assert!(aggregator.totals().mandatory.dominates(&before.mandatory));
            }
        }
    }
}
