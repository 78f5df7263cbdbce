//! Running match totals

use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// True-positive, false-positive and false-negative totals
///
/// Addition is componentwise, so it is commutative and associative: partial
/// totals from independent stories can be combined in any order and yield
/// the same result as sequential folding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AggregateCounts {
    /// Predicted elements found in gold
    pub true_positives: usize,

    /// Predicted elements absent from gold
    pub false_positives: usize,

    /// Gold elements never predicted
    pub false_negatives: usize,
}

impl AggregateCounts {
    /// Create counts from explicit values
    pub fn new(true_positives: usize, false_positives: usize, false_negatives: usize) -> Self {
        Self {
            true_positives,
            false_positives,
            false_negatives,
        }
    }

    /// The all-zero starting state
    pub fn zero() -> Self {
        Self::default()
    }

    /// Combine two partial totals
    pub fn merge(&self, other: &AggregateCounts) -> AggregateCounts {
        AggregateCounts {
            true_positives: self.true_positives + other.true_positives,
            false_positives: self.false_positives + other.false_positives,
            false_negatives: self.false_negatives + other.false_negatives,
        }
    }

    /// Number of distinct predictions counted (`tp + fp`)
    pub fn predicted(&self) -> usize {
        self.true_positives + self.false_positives
    }

    /// Number of gold elements counted (`tp + fn`)
    pub fn expected(&self) -> usize {
        self.true_positives + self.false_negatives
    }

    /// True if every component is greater than or equal to `other`'s
    pub fn dominates(&self, other: &AggregateCounts) -> bool {
        self.true_positives >= other.true_positives
            && self.false_positives >= other.false_positives
            && self.false_negatives >= other.false_negatives
    }

    /// True for the starting state
    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

impl Add for AggregateCounts {
    type Output = AggregateCounts;

    fn add(self, rhs: AggregateCounts) -> AggregateCounts {
        self.merge(&rhs)
    }
}

impl AddAssign for AggregateCounts {
    fn add_assign(&mut self, rhs: AggregateCounts) {
        *self = self.merge(&rhs);
    }
}

impl Sum for AggregateCounts {
    fn sum<I: Iterator<Item = AggregateCounts>>(iter: I) -> Self {
        iter.fold(AggregateCounts::zero(), Add::add)
    }
}

impl<'a> Sum<&'a AggregateCounts> for AggregateCounts {
    fn sum<I: Iterator<Item = &'a AggregateCounts>>(iter: I) -> Self {
        iter.fold(AggregateCounts::zero(), |acc, c| acc.merge(c))
    }
}
