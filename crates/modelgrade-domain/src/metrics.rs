//! Precision, recall and F-measure

use crate::counts::AggregateCounts;

/// Quality snapshot derived from a set of counts
///
/// Computed fresh from [`AggregateCounts`] and never mutated. Every value is
/// in `[0, 1]`; zero denominators yield `0.0` instead of a division error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// `tp / (tp + fp)`, or 0 when nothing was predicted
    pub precision: f64,

    /// `tp / (tp + fn)`, or 0 when there is no gold element
    pub recall: f64,

    /// Harmonic mean of precision and recall, or 0 when both are 0
    pub f_measure: f64,
}

impl Metrics {
    /// Compute metrics from counts
    ///
    /// # Examples
    ///
    /// ```
    /// use modelgrade_domain::{AggregateCounts, Metrics};
    ///
    /// let m = Metrics::from_counts(&AggregateCounts::new(1, 1, 0));
    /// assert_eq!(m.precision, 0.5);
    /// assert_eq!(m.recall, 1.0);
    ///
    /// let empty = Metrics::from_counts(&AggregateCounts::zero());
    /// assert_eq!(empty.f_measure, 0.0);
    /// ```
    pub fn from_counts(counts: &AggregateCounts) -> Self {
        let precision = ratio(counts.true_positives, counts.predicted());
        let recall = ratio(counts.true_positives, counts.expected());
        Self {
            precision,
            recall,
            f_measure: f_beta(precision, recall, 1.0),
        }
    }

    /// Weighted F-measure; `beta > 1` favours recall, `beta < 1` precision
    pub fn f_beta(&self, beta: f64) -> f64 {
        f_beta(self.precision, self.recall, beta)
    }
}

impl From<&AggregateCounts> for Metrics {
    fn from(counts: &AggregateCounts) -> Self {
        Self::from_counts(counts)
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f_beta(precision: f64, recall: f64, beta: f64) -> f64 {
    let beta_sq = beta * beta;
    let denominator = beta_sq * precision + recall;
    if precision + recall == 0.0 || denominator == 0.0 {
        return 0.0;
    }
    ((1.0 + beta_sq) * precision * recall / denominator).clamp(0.0, 1.0)
}

/// Round to three decimal places, the precision used in reports
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_zero_counts() {
        let m = Metrics::from_counts(&AggregateCounts::zero());
        assert_eq!(m.precision, 0.0);
        assert_eq!(m.recall, 0.0);
        assert_eq!(m.f_measure, 0.0);
        assert_eq!(m.f_beta(2.0), 0.0);
    }

    #[test]
    fn test_perfect_precision_partial_recall() {
        let m = Metrics::from_counts(&AggregateCounts::new(2, 0, 1));
        assert!(approx(m.precision, 1.0));
        assert!(approx(m.recall, 2.0 / 3.0));
        assert!(approx(m.f_measure, 0.8));
        assert_eq!(round3(m.recall), 0.667);
    }

    #[test]
    fn test_no_predictions_with_gold() {
        let m = Metrics::from_counts(&AggregateCounts::new(0, 0, 4));
        assert_eq!(m.precision, 0.0);
        assert_eq!(m.recall, 0.0);
        assert_eq!(m.f_measure, 0.0);
    }

    #[test]
    fn test_f_beta_weights() {
        let m = Metrics::from_counts(&AggregateCounts::new(1, 3, 0));
        // precision 0.25, recall 1.0
        assert!(m.f_beta(2.0) > m.f_measure);
        assert!(m.f_beta(0.5) < m.f_measure);
        assert!(approx(m.f_beta(1.0), m.f_measure));
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.66666), 0.667);
        assert_eq!(round3(0.8), 0.8);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: all metrics stay within [0, 1]
        #[test]
        fn test_metrics_bounded(tp in 0usize..500, fp in 0usize..500, fn_ in 0usize..500, beta in 0.1f64..4.0) {
            let m = Metrics::from_counts(&AggregateCounts::new(tp, fp, fn_));
            for value in [m.precision, m.recall, m.f_measure, m.f_beta(beta)] {
                prop_assert!((0.0..=1.0).contains(&value), "{} out of range", value);
            }
        }

        /// Property: F1 lies between precision and recall
        #[test]
        fn test_f1_between(tp in 1usize..500, fp in 0usize..500, fn_ in 0usize..500) {
            let m = Metrics::from_counts(&AggregateCounts::new(tp, fp, fn_));
            let lo = m.precision.min(m.recall) - 1e-12;
            let hi = m.precision.max(m.recall) + 1e-12;
            prop_assert!(m.f_measure >= lo && m.f_measure <= hi);
        }
    }
}
