//! Report records handed to the persistence layer
//!
//! The builder only reshapes what the aggregator already holds; it never
//! re-runs matching. Metric values in rows are rounded to three decimals.

use crate::aggregator::{RoundAggregator, RoundRecord};
use crate::matcher::Scope;
use modelgrade_domain::{round3, AggregateCounts, ExtractionMode, Metrics, RunId, StoryId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Story column value for rows that cover every story
pub const OVERALL: &str = "overall";

/// A predicted element absent from gold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FalsePositiveRecord {
    /// Story id
    pub story: String,
    /// 1-based round number
    pub round: u32,
    /// List line as the model wrote it
    pub raw: String,
    /// Normalized form used for matching
    pub normalized: String,
}

/// Counts and metrics for one story (or `overall`) in one scope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRow {
    /// Story id or [`OVERALL`]
    pub story: String,
    /// Matching scope
    pub scope: Scope,
    /// True positives
    pub true_positives: usize,
    /// False positives
    pub false_positives: usize,
    /// False negatives
    pub false_negatives: usize,
    /// Precision
    pub precision: f64,
    /// Recall
    pub recall: f64,
    /// F-0.5
    pub f_half: f64,
    /// F-1
    pub f_measure: f64,
    /// F-2
    pub f_two: f64,
}

impl MetricsRow {
    /// Build a row from counts
    pub fn from_counts(story: impl Into<String>, scope: Scope, counts: &AggregateCounts) -> Self {
        let metrics = Metrics::from_counts(counts);
        Self {
            story: story.into(),
            scope,
            true_positives: counts.true_positives,
            false_positives: counts.false_positives,
            false_negatives: counts.false_negatives,
            precision: round3(metrics.precision),
            recall: round3(metrics.recall),
            f_half: round3(metrics.f_beta(0.5)),
            f_measure: round3(metrics.f_measure),
            f_two: round3(metrics.f_beta(2.0)),
        }
    }
}

/// Metrics of a single scored round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRow {
    /// 1-based round number
    pub round: u32,
    /// Counts and metrics
    #[serde(flatten)]
    pub metrics: MetricsRow,
}

/// Mean and sample standard deviation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation; 0 with fewer than two values
    pub std_dev: f64,
}

impl Stat {
    /// Summarize a list of values
    pub fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std_dev = if values.len() < 2 {
            0.0
        } else {
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
            variance.sqrt()
        };
        Self {
            mean: round3(mean),
            std_dev: round3(std_dev),
        }
    }
}

/// Spread of per-round metrics for one story (or `overall`) and scope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundStatistics {
    /// Story id or [`OVERALL`]
    pub story: String,
    /// Matching scope
    pub scope: Scope,
    /// Number of scored rounds summarized
    pub rounds: usize,
    /// Precision across rounds
    pub precision: Stat,
    /// Recall across rounds
    pub recall: Stat,
    /// F-0.5 across rounds
    pub f_half: Stat,
    /// F-1 across rounds
    pub f_measure: Stat,
    /// F-2 across rounds
    pub f_two: Stat,
}

impl RoundStatistics {
    fn from_counts<'a, I>(story: impl Into<String>, scope: Scope, rounds: I) -> Self
    where
        I: IntoIterator<Item = &'a AggregateCounts>,
    {
        let metrics: Vec<Metrics> = rounds.into_iter().map(Metrics::from_counts).collect();
        Self {
            story: story.into(),
            scope,
            rounds: metrics.len(),
            precision: column(&metrics, |m| m.precision),
            recall: column(&metrics, |m| m.recall),
            f_half: column(&metrics, |m| m.f_beta(0.5)),
            f_measure: column(&metrics, |m| m.f_measure),
            f_two: column(&metrics, |m| m.f_beta(2.0)),
        }
    }
}

fn column(metrics: &[Metrics], value: impl Fn(&Metrics) -> f64) -> Stat {
    let values: Vec<f64> = metrics.iter().map(value).collect();
    Stat::of(&values)
}

/// How often a normalized false positive was predicted across rounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FalsePositiveFrequency {
    /// Normalized form
    pub normalized: String,
    /// Number of rounds it appeared in as a false positive
    pub count: usize,
}

/// Parse health of one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsRow {
    /// Story id
    pub story: String,
    /// 1-based round number
    pub round: u32,
    /// Lines the parser skipped
    pub skipped_lines: usize,
    /// True if the round was excluded from aggregation
    pub failed: bool,
    /// Failure reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Everything an evaluation run emits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Run identifier
    pub run_id: String,
    /// Extraction mode
    pub mode: String,
    /// Configured rounds per story
    pub rounds: u32,
    /// False positives of every scored round, by story then round
    pub false_positives: Vec<FalsePositiveRecord>,
    /// Per-story and overall rows for both scopes
    pub summary: Vec<MetricsRow>,
    /// Per-round rows for both scopes
    pub per_round: Vec<RoundRow>,
    /// Mean and spread of per-round metrics
    pub statistics: Vec<RoundStatistics>,
    /// False positives by frequency
    pub false_positive_frequency: Vec<FalsePositiveFrequency>,
    /// One row per recorded round
    pub diagnostics: Vec<DiagnosticsRow>,
}

impl EvaluationReport {
    /// Overall row in the primary scope
    pub fn overall(&self) -> Option<&MetricsRow> {
        self.summary_row(OVERALL, Scope::All)
    }

    /// Summary row for a story (or [`OVERALL`]) and scope
    pub fn summary_row(&self, story: &str, scope: Scope) -> Option<&MetricsRow> {
        self.summary
            .iter()
            .find(|row| row.story == story && row.scope == scope)
    }

    /// Number of rounds excluded from aggregation
    pub fn failed_rounds(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.failed).count()
    }

    /// Total skipped lines
    pub fn skipped_lines(&self) -> usize {
        self.diagnostics.iter().map(|d| d.skipped_lines).sum()
    }

    /// Serialize the report as pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Shapes an aggregator's contents into an [`EvaluationReport`]
pub struct ReportBuilder<'a> {
    run_id: RunId,
    mode: ExtractionMode,
    rounds: u32,
    aggregator: &'a RoundAggregator,
    stories: Vec<StoryId>,
}

impl<'a> ReportBuilder<'a> {
    /// Create a builder over an aggregator
    pub fn new(
        run_id: RunId,
        mode: ExtractionMode,
        rounds: u32,
        aggregator: &'a RoundAggregator,
    ) -> Self {
        Self {
            run_id,
            mode,
            rounds,
            aggregator,
            stories: aggregator.stories().into_iter().cloned().collect(),
        }
    }

    /// Report on these stories, including ones with no recorded rounds
    pub fn stories(mut self, stories: &[StoryId]) -> Self {
        self.stories = stories.to_vec();
        self.stories.sort();
        self.stories.dedup();
        self
    }

    /// Build the report
    pub fn build(&self) -> EvaluationReport {
        EvaluationReport {
            run_id: self.run_id.to_string(),
            mode: self.mode.to_string(),
            rounds: self.rounds,
            false_positives: self.false_positives(),
            summary: self.summary(),
            per_round: self.per_round(),
            statistics: self.statistics(),
            false_positive_frequency: self.false_positive_frequency(),
            diagnostics: self.diagnostics(),
        }
    }

    fn records(&self) -> impl Iterator<Item = &'a RoundRecord> + '_ {
        self.aggregator
            .records()
            .filter(move |r| self.stories.contains(&r.story))
    }

    fn false_positives(&self) -> Vec<FalsePositiveRecord> {
        let mut out = Vec::new();
        for record in self.records() {
            let Some(matched) = record.matched() else {
                continue;
            };
            for element in &matched.all.false_positives {
                out.push(FalsePositiveRecord {
                    story: record.story.to_string(),
                    round: record.round,
                    raw: matched.raw_form(element),
                    normalized: element.to_string(),
                });
            }
        }
        out
    }

    fn summary(&self) -> Vec<MetricsRow> {
        let mut rows = Vec::with_capacity((self.stories.len() + 1) * Scope::ALL.len());
        for scope in Scope::ALL {
            let mut overall = AggregateCounts::zero();
            for story in &self.stories {
                let counts = self.aggregator.story_totals(story).scope(scope);
                overall += counts;
                rows.push(MetricsRow::from_counts(story.as_str(), scope, &counts));
            }
            rows.push(MetricsRow::from_counts(OVERALL, scope, &overall));
        }
        rows
    }

    fn per_round(&self) -> Vec<RoundRow> {
        let mut rows = Vec::new();
        for scope in Scope::ALL {
            for record in self.records() {
                if let Some(counts) = record.counts() {
                    rows.push(RoundRow {
                        round: record.round,
                        metrics: MetricsRow::from_counts(
                            record.story.as_str(),
                            scope,
                            &counts.scope(scope),
                        ),
                    });
                }
            }
        }
        rows
    }

    fn statistics(&self) -> Vec<RoundStatistics> {
        let mut rows = Vec::new();
        for scope in Scope::ALL {
            for story in &self.stories {
                let counts: Vec<AggregateCounts> = self
                    .aggregator
                    .story_records(story)
                    .filter_map(RoundRecord::counts)
                    .map(|c| c.scope(scope))
                    .collect();
                rows.push(RoundStatistics::from_counts(story.as_str(), scope, &counts));
            }

            // Overall: each round number's counts summed across stories
            let mut by_round: BTreeMap<u32, AggregateCounts> = BTreeMap::new();
            for record in self.records() {
                if let Some(counts) = record.counts() {
                    *by_round.entry(record.round).or_default() += counts.scope(scope);
                }
            }
            rows.push(RoundStatistics::from_counts(OVERALL, scope, by_round.values()));
        }
        rows
    }

    fn false_positive_frequency(&self) -> Vec<FalsePositiveFrequency> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for record in self.records() {
            if let Some(matched) = record.matched() {
                for element in &matched.all.false_positives {
                    *counts.entry(element.to_string()).or_default() += 1;
                }
            }
        }
        let mut rows: Vec<FalsePositiveFrequency> = counts
            .into_iter()
            .map(|(normalized, count)| FalsePositiveFrequency { normalized, count })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.normalized.cmp(&b.normalized)));
        rows
    }

    fn diagnostics(&self) -> Vec<DiagnosticsRow> {
        self.records()
            .map(|record| DiagnosticsRow {
                story: record.story.to_string(),
                round: record.round,
                skipped_lines: record.skipped_lines,
                failed: record.is_failed(),
                reason: record.failure().map(str::to_string),
            })
            .collect()
    }
}
