//! The evaluation run object
//!
//! An [`Evaluation`] owns everything one run needs: the gold set, the
//! normalizer it was built with, the transcript parser and the aggregator.
//! Nothing is process-global, so independent runs can coexist.

use crate::aggregator::{RoundAggregator, ScopedCounts};
use crate::config::EvaluationConfig;
use crate::error::{EvaluationError, Result};
use crate::matcher::RoundMatch;
use crate::report::{EvaluationReport, ReportBuilder};
use modelgrade_domain::{Element, GoldSet, Normalizer, RunId, StoryId, TranscriptSource};
use modelgrade_extractor::{ExtractorError, ParsedTranscript, TranscriptParser};
use std::fmt;
use tracing::{info, warn};

/// Result of evaluating one round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// The round was parsed, matched and folded
    Scored {
        /// This round's counts
        counts: ScopedCounts,
        /// Lines the parser skipped
        skipped_lines: usize,
    },

    /// The round was excluded from aggregation
    Failed {
        /// Why the round could not be scored
        reason: String,
    },
}

impl RoundOutcome {
    /// True if the round was excluded
    pub fn is_failed(&self) -> bool {
        matches!(self, RoundOutcome::Failed { .. })
    }
}

/// One evaluation run
///
/// # Examples
///
/// ```
/// use modelgrade_domain::{Element, StoryId};
/// use modelgrade_evaluator::{Evaluation, EvaluationConfig};
///
/// let gold = vec![(StoryId::new("shop"), vec![Element::class("Customer"), Element::class("Order")])];
/// let mut run = Evaluation::new(EvaluationConfig::default(), gold).unwrap();
///
/// let outcome = run
///     .evaluate_round(&StoryId::new("shop"), 1, "Final classes:\n1. Customers\n2. Bogus\n")
///     .unwrap();
/// assert!(!outcome.is_failed());
///
/// let report = run.finish();
/// assert_eq!(report.overall().unwrap().true_positives, 1);
/// ```
#[derive(Debug)]
pub struct Evaluation {
    id: RunId,
    config: EvaluationConfig,
    normalizer: Normalizer,
    gold: GoldSet,
    stories: Vec<StoryId>,
    parser: TranscriptParser,
    aggregator: RoundAggregator,
}

impl Evaluation {
    /// Validate the configuration and gold standard and start a run
    ///
    /// Gold elements are normalized here with the run's normalizer. Fails
    /// before any transcript is seen if the configuration is invalid, a gold
    /// story is empty, or a configured story has no gold.
    pub fn new<I, E>(config: EvaluationConfig, gold: I) -> Result<Self>
    where
        I: IntoIterator<Item = (StoryId, E)>,
        E: IntoIterator<Item = Element>,
    {
        config.validate()?;
        let normalizer = config.normalizer()?;
        let gold = GoldSet::new(config.mode, &normalizer, gold)?;

        let stories = if config.stories.is_empty() {
            gold.stories().cloned().collect()
        } else {
            config.story_ids()
        };
        if stories.is_empty() {
            return Err(EvaluationError::InvalidConfig(
                "no stories to evaluate".to_string(),
            ));
        }
        if let Some(missing) = stories.iter().find(|s| !gold.contains_story(s)) {
            return Err(EvaluationError::MissingGold(missing.clone()));
        }

        let parser = TranscriptParser::new(config.extractor_config())?;
        let id = RunId::new();
        info!(
            "Evaluation {} started: mode {}, {} stories, {} rounds, profile '{}'",
            id,
            config.mode,
            stories.len(),
            config.rounds,
            parser.profile_name()
        );

        Ok(Self {
            id,
            config,
            normalizer,
            gold,
            stories,
            parser,
            aggregator: RoundAggregator::new(),
        })
    }

    /// Run identifier
    pub fn id(&self) -> RunId {
        self.id
    }

    /// Run configuration
    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Normalized gold standard
    pub fn gold(&self) -> &GoldSet {
        &self.gold
    }

    /// Stories this run covers
    pub fn stories(&self) -> &[StoryId] {
        &self.stories
    }

    /// Aggregated state so far
    pub fn aggregator(&self) -> &RoundAggregator {
        &self.aggregator
    }

    /// True once every configured round of every story is recorded
    pub fn is_complete(&self) -> bool {
        self.aggregator.is_complete(&self.stories, self.config.rounds)
    }

    fn check_round(&self, story: &StoryId, round: u32) -> Result<()> {
        if !self.stories.contains(story) {
            return Err(EvaluationError::UnknownStory(story.clone()));
        }
        if round == 0 || round > self.config.rounds {
            return Err(EvaluationError::RoundOutOfRange {
                round,
                rounds: self.config.rounds,
            });
        }
        Ok(())
    }

    /// Parse, match and fold one transcript
    ///
    /// A transcript whose answer region cannot be located becomes a failed
    /// round; the totals are left untouched.
    pub fn evaluate_round(
        &mut self,
        story: &StoryId,
        round: u32,
        transcript: &str,
    ) -> Result<RoundOutcome> {
        self.check_round(story, round)?;
        match self.parser.parse(transcript) {
            Ok(parsed) => self.evaluate_parsed(story, round, &parsed),
            Err(err @ (ExtractorError::MalformedOutput(_) | ExtractorError::TranscriptTooLong(..))) => {
                self.record_failure(story, round, err.to_string())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Match and fold an already parsed transcript
    pub fn evaluate_parsed(
        &mut self,
        story: &StoryId,
        round: u32,
        parsed: &ParsedTranscript,
    ) -> Result<RoundOutcome> {
        self.check_round(story, round)?;
        if parsed.mode != self.config.mode {
            return Err(EvaluationError::InvalidMode(format!(
                "transcript parsed as {} in a {} evaluation",
                parsed.mode, self.config.mode
            )));
        }
        let gold = self
            .gold
            .elements(story)
            .ok_or_else(|| EvaluationError::MissingGold(story.clone()))?;

        let matched = RoundMatch::compute(&self.normalizer, &parsed.predictions, gold);
        let skipped_lines = parsed.skipped_count();
        let counts = self
            .aggregator
            .fold(story.clone(), round, matched, skipped_lines)?;

        info!(
            "Story '{}' round {}: tp={} fp={} fn={} ({} skipped lines)",
            story,
            round,
            counts.all.true_positives,
            counts.all.false_positives,
            counts.all.false_negatives,
            skipped_lines
        );
        Ok(RoundOutcome::Scored {
            counts,
            skipped_lines,
        })
    }

    /// Record a round that produced no usable transcript
    pub fn record_failure(
        &mut self,
        story: &StoryId,
        round: u32,
        reason: impl Into<String>,
    ) -> Result<RoundOutcome> {
        self.check_round(story, round)?;
        let reason = reason.into();
        warn!("Story '{}' round {} excluded: {}", story, round, reason);
        self.aggregator
            .record_failure(story.clone(), round, reason.clone(), 0)?;
        Ok(RoundOutcome::Failed { reason })
    }

    /// Evaluate every configured round of every story from a source
    ///
    /// Rounds already recorded are left alone. A transcript the source cannot
    /// supply becomes a failed round.
    pub fn run_all<S>(&mut self, source: &S) -> Result<()>
    where
        S: TranscriptSource,
        S::Error: fmt::Display,
    {
        let stories = self.stories.clone();
        for story in &stories {
            for round in 1..=self.config.rounds {
                if self.aggregator.record(story, round).is_some() {
                    continue;
                }
                match source.transcript(story, round) {
                    Ok(transcript) => {
                        self.evaluate_round(story, round, &transcript)?;
                    }
                    Err(e) => {
                        self.record_failure(story, round, format!("transcript unavailable: {}", e))?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Build the report for the rounds recorded so far
    pub fn report(&self) -> EvaluationReport {
        ReportBuilder::new(self.id, self.config.mode, self.config.rounds, &self.aggregator)
            .stories(&self.stories)
            .build()
    }

    /// Finish the run and build its report
    pub fn finish(self) -> EvaluationReport {
        let report = self.report();
        info!(
            "Evaluation {} finished: {} rounds recorded, {} failed",
            self.id,
            self.aggregator.len(),
            self.aggregator.failed_rounds()
        );
        report
    }
}
