//! Modelgrade Evaluator
//!
//! Scores parsed model transcripts against a gold standard across repeated
//! rounds.
//!
//! # Overview
//!
//! The evaluator is responsible for:
//! - **Matching**: exact comparison of normalized predictions against gold
//! - **Aggregation**: folding per-round results into order-independent totals
//! - **Failed rounds**: excluding transcripts without an answer region, visibly
//! - **Reporting**: false-positive lists, summary and per-round metric rows
//!
//! # Architecture
//!
//! ```text
//! Transcript → TranscriptParser → Normalizer → MatchResult → RoundAggregator → EvaluationReport
//!                                     ↑
//!                         GoldSet (normalized once per run)
//! ```
//!
//! # Usage
//!
//! ```
//! use modelgrade_domain::{Element, StoryId};
//! use modelgrade_evaluator::{Evaluation, EvaluationConfig, Scope};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let gold = vec![(
//!     StoryId::new("shop"),
//!     vec![Element::class("Customer"), Element::class("Order"), Element::class("Invoice")],
//! )];
//! let config = EvaluationConfig::default().with_rounds(2);
//! let mut run = Evaluation::new(config, gold)?;
//!
//! let shop = StoryId::new("shop");
//! run.evaluate_round(&shop, 1, "### Final Classes\n1. Customer\n2. Order\n")?;
//! run.evaluate_round(&shop, 2, "I am not sure.")?; // no answer region: failed round
//!
//! let report = run.finish();
//! let overall = report.overall().unwrap();
//! assert_eq!(overall.precision, 1.0);
//! assert_eq!(overall.recall, 0.667);
//! assert_eq!(report.failed_rounds(), 1);
//! assert!(report.summary_row("shop", Scope::Mandatory).is_some());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! An evaluation can be configured via TOML:
//!
//! ```toml
//! mode = "association"
//! rounds = 5
//! label_sensitive = false
//! endpoint_order = "unordered"
//! stories = ["shop", "library"]
//!
//! [synonyms]
//! client = "customer"
//!
//! [extractor]
//! profile = "qwen-14b"
//! separator = "-"
//! ```

#![warn(missing_docs)]

mod aggregator;
mod config;
mod error;
mod evaluation;
mod matcher;
mod report;

pub use aggregator::{RoundAggregator, RoundRecord, RoundStatus, ScopedCounts};
pub use config::EvaluationConfig;
pub use error::{EvaluationError, Result};
pub use evaluation::{Evaluation, RoundOutcome};
pub use matcher::{MatchResult, RoundMatch, Scope};
pub use report::{
    DiagnosticsRow, EvaluationReport, FalsePositiveFrequency, FalsePositiveRecord, MetricsRow,
    ReportBuilder, RoundRow, RoundStatistics, Stat, OVERALL,
};
