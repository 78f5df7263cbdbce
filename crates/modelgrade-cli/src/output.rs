//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use colored::*;
use modelgrade_evaluator::{EvaluationReport, MetricsRow, Stat};
use modelgrade_extractor::ParsedTranscript;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const METRIC_HEADERS: [&str; 10] = [
    "Story", "Scope", "TP", "FP", "FN", "Precision", "Recall", "F0.5", "F1", "F2",
];

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format an evaluation report.
    pub fn format_report(&self, report: &EvaluationReport) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(report.to_json()?),
            CliFormat::Table => Ok(self.format_report_tables(report)),
        }
    }

    /// Format the result of parsing one transcript.
    pub fn format_parsed(&self, parsed: &ParsedTranscript) -> Result<String> {
        match self.format {
            CliFormat::Json => self.format_parsed_json(parsed),
            CliFormat::Table => Ok(self.format_parsed_table(parsed)),
        }
    }

    fn format_report_tables(&self, report: &EvaluationReport) -> String {
        let mut sections = vec![self.heading(&format!(
            "Run {} ({} mode, {} round(s))",
            report.run_id, report.mode, report.rounds
        ))];

        sections.push(self.heading("Summary"));
        sections.push(metrics_table(report.summary.iter()));

        if report.rounds > 1 {
            sections.push(self.heading("Per round"));
            let mut builder = Builder::default();
            let mut header = vec!["Round"];
            header.extend(METRIC_HEADERS);
            builder.push_record(header);
            for row in &report.per_round {
                let mut record = vec![row.round.to_string()];
                record.extend(metric_cells(&row.metrics));
                builder.push_record(record);
            }
            sections.push(styled(builder));

            sections.push(self.heading("Across rounds (mean ± sd)"));
            let mut builder = Builder::default();
            builder.push_record(["Story", "Scope", "Rounds", "Precision", "Recall", "F0.5", "F1", "F2"]);
            for stats in &report.statistics {
                builder.push_record([
                    stats.story.clone(),
                    stats.scope.to_string(),
                    stats.rounds.to_string(),
                    stat_cell(&stats.precision),
                    stat_cell(&stats.recall),
                    stat_cell(&stats.f_half),
                    stat_cell(&stats.f_measure),
                    stat_cell(&stats.f_two),
                ]);
            }
            sections.push(styled(builder));
        }

        if report.false_positive_frequency.is_empty() {
            sections.push(self.success("No false positives"));
        } else {
            sections.push(self.heading("False positives"));
            let mut builder = Builder::default();
            builder.push_record(["Element", "Count"]);
            for fp in &report.false_positive_frequency {
                builder.push_record([fp.normalized.clone(), fp.count.to_string()]);
            }
            sections.push(styled(builder));
        }

        let problems: Vec<_> = report
            .diagnostics
            .iter()
            .filter(|d| d.failed || d.skipped_lines > 0)
            .collect();
        if !problems.is_empty() {
            sections.push(self.heading("Diagnostics"));
            let mut builder = Builder::default();
            builder.push_record(["Story", "Round", "Skipped lines", "Status"]);
            for row in problems {
                let status = match &row.reason {
                    Some(reason) if row.failed => format!("failed: {}", reason),
                    _ if row.failed => "failed".to_string(),
                    _ => "scored".to_string(),
                };
                builder.push_record([
                    row.story.clone(),
                    row.round.to_string(),
                    row.skipped_lines.to_string(),
                    status,
                ]);
            }
            sections.push(styled(builder));
        }

        let failed = report.failed_rounds();
        if failed > 0 {
            sections.push(self.warning(&format!(
                "{} round(s) excluded from the totals",
                failed
            )));
        }

        sections.join("\n\n")
    }

    fn format_parsed_json(&self, parsed: &ParsedTranscript) -> Result<String> {
        let predictions: Vec<serde_json::Value> = parsed
            .predictions
            .iter()
            .map(|p| {
                serde_json::json!({
                    "element": p.element.to_string(),
                    "raw": p.raw,
                    "optional": p.optional,
                })
            })
            .collect();
        let skipped: Vec<serde_json::Value> = parsed
            .skipped
            .iter()
            .map(|s| {
                serde_json::json!({
                    "line": s.line_number,
                    "text": s.text,
                    "reason": s.reason,
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&serde_json::json!({
            "mode": parsed.mode.as_str(),
            "predictions": predictions,
            "skipped": skipped,
        }))?)
    }

    fn format_parsed_table(&self, parsed: &ParsedTranscript) -> String {
        let mut sections = Vec::new();

        if parsed.predictions.is_empty() {
            sections.push(self.colorize("No elements found.", "yellow"));
        } else {
            let mut builder = Builder::default();
            builder.push_record(["#", "Element", "Optional", "Raw"]);
            for (i, p) in parsed.predictions.iter().enumerate() {
                builder.push_record([
                    (i + 1).to_string(),
                    p.element.to_string(),
                    if p.optional { "yes" } else { "" }.to_string(),
                    p.raw.clone(),
                ]);
            }
            sections.push(styled(builder));
        }

        if !parsed.skipped.is_empty() {
            sections.push(self.warning(&format!("{} line(s) skipped", parsed.skipped_count())));
            let mut builder = Builder::default();
            builder.push_record(["Line", "Text", "Reason"]);
            for s in &parsed.skipped {
                builder.push_record([s.line_number.to_string(), s.text.clone(), s.reason.clone()]);
            }
            sections.push(styled(builder));
        }

        sections.join("\n\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn heading(&self, text: &str) -> String {
        if self.color_enabled {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn metrics_table<'a>(rows: impl Iterator<Item = &'a MetricsRow>) -> String {
    let mut builder = Builder::default();
    builder.push_record(METRIC_HEADERS);
    for row in rows {
        builder.push_record(metric_cells(row));
    }
    styled(builder)
}

fn metric_cells(row: &MetricsRow) -> Vec<String> {
    vec![
        row.story.clone(),
        row.scope.to_string(),
        row.true_positives.to_string(),
        row.false_positives.to_string(),
        row.false_negatives.to_string(),
        format!("{:.3}", row.precision),
        format!("{:.3}", row.recall),
        format!("{:.3}", row.f_half),
        format!("{:.3}", row.f_measure),
        format!("{:.3}", row.f_two),
    ]
}

fn stat_cell(stat: &Stat) -> String {
    format!("{:.3} ± {:.3}", stat.mean, stat.std_dev)
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}
