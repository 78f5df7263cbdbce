//! Evaluate command implementation.

use crate::cli::EvaluateArgs;
use crate::config;
use crate::error::{CliError, Result};
use crate::gold;
use crate::output::Formatter;
use crate::source::DirectorySource;
use modelgrade_evaluator::{Evaluation, EvaluationConfig, EvaluationReport};
use std::fs;
use tracing::info;

/// Run an evaluation over a transcript directory and return its report.
pub fn run_evaluation(args: &EvaluateArgs, mut settings: EvaluationConfig) -> Result<EvaluationReport> {
    config::apply_evaluate_args(&mut settings, args)?;
    let entries = gold::load(&args.gold, settings.mode, &settings.extractor.separator)?;

    let mut run = Evaluation::new(settings, entries)?;
    if !args.transcripts.is_dir() {
        return Err(CliError::InvalidInput(format!(
            "transcript directory {} does not exist",
            args.transcripts.display()
        )));
    }
    let source = DirectorySource::new(&args.transcripts);
    info!(
        "Reading transcripts for {} stories from {}",
        run.stories().len(),
        source.root().display()
    );
    run.run_all(&source)?;
    Ok(run.finish())
}

/// Execute the evaluate command.
pub fn execute_evaluate(
    args: EvaluateArgs,
    settings: EvaluationConfig,
    formatter: &Formatter,
) -> Result<()> {
    let report = run_evaluation(&args, settings)?;

    if let Some(out) = &args.out {
        fs::write(out, report.to_json()?)?;
        eprintln!("{}", formatter.info(&format!("Report written to {}", out.display())));
    }
    println!("{}", formatter.format_report(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ParserArgs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    fn args(dir: &Path) -> EvaluateArgs {
        EvaluateArgs {
            gold: dir.join("gold.toml"),
            transcripts: dir.join("runs"),
            stories: Vec::new(),
            rounds: Some(2),
            label_sensitive: false,
            ordered: false,
            parser: ParserArgs::default(),
            out: None,
        }
    }

    #[test]
    fn test_evaluate_directory() {
        let dir = TempDir::new().unwrap();
        write(
            &dir.path().join("gold.toml"),
            "[stories.shop]\nclasses = [\"Customer\", \"Order\", \"Invoice\"]\n",
        );
        write(
            &dir.path().join("runs/shop/R1.txt"),
            "### Final Classes\n1. Customer\n2. Order\n",
        );
        // R2.txt is missing: the round fails instead of aborting the run

        let report = run_evaluation(&args(dir.path()), EvaluationConfig::default()).unwrap();
        let overall = report.overall().unwrap();
        assert_eq!(overall.precision, 1.0);
        assert_eq!(overall.recall, 0.667);
        assert_eq!(report.failed_rounds(), 1);
        let failed = report.diagnostics.iter().find(|d| d.failed).unwrap();
        assert!(failed.reason.as_deref().unwrap().contains("transcript unavailable"));
    }

    #[test]
    fn test_evaluate_writes_json_report() {
        let dir = TempDir::new().unwrap();
        write(
            &dir.path().join("gold.toml"),
            "[stories.fleet]\nassociations = [[\"Driver\", \"Vehicle\", \"drives\"]]\n",
        );
        write(
            &dir.path().join("runs/fleet/R1.txt"),
            "## Final Associations\n1. (Vehicle, Driver, drives)\n",
        );

        let mut args = args(dir.path());
        args.rounds = None;
        args.parser.mode = Some("association".to_string());
        let out = dir.path().join("report.json");
        args.out = Some(out.clone());

        execute_evaluate(args, EvaluationConfig::default(), &Formatter::new(crate::cli::CliFormat::Json, false))
            .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written["mode"], "association");
        assert_eq!(written["summary"][0]["true_positives"], 1);
    }

    #[test]
    fn test_unknown_story_fails_before_scoring() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join("gold.toml"), "[stories.shop]\nclasses = [\"Customer\"]\n");
        let mut args = args(dir.path());
        args.stories = vec!["garage".to_string()];
        assert!(matches!(
            run_evaluation(&args, EvaluationConfig::default()),
            Err(CliError::Evaluation(_))
        ));
    }

    #[test]
    fn test_missing_transcript_directory() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join("gold.toml"), "[stories.shop]\nclasses = [\"Customer\"]\n");
        assert!(matches!(
            run_evaluation(&args(dir.path()), EvaluationConfig::default()),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_missing_gold_file() {
        let dir = TempDir::new().unwrap();
        let mut args = args(dir.path());
        args.gold = PathBuf::from("/definitely/not/gold.toml");
        assert!(matches!(
            run_evaluation(&args, EvaluationConfig::default()),
            Err(CliError::Io(_))
        ));
    }
}
