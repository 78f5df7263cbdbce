//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// modelgrade - Score model-extracted domain models against a gold standard.
#[derive(Debug, Parser)]
#[command(name = "modelgrade")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Evaluation configuration file (TOML)
    #[arg(short, long, global = true, env = "MODELGRADE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score every round of every story against the gold standard
    Evaluate(EvaluateArgs),

    /// Parse a single transcript and show what was extracted
    Parse(ParseArgs),
}

/// Arguments shared by commands that build a transcript parser.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ParserArgs {
    /// Extraction mode (class or association)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Transcript profile (generic, gpt-o1, llama3-8b, qwen-14b)
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Separator between association endpoints
    #[arg(long)]
    pub separator: Option<String>,
}

/// Arguments for the evaluate command.
#[derive(Debug, Parser)]
pub struct EvaluateArgs {
    /// Gold standard file (TOML)
    #[arg(short, long)]
    pub gold: PathBuf,

    /// Directory holding `<story>/R<n>.txt` transcripts
    #[arg(short, long)]
    pub transcripts: PathBuf,

    /// Stories to evaluate (comma-separated; defaults to every gold story)
    #[arg(short, long, value_delimiter = ',')]
    pub stories: Vec<String>,

    /// Number of rounds per story
    #[arg(short, long)]
    pub rounds: Option<u32>,

    /// Compare association labels
    #[arg(long)]
    pub label_sensitive: bool,

    /// Treat association endpoints as ordered
    #[arg(long)]
    pub ordered: bool,

    #[command(flatten)]
    pub parser: ParserArgs,

    /// Write the JSON report to this file
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Arguments for the parse command.
#[derive(Debug, Parser)]
pub struct ParseArgs {
    /// Transcript file
    pub file: PathBuf,

    #[command(flatten)]
    pub parser: ParserArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_evaluate_command() {
        let cli = Cli::try_parse_from([
            "modelgrade",
            "evaluate",
            "--gold",
            "gold.toml",
            "--transcripts",
            "runs",
            "--stories",
            "shop,library",
            "--rounds",
            "3",
            "--mode",
            "association",
            "--ordered",
        ])
        .unwrap();

        match cli.command {
            Command::Evaluate(args) => {
                assert_eq!(args.gold, PathBuf::from("gold.toml"));
                assert_eq!(args.stories, vec!["shop", "library"]);
                assert_eq!(args.rounds, Some(3));
                assert_eq!(args.parser.mode.as_deref(), Some("association"));
                assert!(args.ordered);
                assert!(!args.label_sensitive);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.format, CliFormat::Table);
    }

    #[test]
    fn test_parse_command_with_global_flags() {
        let cli = Cli::try_parse_from([
            "modelgrade",
            "parse",
            "R1.txt",
            "--profile",
            "qwen-14b",
            "--format",
            "json",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.format, CliFormat::Json);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Parse(args) => {
                assert_eq!(args.file, PathBuf::from("R1.txt"));
                assert_eq!(args.parser.profile.as_deref(), Some("qwen-14b"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_evaluate_requires_gold() {
        assert!(Cli::try_parse_from(["modelgrade", "evaluate", "--transcripts", "runs"]).is_err());
    }
}
