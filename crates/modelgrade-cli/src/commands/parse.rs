//! Parse command implementation.

use crate::cli::ParseArgs;
use crate::config;
use crate::error::Result;
use crate::output::Formatter;
use modelgrade_evaluator::EvaluationConfig;
use modelgrade_extractor::TranscriptParser;
use std::fs;

/// Execute the parse command.
pub fn execute_parse(
    args: ParseArgs,
    mut settings: EvaluationConfig,
    formatter: &Formatter,
) -> Result<()> {
    config::apply_parser_args(&mut settings, &args.parser)?;
    let parser = TranscriptParser::new(settings.extractor_config())?;

    let transcript = fs::read_to_string(&args.file)?;
    let parsed = parser.parse(&transcript)?;

    println!("{}", formatter.format_parsed(&parsed)?);
    Ok(())
}
