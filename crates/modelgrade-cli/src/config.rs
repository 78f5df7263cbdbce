//! Configuration management for the CLI.
//!
//! The evaluation settings come from an optional TOML file; command-line
//! flags override individual fields on top of it.

use crate::cli::{EvaluateArgs, ParserArgs};
use crate::error::{CliError, Result};
use modelgrade_domain::EndpointOrder;
use modelgrade_evaluator::EvaluationConfig;
use modelgrade_extractor::TranscriptProfile;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load an evaluation configuration, or the default when no file is given.
pub fn load(path: Option<&Path>) -> Result<EvaluationConfig> {
    match path {
        Some(path) => {
            let contents = fs::read_to_string(path)?;
            let config = EvaluationConfig::from_toml(&contents)?;
            debug!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        None => Ok(EvaluationConfig::default()),
    }
}

/// Apply the parser flags to a configuration.
///
/// Choosing a profile resets the anchors to the profile's built-ins but keeps
/// the separator and marker settings already in place.
pub fn apply_parser_args(config: &mut EvaluationConfig, args: &ParserArgs) -> Result<()> {
    if let Some(mode) = &args.mode {
        config.mode = EvaluationConfig::parse_mode(mode)?;
    }
    if let Some(profile) = &args.profile {
        let builtin = TranscriptProfile::named(profile, config.mode)?;
        config.extractor.profile = builtin.name;
        config.extractor.anchors.clear();
    }
    if let Some(separator) = &args.separator {
        config.extractor.separator = separator.clone();
    }
    Ok(())
}

/// Apply every evaluate flag to a configuration and validate the result.
pub fn apply_evaluate_args(config: &mut EvaluationConfig, args: &EvaluateArgs) -> Result<()> {
    apply_parser_args(config, &args.parser)?;
    if !args.stories.is_empty() {
        config.stories = args.stories.iter().map(|s| s.trim().to_string()).collect();
    }
    if let Some(rounds) = args.rounds {
        config.rounds = rounds;
    }
    if args.label_sensitive {
        config.label_sensitive = true;
    }
    if args.ordered {
        config.endpoint_order = EndpointOrder::Ordered;
    }
    config.validate()?;
    Ok(())
}
