//! modelgrade CLI - Score model-extracted domain models against a gold standard.

use clap::Parser;
use modelgrade_cli::commands;
use modelgrade_cli::{config, Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so report output on stdout stays clean. `RUST_LOG` wins
/// over `-v` when set.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli) -> modelgrade_cli::Result<()> {
    let settings = config::load(cli.config.as_deref())?;
    let formatter = Formatter::new(cli.format, !cli.no_color);

    match cli.command {
        Command::Evaluate(args) => commands::execute_evaluate(args, settings, &formatter),
        Command::Parse(args) => commands::execute_parse(args, settings, &formatter),
    }
}
