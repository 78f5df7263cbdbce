//! modelgrade CLI library.
//!
//! This library provides the core functionality for the modelgrade command-line
//! interface: argument parsing, configuration loading, gold standard and
//! transcript files, and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod gold;
pub mod output;
pub mod source;

pub use cli::{Cli, CliFormat, Command};
pub use error::{CliError, Result};
pub use output::Formatter;
pub use source::DirectorySource;
