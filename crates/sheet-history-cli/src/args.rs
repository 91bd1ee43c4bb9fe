//! Command-line argument definitions for the sheet history CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments name the starting fragment, the operations to
//! apply, configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the sheet history tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// URL fragment to start from, with or without the leading `#`
    #[arg(help = "URL fragment to start from")]
    pub fragment: String,

    /// Operations applied in order, e.g. `-o select=cell:B2 -o menu`
    #[arg(short = 'o', long = "op", value_name = "OP")]
    pub operations: Vec<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
