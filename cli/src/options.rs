//! Command-line options
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use pennant_core::{InputError, InputFormat};

/// Decide whether the first team in FILE can still finish first.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "pennant", version)]
pub struct CliOptions {
    /// File containing the standings
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// Evaluate every team in turn
    #[arg(long)]
    pub all: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Input format: text or json (default: by extension)
    #[arg(long, value_name = "FORMAT", value_parser = parse_format)]
    pub format: Option<InputFormat>,

    /// JSON evaluation configuration
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CliOptions {
    /// Default log filter for the requested verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn parse_format(value: &str) -> Result<InputFormat, String> {
    value.parse().map_err(|e: InputError| e.to_string())
}
