//! Pennant command-line driver
//!
//! Reads a standings file, decides whether the first team (or every team
//! with `--all`) is eliminated, and prints the diagnostics followed by a
//! YES/NO verdict, or a JSON report with `--json`.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

mod options;
mod render;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::debug;

use pennant_core::{
    evaluate_all, evaluate_team, read_standings, ConfigError, EliminationError, EvaluationConfig,
    InputError,
};

use crate::options::CliOptions;

/// Failures reported to the user
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Elimination(#[from] EliminationError),

    #[error("Cannot encode report: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Cannot write output: {0}")]
    Output(#[from] io::Error),
}

impl CliError {
    /// 1 for I/O failures, 2 for rejected input (as clap uses for bad arguments)
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Input(InputError::Io { .. })
            | CliError::Config(ConfigError::Io { .. })
            | CliError::Output(_) => 1,
            _ => 2,
        }
    }
}

fn run(options: &CliOptions) -> Result<(), CliError> {
    let config = match &options.config {
        Some(path) => EvaluationConfig::from_json_file(path)?,
        None => EvaluationConfig::default(),
    };
    debug!("configuration: {:?}", config);

    let standings = read_standings(&options.path, options.format)?;

    let reports = if options.all {
        evaluate_all(&standings, &config)?
    } else {
        vec![evaluate_team(&standings, 0, &config)?]
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if options.json {
        if options.all {
            serde_json::to_writer_pretty(&mut out, &reports)?;
        } else {
            serde_json::to_writer_pretty(&mut out, &reports[0])?;
        }
        writeln!(out)?;
    } else {
        render::standings(&mut out, &standings)?;
        for report in &reports {
            render::report(&mut out, report)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let options = CliOptions::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(options.log_level())).init();

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pennant: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
