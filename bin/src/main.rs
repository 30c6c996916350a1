use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;

use interpreter::{run_source, InterpretError};

mod config;
use config::Config;

/// Evaluates the expression in a source file and prints its value.
#[derive(clap::Parser)]
#[command(version)]
struct Args {
    /// File containing a single expression
    file: PathBuf,
}

fn init_logger() {
    let config = Config::from_env();
    let level = config.as_ref().map_or(log::LevelFilter::Warn, Config::log_level);

    // RUST_LOG still overrides the configured level
    env_logger::Builder::new().filter_level(level).parse_default_env().init();

    if let Err(e) = config {
        log::warn!("{e:#}, using default log level");
    }
}

fn run_file(path: &Path) -> anyhow::Result<ExitCode> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;

    log::info!("Evaluating {}", path.display());
    match run_source(&source) {
        Ok(value) => {
            println!("{value}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            match &e {
                InterpretError::ScanError(errors) => log::info!("{} scan error(s)", errors.len()),
                InterpretError::ParseError(errors) => log::info!("{} parse error(s)", errors.len()),
                InterpretError::RuntimeError(_) => log::info!("Evaluation aborted"),
            }
            eprintln!("{e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    init_logger();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // --help and --version end up here too
            return if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    match run_file(&args.file) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
