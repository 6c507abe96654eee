use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use scribe_config::ScribeConfig;

mod cli;
mod process;

use process::{Processor, error_response};

fn main() {
    if let Err(error) = run() {
        eprintln!("scribe error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = match &cli.config {
        Some(path) => ScribeConfig::load_with_file(path),
        None => ScribeConfig::load_with_dotenv(),
    }
    .context("failed to load scribe configuration")?;

    let search_paths = if cli.search_paths.is_empty() {
        config.general.search_paths.clone()
    } else {
        cli.search_paths.clone()
    };

    if cli.debug_info {
        return print_debug_info(&search_paths);
    }

    let processor = Processor::new(config, search_paths);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    if cli.line_by_line {
        for line in stdin.lock().lines() {
            let line = line.context("failed to read stdin")?;
            if line.trim().is_empty() {
                continue;
            }
            answer(&processor, &line, &mut stdout)?;
        }
    } else {
        let mut input = String::new();
        stdin
            .lock()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        answer(&processor, &input, &mut stdout)?;
    }
    Ok(())
}

/// Write the response to one input, or its error document; never both.
fn answer(processor: &Processor, input: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let output = match processor.process_json(input) {
        Ok(response) => serde_json::to_string(&response)?,
        Err(error) => {
            tracing::warn!(error = %format!("{error:#}"), "request failed");
            serde_json::to_string(&error_response(&error))?
        }
    };
    writeln!(out, "{output}")?;
    out.flush()?;
    Ok(())
}

fn print_debug_info(search_paths: &[PathBuf]) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "scribe {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "System: {} {}", std::env::consts::OS, std::env::consts::ARCH)?;
    writeln!(out, "Search paths:")?;
    for path in search_paths {
        writeln!(out, "  {}", path.display())?;
    }
    writeln!(out, "Environment:")?;
    let mut variables: Vec<(String, String)> = std::env::vars()
        .filter(|(key, _)| key.starts_with("SCRIBE_"))
        .collect();
    variables.sort();
    for (key, value) in variables {
        writeln!(out, "  {key}: {value}")?;
    }
    Ok(())
}

/// Logs go to stderr; stdout carries JSON only.
fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("SCRIBE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
