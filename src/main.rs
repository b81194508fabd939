/*============================================================
  Synavera Project: Syn-Syu
  Module: synsyu_listing::main
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Entry point for the Syn-Syu listing scanner. Reads rsync
    `--list-only -r` output from upstream mirrors and emits the
    newest release archive per package as a JSON manifest.

  Security / Safety Notes:
    Operates within user privileges. Reads listing files or
    stdin and writes one manifest; no network access.

  Dependencies:
    clap for CLI parsing, chrono for timestamps.

  Operational Scope:
    Invoked as `rsync ... | synsyu-listing --prefix URL` when
    refreshing upstream release snapshots.

  Revision History:
    2025-11-12 COD  Authored listing scanner runtime.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Result-first error handling with deterministic exits
    - Structured logging following Synavera cadence
    - Configurable execution via CLI and config file
============================================================*/

mod aggregator;
mod config;
mod error;
mod listing;
mod logger;
mod manifest;
mod package_info;
mod tarball;
mod upstream;
mod vercmp;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::{ArgAction, Parser};

use aggregator::{Aggregator, AggregatorOptions};
use config::{parse_since, ListingConfig};
use error::{Result, SynsyuError};
use logger::Logger;
use manifest::{print_manifest, print_summary, write_manifest};

/// Command-line arguments for the listing scanner.
#[derive(Debug, Parser)]
#[command(
    name = "Syn-Syu-Listing",
    version,
    author = "Synavera Systems",
    about = "Newest upstream release per package from an rsync listing"
)]
struct Cli {
    /// Listing files to read; stdin when none are given.
    #[arg(value_name = "LISTING")]
    inputs: Vec<PathBuf>,
    /// Filter to files dated on or after this date.
    #[arg(long, value_name = "DATE")]
    since: Option<String>,
    /// Url prefix prepended to every listing path.
    #[arg(long, value_name = "URL")]
    prefix: Option<String>,
    /// Override configuration file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Write the manifest here instead of stdout.
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Explicit log file path.
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
    /// Do not emit the manifest; print a summary only.
    #[arg(long, action = ArgAction::SetTrue)]
    dry_run: bool,
    /// Verbose logging to stderr. Can be specified multiple times.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("[Syn-Syu-Listing] {}", err);
            err.exit_code()
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = ListingConfig::load_from_optional_path(cli.config.as_deref())?;

    let since = match cli.since.as_deref() {
        Some(raw) => Some(parse_since(raw)?),
        None => config.since()?,
    };
    let prefix = cli
        .prefix
        .clone()
        .or_else(|| config.prefix.clone())
        .unwrap_or_default();
    let output = cli.output.clone().or_else(|| config.output.clone());

    let session_stamp = Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let log_path = cli.log.clone().or_else(|| {
        config
            .log_dir
            .as_ref()
            .map(|dir| dir.join(format!("listing_{session_stamp}.log")))
    });
    let logger = Logger::new(log_path, cli.verbose)?;
    logger.info(
        "INIT",
        format!(
            "Listing scan starting (since={}, prefix={prefix:?})",
            since.map_or_else(|| "-".to_string(), |s| s.to_rfc3339())
        ),
    );

    let mut aggregator = Aggregator::new(AggregatorOptions { since, prefix }, &logger)?;
    if let Err(err) = scan_inputs(&mut aggregator, &cli.inputs, &logger) {
        logger.error("SCAN", err.to_string());
        logger.finalize()?;
        return Err(err);
    }

    if aggregator.is_empty() {
        logger.warn("EMPTY", "No release archives found in listing");
    }

    let (records, stats) = aggregator.finalize();
    logger.info(
        "SUMMARY",
        format!(
            "lines={} packages={} inserted={} replaced={} discarded={} unparsed={} fallback={}",
            stats.lines,
            records.len(),
            stats.inserted,
            stats.replaced,
            stats.discarded,
            stats.unparsed,
            stats.fallback_names
        ),
    );

    if cli.dry_run {
        print_summary(&stats, records.len());
    } else if let Some(path) = output {
        write_manifest(&records, &path)?;
        logger.info(
            "MANIFEST",
            format!("Manifest written to {}", path.display()),
        );
    } else {
        print_manifest(&records)?;
    }

    logger.info("COMPLETE", "Listing scan complete.");
    logger.finalize()?;

    Ok(ExitCode::SUCCESS)
}

/// Feed each input (or stdin) through the aggregator in order.
fn scan_inputs(aggregator: &mut Aggregator<'_>, inputs: &[PathBuf], logger: &Logger) -> Result<()> {
    if inputs.is_empty() {
        return aggregator.ingest_reader(io::stdin().lock());
    }

    for path in inputs {
        let file = File::open(path).map_err(|err| {
            SynsyuError::Filesystem(format!("Failed to open listing {}: {err}", path.display()))
        })?;
        aggregator
            .ingest_reader(BufReader::new(file))
            .map_err(|err| match err {
                SynsyuError::Parse { line, reason } => SynsyuError::Parse {
                    line,
                    reason: format!("{} ({})", reason, path.display()),
                },
                other => other,
            })?;
        logger.debug(
            "INPUT",
            format!(
                "{} scanned; {} lines so far, {} packages",
                path.display(),
                aggregator.stats().lines,
                aggregator.len()
            ),
        );
    }
    Ok(())
}
