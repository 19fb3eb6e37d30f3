// Declare modules
pub mod cli;
pub mod config;
pub mod filter;
pub mod formatter;
pub mod models;
pub mod reverter;
pub mod scanner;

use anyhow::{bail, Result};
use clap::Parser;
use std::io::{self, Write};

use self::cli::{Cli, Command};
use self::config::{load_config_file, resolve_log_level, resolve_revert_config};
use self::formatter::ReportPrinter;
use self::models::RunConfig;
use self::reverter::Reverter;
use self::scanner::Scanner;

/// Parses arguments, sets up logging and dispatches the subcommand.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Load the config file once; everything below reads from it
    let file = load_config_file(args.config.as_deref())?;

    // 3. Logging (RUST_LOG still overrides)
    let level = resolve_log_level(args.verbose, &file)?;
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match args.command {
        Command::RevertSymlinks {
            root,
            exclude,
            dry_run,
            move_targets,
        } => {
            let config = resolve_revert_config(root, exclude, dry_run, move_targets, &file)?;
            revert_symlinks(&config, &mut io::stdout().lock(), &mut io::stderr().lock())
        }
    }
}

/// Pairings (dry run only) and the summary go to `out`, failures to `err`.
/// Any failed link turns the whole run into an error.
fn revert_symlinks(config: &RunConfig, out: &mut impl Write, err: &mut impl Write) -> Result<()> {
    log::info!("Reverting symlinks in {}", config.root.display());
    if config.dry_run {
        log::info!("Dry run, no changes will be made");
    } else {
        log::info!("{:?} mode", config.mode);
    }
    log::debug!("Excluding components: {:?}", config.excludes.names());

    // Phase one: fixed snapshot. Phase two: replace along it.
    let scanner = Scanner::new(config.root.clone(), &config.excludes)?;
    let links = scanner.scan();
    let report = Reverter::new(config).revert(&links);
    log::debug!(
        "{} replaced, {} excluded, {} failed",
        report.replaced.len(),
        report.excluded,
        report.failures.len()
    );

    if config.dry_run && !report.replaced.is_empty() {
        writeln!(out, "{}", ReportPrinter::dry_run_pairings(&report, config.mode))?;
    }
    writeln!(out, "{}", ReportPrinter::summary(&report))?;

    if !report.is_success() {
        writeln!(err, "{}", ReportPrinter::failures(&report))?;
        bail!(
            "{} of {} symlinks could not be reverted",
            report.failures.len(),
            report.discovered
        );
    }

    Ok(())
}
