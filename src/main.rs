//! Readgrade: description readability CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use readgrade::analyzer::engine::CollectionFailure;
use readgrade::analyzer::{CorpusScanner, ReadabilityReport};
use readgrade::config::{default_config_json, load_config, Config, CONFIG_FILENAME};
use readgrade::maintenance::verified::{parse_date, today};
use readgrade::maintenance::{migrate_coordinates, stamp_verified, VerificationList};
use readgrade::reporter::{ConsoleReporter, JsonReporter};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Readgrade: Flesch-Kincaid readability report for program descriptions
#[derive(Parser, Debug)]
#[command(name = "readgrade")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Data directories to scan (default: dataDirs from config)
    paths: Vec<PathBuf>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Quiet mode (one summary line)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (per-collection listings and text statistics)
    #[arg(long, short)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Number of hardest descriptions to list
    #[arg(long, value_name = "N")]
    top: Option<usize>,

    /// Path to config file (default: search .readgraderc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .readgraderc.json with the built-in defaults
    Init {
        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Set verified_date on collection records
    StampVerified {
        /// Data directories to update (default: dataDirs from config)
        paths: Vec<PathBuf>,

        /// Date to stamp, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,

        /// YAML or JSON list of verified record ids; only these records are stamped
        #[arg(long)]
        results: Option<PathBuf>,

        /// Report changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Output format as JSON
        #[arg(long, short)]
        json: bool,

        /// Path to config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Replace map_link URLs with latitude/longitude fields
    MigrateCoords {
        /// Data directories to update (default: dataDirs from config)
        paths: Vec<PathBuf>,

        /// Report changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Output format as JSON
        #[arg(long, short)]
        json: bool,

        /// Path to config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    if let Some(cmd) = args.command {
        return match cmd {
            Commands::Init { dir } => run_init(dir.as_deref()),
            Commands::StampVerified {
                paths,
                date,
                results,
                dry_run,
                json,
                config,
            } => run_stamp(
                &paths,
                date.as_deref(),
                results.as_deref(),
                dry_run,
                json,
                config.as_deref(),
            ),
            Commands::MigrateCoords {
                paths,
                dry_run,
                json,
                config,
            } => run_migrate(&paths, dry_run, json, config.as_deref()),
        };
    }

    let work_dir = std::env::current_dir().context("Failed to get current directory")?;

    // Load config (CLI flags override config file)
    let config =
        load_config(&work_dir, args.config.as_deref())?.merge_with_cli(&args.paths, args.top);
    let dirs = config.resolve_data_dirs(&work_dir);
    check_data_paths(&dirs)?;

    let scanner = CorpusScanner::from_config(&config)?;
    let outcome = scanner.scan(&dirs)?;
    let report = ReadabilityReport::build(&outcome, config.top());

    if !args.quiet {
        warn_failures(&report.failures);
        warn_missing_dirs(&report.missing_dirs);
        if outcome.skipped_unnamed > 0 && args.verbose {
            eprintln!(
                "{}: {} record(s) without a name were skipped",
                "Info".blue(),
                outcome.skipped_unnamed
            );
        }
    }

    if args.json {
        println!("{}", JsonReporter::new().pretty().report(&report));
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        if args.no_color {
            colored::control::set_override(false);
            reporter = reporter.without_colors();
        }
        if args.quiet {
            reporter.report_quiet(&report);
        } else {
            reporter.report(&report);
        }
    }

    // Findings are advisory
    Ok(ExitCode::SUCCESS)
}

fn run_init(dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    fs::write(&config_path, default_config_json())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("{} {}", "Created".green(), config_path.display());
    Ok(ExitCode::SUCCESS)
}

fn run_stamp(
    paths: &[PathBuf],
    date: Option<&str>,
    results: Option<&Path>,
    dry_run: bool,
    json: bool,
    config: Option<&Path>,
) -> Result<ExitCode> {
    let (_, dirs) = maintenance_setup(paths, config)?;

    let date = match date {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let list = results.map(VerificationList::load).transpose()?;
    if let Some(ref list) = list {
        if list.is_empty() {
            eprintln!("{}: verification results list is empty", "Warning".yellow());
        }
    }

    let summary = stamp_verified(&dirs, date, list.as_ref(), dry_run)?;
    warn_failures(&summary.files.failures);
    warn_missing_dirs(&summary.files.missing_dirs);

    if json {
        println!("{}", JsonReporter::new().pretty().report_stamp(&summary));
    } else {
        ConsoleReporter::new().report_stamp(&summary);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_migrate(
    paths: &[PathBuf],
    dry_run: bool,
    json: bool,
    config: Option<&Path>,
) -> Result<ExitCode> {
    let (config, dirs) = maintenance_setup(paths, config)?;

    let migration = migrate_coordinates(&dirs, &config.bounding_box(), dry_run)?;
    warn_failures(&migration.files.failures);
    warn_missing_dirs(&migration.files.missing_dirs);

    if json {
        println!("{}", JsonReporter::new().pretty().report_migration(&migration));
    } else {
        ConsoleReporter::new().report_migration(&migration);
    }
    Ok(ExitCode::SUCCESS)
}

/// Config and resolved data directories for a maintenance pass
fn maintenance_setup(paths: &[PathBuf], config: Option<&Path>) -> Result<(Config, Vec<PathBuf>)> {
    let work_dir = std::env::current_dir().context("Failed to get current directory")?;
    let config = load_config(&work_dir, config)?.merge_with_cli(paths, None);
    let dirs = config.resolve_data_dirs(&work_dir);
    check_data_paths(&dirs)?;
    Ok((config, dirs))
}

/// A data path that exists but is not a directory cannot be scanned
fn check_data_paths(dirs: &[PathBuf]) -> Result<()> {
    for dir in dirs {
        if dir.exists() && !dir.is_dir() {
            anyhow::bail!("Data path is not a directory: {}", dir.display());
        }
    }
    Ok(())
}

fn warn_failures(failures: &[CollectionFailure]) {
    for failure in failures {
        eprintln!(
            "{}: skipped collection '{}' ({}): {}",
            "Warning".yellow(),
            failure.collection,
            failure.path.display(),
            failure.message
        );
    }
}

fn warn_missing_dirs(dirs: &[PathBuf]) {
    for dir in dirs {
        eprintln!(
            "{}: data directory not found: {}",
            "Warning".yellow(),
            dir.display()
        );
    }
}
