//! Command-line interface module for sortdir.
//!
//! This module handles:
//! - Argument parsing with clap
//! - Turning arguments into [`OrganizeOptions`]
//! - Running the organizer while streaming results to the [`Reporter`]
//! - Mapping the outcome to a process exit status

use crate::config::{FilterError, OrganizeOptions};
use crate::file_category::CategoryTable;
use crate::file_organizer::{OrganizeError, Organizer, RunReport};
use crate::output::{OutputFormat, Reporter};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use thiserror::Error;
use tracing::error;

/// Exit status for a completed run.
pub const EXIT_OK: u8 = 0;
/// Exit status for a directory-level failure, a bad argument value, or a strict-mode failure.
pub const EXIT_FAILURE: u8 = 1;

/// Organize files in a directory by their type.
#[derive(Debug, Clone, Parser)]
#[command(name = "sortdir", version, about)]
pub struct Args {
    /// The directory path to organize.
    pub directory: PathBuf,

    /// Show what would happen without creating folders or moving files.
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with a failure status if any single file could not be organized.
    #[arg(long)]
    pub strict: bool,

    /// Output format for per-file results and the summary.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Leave files matching this glob pattern in place (repeatable).
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Only print the summary, not one line per file.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity on stderr (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Failures that end a run before any file is touched.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Organize(#[from] OrganizeError),
}

impl RunError {
    pub fn kind(&self) -> &'static str {
        match self {
            RunError::Filter(e) => e.kind(),
            RunError::Organize(e) => e.kind(),
        }
    }
}

/// Runs the organizer with the standard category table and prints the results.
///
/// Returns the process exit status.
///
/// ```no_run
/// use clap::Parser;
/// use sortdir::cli::{Args, run_cli};
///
/// let args = Args::parse_from(["sortdir", "/home/user/Downloads", "--dry-run"]);
/// std::process::exit(run_cli(&args).into());
/// ```
pub fn run_cli(args: &Args) -> u8 {
    let table = CategoryTable::default();
    let mut reporter = Reporter::new(args.format, args.quiet);
    let result = organize_directory(args, &table, &mut reporter);

    if let Err(e) = &result {
        error!(error = %e, "Run aborted");
        reporter.fatal(e.kind(), e);
    }

    exit_status(&result, args.strict)
}

/// Scans and organizes `args.directory` using `table`, streaming to `reporter`.
///
/// # Errors
///
/// Returns [`RunError`] for an invalid exclude pattern or a directory-level
/// failure. Per-file failures are part of the returned [`RunReport`].
pub fn organize_directory(
    args: &Args,
    table: &CategoryTable,
    reporter: &mut Reporter,
) -> Result<RunReport, RunError> {
    let options = OrganizeOptions::new(args.dry_run, &args.exclude)?;
    let organizer = Organizer::new(table, options);

    let scan = organizer.scan(&args.directory)?;
    reporter.begin(&scan, args.dry_run);
    let report = organizer.apply(&scan, |file| reporter.file(file));
    reporter.finish(&report);

    Ok(report)
}

/// Maps a run result to an exit status.
///
/// Per-file failures only count against the run in strict mode.
pub fn exit_status(result: &Result<RunReport, RunError>, strict: bool) -> u8 {
    match result {
        Ok(report) if strict && report.summary.has_failures() => EXIT_FAILURE,
        Ok(_) => EXIT_OK,
        Err(_) => EXIT_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_organizer::Summary;

    fn report_with_failures(failed: usize) -> RunReport {
        RunReport {
            root: PathBuf::from("/data"),
            dry_run: false,
            files: Vec::new(),
            summary: Summary {
                processed: 3,
                moved: 3 - failed,
                renamed: 0,
                skipped: 0,
                failed,
            },
        }
    }

    #[test]
    fn test_parse_minimal_args() {
        let args = Args::try_parse_from(["sortdir", "downloads"]).unwrap();
        assert_eq!(args.directory, PathBuf::from("downloads"));
        assert!(!args.dry_run);
        assert!(!args.strict);
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.exclude.is_empty());
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_parse_all_flags() {
        let args = Args::try_parse_from([
            "sortdir",
            "downloads",
            "--dry-run",
            "--strict",
            "--format",
            "json",
            "--exclude",
            "*.part",
            "--exclude",
            "*.tmp",
            "-q",
            "-vv",
        ])
        .unwrap();
        assert!(args.dry_run);
        assert!(args.strict);
        assert!(args.quiet);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.exclude, vec!["*.part", "*.tmp"]);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_directory_is_required() {
        assert!(Args::try_parse_from(["sortdir"]).is_err());
    }

    #[test]
    fn test_exit_status_default_ignores_file_failures() {
        assert_eq!(exit_status(&Ok(report_with_failures(0)), false), EXIT_OK);
        assert_eq!(exit_status(&Ok(report_with_failures(2)), false), EXIT_OK);
    }

    #[test]
    fn test_exit_status_strict() {
        assert_eq!(exit_status(&Ok(report_with_failures(0)), true), EXIT_OK);
        assert_eq!(exit_status(&Ok(report_with_failures(1)), true), EXIT_FAILURE);
    }

    #[test]
    fn test_exit_status_fatal() {
        let err = RunError::Organize(OrganizeError::DirectoryNotFound {
            path: PathBuf::from("/missing"),
        });
        assert_eq!(exit_status(&Err(err), false), EXIT_FAILURE);
    }

    #[test]
    fn test_run_error_kind() {
        let err = RunError::from(FilterError::InvalidPattern {
            pattern: "[".to_string(),
            reason: "unclosed".to_string(),
        });
        assert_eq!(err.kind(), "invalid_pattern");

        let err = RunError::from(OrganizeError::DirectoryNotFound {
            path: PathBuf::from("/missing"),
        });
        assert_eq!(err.kind(), "directory_not_found");
    }

    #[test]
    fn test_run_cli_invalid_exclude_in_json_mode() {
        let args = Args::try_parse_from(["sortdir", ".", "--format", "json", "--exclude", "[abc"])
            .unwrap();
        assert_eq!(run_cli(&args), EXIT_FAILURE);
    }

    #[test]
    fn test_run_cli_missing_directory() {
        let args = Args::try_parse_from(["sortdir", "/non/existent/path", "-q"]).unwrap();
        assert_eq!(run_cli(&args), EXIT_FAILURE);
    }
}
