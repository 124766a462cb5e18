//! Output formatting and styling module.
//!
//! The organizer only produces [`FileReport`] values and a [`RunReport`]; this module
//! turns them into something a person or a script can read. Two formats exist:
//! colored text lines with a summary table, and JSON lines (one object per file, then
//! one summary object) for automation.

use crate::file_category::extension_of;
use crate::file_organizer::{FileReport, MoveOutcome, RunReport, Scan};
use clap::ValueEnum;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fmt::Display;

/// How results are written to standard output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines with colors.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Stateless console helpers with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    ///
    /// ```no_run
    /// use sortdir::output::OutputFormatter;
    /// OutputFormatter::error("Directory '/tmp/nope' not found or is not a directory");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar for the move phase, drawn on stderr.
    ///
    /// indicatif hides the bar when stderr is not a terminal.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb
    }

    /// Prints a table of moved files per category.
    ///
    /// ```no_run
    /// use sortdir::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("Documents", 15);
    /// counts.insert("Images", 8);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(category_counts: &BTreeMap<&str, usize>, total_files: usize) {
        let max_category_len = category_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in category_counts {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                plural(*count),
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files),
            width = max_category_len
        );
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

/// Describes one file's outcome as a single uncolored line.
///
/// ```
/// use sortdir::file_organizer::{FileReport, MoveOutcome};
/// use sortdir::output::describe;
///
/// let report = FileReport {
///     file: "photo.JPG".to_string(),
///     category: Some("Images".to_string()),
///     outcome: MoveOutcome::Moved { destination: "photo.JPG".to_string(), renamed: false },
/// };
/// assert_eq!(describe(&report), "photo.JPG [.jpg] -> Images/photo.JPG");
/// ```
pub fn describe(report: &FileReport) -> String {
    let extension = extension_of(&report.file);
    let ext_info = if extension.is_empty() {
        "[no extension]".to_string()
    } else {
        format!("[{}]", extension)
    };
    let category = report.category.as_deref().unwrap_or("-");

    match &report.outcome {
        MoveOutcome::Moved {
            destination,
            renamed,
        } => {
            let note = if *renamed {
                " (renamed to avoid overwrite)"
            } else {
                ""
            };
            format!(
                "{} {} -> {}/{}{}",
                report.file, ext_info, category, destination, note
            )
        }
        MoveOutcome::WouldMove {
            destination,
            renamed,
        } => {
            let note = if *renamed { " (would be renamed)" } else { "" };
            format!(
                "{} {} would move to {}/{}{}",
                report.file, ext_info, category, destination, note
            )
        }
        MoveOutcome::Skipped(reason) => format!("{} skipped ({})", report.file, reason),
        MoveOutcome::Failed(error) => {
            format!("{} {} -> {}: {}", report.file, ext_info, category, error)
        }
    }
}

/// Machine-readable form of one file's outcome.
pub fn report_json(report: &FileReport) -> Value {
    let mut value = json!({
        "file": report.file,
        "extension": extension_of(&report.file),
        "category": report.category,
        "status": report.outcome.status(),
    });

    match &report.outcome {
        MoveOutcome::Moved {
            destination,
            renamed,
        }
        | MoveOutcome::WouldMove {
            destination,
            renamed,
        } => {
            value["destination"] = json!(destination);
            value["renamed"] = json!(renamed);
        }
        MoveOutcome::Skipped(reason) => {
            value["reason"] = json!(reason.label());
            if let crate::config::SkipReason::Excluded(pattern) = reason {
                value["pattern"] = json!(pattern);
            }
        }
        MoveOutcome::Failed(error) => {
            value["reason"] = json!(error.label());
            value["error"] = json!(error.to_string());
        }
    }
    value
}

/// Machine-readable summary of a run.
pub fn summary_json(run: &RunReport) -> Value {
    json!({
        "status": "summary",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "directory": run.root.to_string_lossy(),
        "dry_run": run.dry_run,
        "nothing_to_organize": run.nothing_to_organize(),
        "counts": run.summary,
        "categories": run.moved_by_category(),
    })
}

/// Machine-readable form of a failure that ended the run.
pub fn error_json(kind: &str, error: &dyn Display) -> Value {
    json!({
        "status": "error",
        "kind": kind,
        "error": error.to_string(),
    })
}

/// Streams a run to the console in the chosen format.
pub struct Reporter {
    format: OutputFormat,
    quiet: bool,
    progress: Option<ProgressBar>,
}

impl Reporter {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self {
            format,
            quiet,
            progress: None,
        }
    }

    /// Announces a scanned directory before anything moves.
    pub fn begin(&mut self, scan: &Scan, dry_run: bool) {
        if self.format != OutputFormat::Text {
            return;
        }
        if dry_run {
            OutputFormatter::dry_run_notice(&format!(
                "Analyzing contents of: {}",
                scan.root.display()
            ));
        } else {
            OutputFormatter::info(&format!("Organizing contents of: {}", scan.root.display()));
        }
        if !scan.is_empty() {
            self.progress = Some(OutputFormatter::create_progress_bar(scan.total() as u64));
        }
    }

    /// Emits one file's outcome.
    pub fn file(&mut self, report: &FileReport) {
        match self.format {
            OutputFormat::Json => println!("{}", report_json(report)),
            OutputFormat::Text => {
                let line = describe(report);
                let quiet = self.quiet;
                let print = || {
                    if quiet {
                        return;
                    }
                    match &report.outcome {
                        MoveOutcome::Moved { .. } => OutputFormatter::success(&line),
                        MoveOutcome::WouldMove { .. } => OutputFormatter::plain(&format!("→ {}", line)),
                        MoveOutcome::Skipped(_) => OutputFormatter::plain(&format!("- {}", line)),
                        MoveOutcome::Failed(_) => OutputFormatter::error(&line),
                    }
                };
                match &self.progress {
                    Some(pb) => {
                        pb.suspend(print);
                        pb.inc(1);
                    }
                    None => print(),
                }
            }
        }
    }

    /// Emits the final summary.
    pub fn finish(&mut self, run: &RunReport) {
        if let Some(pb) = self.progress.take() {
            pb.finish_and_clear();
        }

        match self.format {
            OutputFormat::Json => println!("{}", summary_json(run)),
            OutputFormat::Text => Self::text_summary(run),
        }
    }

    fn text_summary(run: &RunReport) {
        let summary = &run.summary;

        if run.nothing_to_organize() {
            OutputFormatter::plain(&nothing_to_organize_message(run));
            return;
        }

        OutputFormatter::header("SUMMARY");
        OutputFormatter::summary_table(&run.moved_by_category(), summary.moved);
        OutputFormatter::plain(&format!(
            "Processed: {}  Moved: {}  Renamed: {}  Skipped: {}  Failed: {}",
            summary.processed, summary.moved, summary.renamed, summary.skipped, summary.failed
        ));

        if summary.has_failures() {
            OutputFormatter::warning("Some files could not be organized. Please review errors above.");
        } else if run.dry_run {
            OutputFormatter::dry_run_notice("No files were modified.");
        } else {
            OutputFormatter::success("Organization complete!");
        }
    }

    /// Reports a failure that ended the run before any file was touched.
    pub fn fatal(&self, kind: &str, error: &dyn Display) {
        match self.format {
            OutputFormat::Json => println!("{}", error_json(kind, error)),
            OutputFormat::Text => OutputFormatter::error(&format!("Error: {}", error)),
        }
    }
}

/// One-line text for a run that moved nothing, mentioning files left in place.
fn nothing_to_organize_message(run: &RunReport) -> String {
    match run.summary.skipped {
        0 => format!(
            "Nothing to organize: no files found directly in {}.",
            run.root.display()
        ),
        skipped => format!(
            "Nothing to organize: no files to move in {} ({} {} skipped).",
            run.root.display(),
            skipped,
            plural(skipped)
        ),
    }
}
