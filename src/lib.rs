//! sortdir - sort the files of a directory into category subfolders
//!
//! This library classifies files by extension against an ordered category table,
//! moves them into `<directory>/<category>/` without ever overwriting an existing
//! file, and reports one outcome per file plus a run summary.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod output;

pub use config::{FilterError, OrganizeOptions, ScanFilter, SkipReason};
pub use file_category::{Category, CategoryTable};
pub use file_organizer::{
    FileEntry, FileError, FileReport, MoveOutcome, OrganizeError, Organizer, RunReport, Summary,
};

pub use cli::{Args, run_cli};
