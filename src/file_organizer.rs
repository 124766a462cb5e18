//! Moving the files of one directory into category subfolders.
//!
//! A run has two phases. [`Organizer::scan`] validates the target, takes a snapshot
//! of its regular files, applies the selection rules and classifies each file; it
//! never touches the filesystem beyond reading. [`Organizer::apply`] then creates
//! category folders and moves files one at a time, producing a [`FileReport`] per
//! file. Only directory-level problems abort a run; anything that goes wrong with a
//! single file is recorded in its report and the loop moves on.

use crate::config::{OrganizeOptions, SkipReason};
use crate::file_category::{CategoryTable, extension_of, split_name};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::ffi::{OsStr, OsString};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Directory-level failures. Each one aborts the run before anything is moved.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The target does not exist or is not a directory.
    #[error("Directory '{}' not found or is not a directory", path.display())]
    DirectoryNotFound { path: PathBuf },
    /// The target exists but cannot be read.
    #[error("Permission denied to access directory '{}'", path.display())]
    AccessDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Listing the directory failed for another reason.
    #[error("Error accessing contents of '{}': {source}", path.display())]
    ScanError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl OrganizeError {
    /// Stable keyword for machine-readable output.
    pub fn kind(&self) -> &'static str {
        match self {
            OrganizeError::DirectoryNotFound { .. } => "directory_not_found",
            OrganizeError::AccessDenied { .. } => "access_denied",
            OrganizeError::ScanError { .. } => "scan_error",
        }
    }
}

/// Failures confined to a single file.
#[derive(Debug, Error)]
pub enum FileError {
    /// The category folder could not be created.
    #[error("folder creation error: could not create '{}': {source}", path.display())]
    FolderCreationFailed {
        category: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file could not be moved into its folder.
    #[error("move error: could not move '{file}' to '{}': {source}", destination.display())]
    MoveFailed {
        file: String,
        destination: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    /// Short label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            FileError::FolderCreationFailed { .. } => "folder creation error",
            FileError::MoveFailed { .. } => "move error",
        }
    }
}

/// Result type for directory-level operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// A regular file found directly inside the target directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Name for display and matching, lossily decoded if it is not UTF-8.
    pub name: String,
    /// Name exactly as listed by the filesystem.
    pub file_name: OsString,
    /// Lowercase extension including the dot, empty if none.
    pub extension: String,
    /// Full path to the file at scan time.
    pub path: PathBuf,
}

impl FileEntry {
    /// Builds an entry for `name` inside `dir`.
    pub fn new(dir: &Path, name: &OsStr) -> Self {
        let display = name.to_string_lossy().into_owned();
        Self {
            extension: extension_of(&display),
            name: display,
            file_name: name.to_os_string(),
            path: dir.join(name),
        }
    }
}

/// What happens to a file that survived selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub entry: FileEntry,
    /// Category folder name, verbatim from the table.
    pub category: String,
}

/// Snapshot of a target directory, ready to be applied.
#[derive(Debug, Clone)]
pub struct Scan {
    /// Absolute path of the directory being organized.
    pub root: PathBuf,
    /// Files to move, sorted by name.
    pub planned: Vec<PlannedMove>,
    /// Files left in place, sorted by name.
    pub skipped: Vec<(FileEntry, SkipReason)>,
}

impl Scan {
    /// True when no file needs to move.
    pub fn is_empty(&self) -> bool {
        self.planned.is_empty()
    }

    /// Number of regular files seen, skipped ones included.
    pub fn total(&self) -> usize {
        self.planned.len() + self.skipped.len()
    }
}

/// The result of processing one file.
#[derive(Debug)]
pub enum MoveOutcome {
    /// The file now lives at `<category>/<destination>`.
    Moved { destination: String, renamed: bool },
    /// Dry run: the file would have been moved to `<category>/<destination>`.
    WouldMove { destination: String, renamed: bool },
    /// The file was left where it is.
    Skipped(SkipReason),
    /// Something went wrong with this file only.
    Failed(FileError),
}

impl MoveOutcome {
    /// Stable status keyword for machine-readable output.
    pub fn status(&self) -> &'static str {
        match self {
            MoveOutcome::Moved { .. } => "moved",
            MoveOutcome::WouldMove { .. } => "would_move",
            MoveOutcome::Skipped(_) => "skipped",
            MoveOutcome::Failed(_) => "failed",
        }
    }
}

/// A file's name, category and outcome.
#[derive(Debug)]
pub struct FileReport {
    pub file: String,
    /// `None` for files skipped before classification.
    pub category: Option<String>,
    pub outcome: MoveOutcome,
}

/// Counts for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Regular files considered, skipped ones included.
    pub processed: usize,
    /// Files moved, or that would be moved in a dry run.
    pub moved: usize,
    /// Subset of `moved` that needed a new name.
    pub renamed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Summary {
    fn record(&mut self, outcome: &MoveOutcome) {
        self.processed += 1;
        match outcome {
            MoveOutcome::Moved { renamed, .. } | MoveOutcome::WouldMove { renamed, .. } => {
                self.moved += 1;
                if *renamed {
                    self.renamed += 1;
                }
            }
            MoveOutcome::Skipped(_) => self.skipped += 1,
            MoveOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// True if at least one file failed.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Everything that happened during a run.
#[derive(Debug)]
pub struct RunReport {
    pub root: PathBuf,
    pub dry_run: bool,
    pub files: Vec<FileReport>,
    pub summary: Summary,
}

impl RunReport {
    /// True when nothing needed organizing: no files, or only skipped ones.
    pub fn nothing_to_organize(&self) -> bool {
        self.summary.moved == 0 && self.summary.failed == 0
    }

    /// Number of files moved into each category, sorted by category name.
    pub fn moved_by_category(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for report in &self.files {
            if let (Some(category), MoveOutcome::Moved { .. } | MoveOutcome::WouldMove { .. }) =
                (&report.category, &report.outcome)
            {
                *counts.entry(category.as_str()).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// Organizes the direct children of a directory into category subfolders.
///
/// The category table is borrowed for the whole run and never modified.
pub struct Organizer<'a> {
    table: &'a CategoryTable,
    options: OrganizeOptions,
}

impl<'a> Organizer<'a> {
    pub fn new(table: &'a CategoryTable, options: OrganizeOptions) -> Self {
        Self { table, options }
    }

    /// Scans and organizes `dir` in one go.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sortdir::config::OrganizeOptions;
    /// use sortdir::file_category::CategoryTable;
    /// use sortdir::file_organizer::Organizer;
    /// use std::path::Path;
    ///
    /// let table = CategoryTable::default();
    /// let organizer = Organizer::new(&table, OrganizeOptions::default());
    /// match organizer.organize(Path::new("/home/user/Downloads")) {
    ///     Ok(report) => println!("{} moved, {} failed", report.summary.moved, report.summary.failed),
    ///     Err(e) => eprintln!("Error: {}", e),
    /// }
    /// ```
    pub fn organize(&self, dir: &Path) -> OrganizeResult<RunReport> {
        let scan = self.scan(dir)?;
        Ok(self.apply(&scan, |_| {}))
    }

    /// Validates `dir`, lists its regular files, filters and classifies them.
    ///
    /// Reads only. Directories, symlinks and other entry types are ignored.
    ///
    /// # Errors
    ///
    /// - [`OrganizeError::DirectoryNotFound`] if `dir` is missing or not a directory
    /// - [`OrganizeError::AccessDenied`] if it cannot be read
    /// - [`OrganizeError::ScanError`] for any other listing failure
    pub fn scan(&self, dir: &Path) -> OrganizeResult<Scan> {
        let root = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
        validate_directory(&root)?;

        let mut names = list_regular_files(&root)?;
        names.sort();

        let mut planned = Vec::new();
        let mut skipped = Vec::new();

        for name in names {
            let entry = FileEntry::new(&root, &name);
            if let Some(reason) = self.options.filter.skip_reason(&entry.name) {
                debug!(file = %entry.name, reason = %reason, "Skipping file");
                skipped.push((entry, reason));
                continue;
            }

            let category = self.table.classify(&entry.name).to_string();
            debug!(
                file = %entry.name,
                extension = %entry.extension,
                category = %category,
                "Classified file"
            );
            planned.push(PlannedMove { entry, category });
        }

        Ok(Scan {
            root,
            planned,
            skipped,
        })
    }

    /// Carries out a scan, calling `observer` once per file as soon as it is done.
    ///
    /// Skipped files are reported first, then planned ones in name order. Per-file
    /// failures never stop the loop.
    pub fn apply<F>(&self, scan: &Scan, mut observer: F) -> RunReport
    where
        F: FnMut(&FileReport),
    {
        let mut files = Vec::with_capacity(scan.total());
        let mut summary = Summary::default();
        // Destinations claimed earlier in a dry run, which never hit the disk.
        let mut claimed: HashSet<PathBuf> = HashSet::new();

        let mut push = |report: FileReport| {
            summary.record(&report.outcome);
            observer(&report);
            files.push(report);
        };

        for (entry, reason) in &scan.skipped {
            push(FileReport {
                file: entry.name.clone(),
                category: None,
                outcome: MoveOutcome::Skipped(reason.clone()),
            });
        }

        for planned in &scan.planned {
            let outcome = if self.options.dry_run {
                plan_move(&scan.root, planned, &mut claimed)
            } else {
                execute_move(&scan.root, planned)
            };
            push(FileReport {
                file: planned.entry.name.clone(),
                category: Some(planned.category.clone()),
                outcome,
            });
        }

        RunReport {
            root: scan.root.clone(),
            dry_run: self.options.dry_run,
            files,
            summary,
        }
    }
}

fn validate_directory(path: &Path) -> OrganizeResult<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(OrganizeError::DirectoryNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            Err(OrganizeError::AccessDenied {
                path: path.to_path_buf(),
                source: e,
            })
        }
        Err(_) => Err(OrganizeError::DirectoryNotFound {
            path: path.to_path_buf(),
        }),
    }
}

/// Names of the regular files directly inside `dir`, UTF-8 or not.
fn list_regular_files(dir: &Path) -> OrganizeResult<Vec<OsString>> {
    let scan_error = |e: io::Error| {
        if e.kind() == io::ErrorKind::PermissionDenied {
            OrganizeError::AccessDenied {
                path: dir.to_path_buf(),
                source: e,
            }
        } else {
            OrganizeError::ScanError {
                path: dir.to_path_buf(),
                source: e,
            }
        }
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(scan_error)? {
        let entry = entry.map_err(scan_error)?;
        let file_type = entry.file_type().map_err(scan_error)?;
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name();
        if name.to_str().is_none() {
            debug!(name = ?name, "File name is not valid UTF-8");
        }
        names.push(name);
    }
    Ok(names)
}

/// Moves one file into its category folder, creating the folder when needed.
fn execute_move(root: &Path, planned: &PlannedMove) -> MoveOutcome {
    let folder = root.join(&planned.category);

    if let Err(e) = ensure_folder(&folder) {
        warn!(folder = %folder.display(), error = %e, "Could not create category folder");
        return MoveOutcome::Failed(FileError::FolderCreationFailed {
            category: planned.category.clone(),
            path: folder,
            source: e,
        });
    }

    let (destination, renamed) =
        resolve_destination(&folder, &planned.entry.file_name, entry_exists);

    if let Err(e) = move_file(&planned.entry.path, &destination) {
        warn!(file = %planned.entry.name, error = %e, "Could not move file");
        return MoveOutcome::Failed(FileError::MoveFailed {
            file: planned.entry.name.clone(),
            destination,
            source: e,
        });
    }

    info!(
        file = %planned.entry.name,
        destination = %destination.display(),
        renamed,
        "Moved file"
    );
    MoveOutcome::Moved {
        destination: destination_name(&destination),
        renamed,
    }
}

/// Works out where a file would go without touching the disk.
fn plan_move(root: &Path, planned: &PlannedMove, claimed: &mut HashSet<PathBuf>) -> MoveOutcome {
    let folder = root.join(&planned.category);
    let (destination, renamed) = resolve_destination(&folder, &planned.entry.file_name, |p| {
        claimed.contains(p) || entry_exists(p)
    });
    let name = destination_name(&destination);
    claimed.insert(destination);
    MoveOutcome::WouldMove {
        destination: name,
        renamed,
    }
}

/// True if anything occupies `path`, dangling symlinks included.
fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn destination_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Creates the category folder unless it already exists.
///
/// Only the single folder is created. An existing non-directory entry with the same
/// name is an error.
fn ensure_folder(folder: &Path) -> io::Result<()> {
    if folder.is_dir() {
        return Ok(());
    }
    fs::create_dir(folder)?;
    info!(folder = %folder.display(), "Created category folder");
    Ok(())
}

/// Picks a destination inside `folder` that `exists` reports as free.
///
/// Tries `name` first, then `stem (1).ext`, `stem (2).ext`, and so on. Returns the
/// path and whether the name had to change. The check is not atomic with the move
/// that follows.
///
/// ```
/// use sortdir::file_organizer::resolve_destination;
/// use std::ffi::OsStr;
/// use std::path::{Path, PathBuf};
///
/// let taken = [PathBuf::from("/d/Documents/notes.txt")];
/// let (path, renamed) = resolve_destination(Path::new("/d/Documents"), OsStr::new("notes.txt"), |p| {
///     taken.iter().any(|t| t == p)
/// });
/// assert_eq!(path, PathBuf::from("/d/Documents/notes (1).txt"));
/// assert!(renamed);
/// ```
pub fn resolve_destination<F>(folder: &Path, name: &OsStr, mut exists: F) -> (PathBuf, bool)
where
    F: FnMut(&Path) -> bool,
{
    let candidate = folder.join(name);
    if !exists(&candidate) {
        return (candidate, false);
    }

    let mut counter: u64 = 1;
    loop {
        let candidate = folder.join(numbered_name(name, counter));
        if !exists(&candidate) {
            return (candidate, true);
        }
        counter += 1;
    }
}

/// `stem (n).ext` for `name`.
///
/// Names that are not UTF-8 are split with [`Path::file_stem`] and
/// [`Path::extension`], which agree with [`split_name`] except for stems made of dots.
fn numbered_name(name: &OsStr, counter: u64) -> OsString {
    let suffix = format!(" ({})", counter);
    if let Some(name) = name.to_str() {
        let (stem, ext) = split_name(name);
        return format!("{}{}{}", stem, suffix, ext).into();
    }

    let path = Path::new(name);
    let mut numbered = path.file_stem().unwrap_or(name).to_os_string();
    numbered.push(&suffix);
    if let Some(ext) = path.extension() {
        numbered.push(".");
        numbered.push(ext);
    }
    numbered
}

/// Moves `src` to `dest`, falling back to copy and delete across filesystems.
///
/// The fallback never overwrites: the copy goes into a newly created file. If the
/// source cannot be removed afterwards, the copy is deleted and the error returned.
pub fn move_file(src: &Path, dest: &Path) -> io::Result<()> {
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(src = %src.display(), dest = %dest.display(), "Rename crosses devices, copying");
            copy_then_remove(src, dest)
        }
        Err(e) => Err(e),
    }
}

fn copy_then_remove(src: &Path, dest: &Path) -> io::Result<()> {
    let mut reader = fs::File::open(src)?;
    let mut writer = OpenOptions::new().write(true).create_new(true).open(dest)?;

    let copied = io::copy(&mut reader, &mut writer)
        .and_then(|_| writer.sync_all())
        .and_then(|_| fs::metadata(src))
        .and_then(|meta| fs::set_permissions(dest, meta.permissions()));
    drop(writer);

    if let Err(e) = copied.and_then(|_| fs::remove_file(src)) {
        let _ = fs::remove_file(dest);
        return Err(e);
    }
    Ok(())
}
