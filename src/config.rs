//! Run options and file selection rules.
//!
//! There is no configuration file: everything a run needs is assembled from the
//! command line into an [`OrganizeOptions`] value and handed to the organizer
//! explicitly. File selection is handled by [`ScanFilter`]:
//! - Names starting with a dot are hidden and always skipped
//! - Names matching a user-supplied glob pattern are excluded
//!
//! ```
//! use sortdir::config::{ScanFilter, SkipReason};
//!
//! let filter = ScanFilter::new(&["*.part".to_string()]).unwrap();
//! assert_eq!(filter.skip_reason(".DS_Store"), Some(SkipReason::Hidden));
//! assert!(matches!(filter.skip_reason("movie.mkv.part"), Some(SkipReason::Excluded(_))));
//! assert_eq!(filter.skip_reason("movie.mkv"), None);
//! ```

use glob::Pattern;
use serde::Serialize;
use thiserror::Error;

/// Errors raised while compiling selection rules.
#[derive(Debug, Clone, Error)]
pub enum FilterError {
    /// A glob pattern could not be parsed.
    #[error("Invalid exclude pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl FilterError {
    /// Stable keyword for machine-readable output.
    pub fn kind(&self) -> &'static str {
        match self {
            FilterError::InvalidPattern { .. } => "invalid_pattern",
        }
    }
}

/// Why a file was left where it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "pattern", rename_all = "snake_case")]
pub enum SkipReason {
    /// The name starts with a dot.
    Hidden,
    /// The name matched an exclude pattern.
    Excluded(String),
}

impl SkipReason {
    /// Short label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::Hidden => "hidden",
            SkipReason::Excluded(_) => "excluded",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Hidden => write!(f, "hidden"),
            SkipReason::Excluded(pattern) => write!(f, "excluded by '{}'", pattern),
        }
    }
}

/// Compiled selection rules applied to every direct child of the target directory.
#[derive(Debug, Clone, Default)]
pub struct ScanFilter {
    exclude_patterns: Vec<Pattern>,
}

impl ScanFilter {
    /// Compiles exclude glob patterns.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidPattern`] for the first pattern that does not parse.
    pub fn new(patterns: &[String]) -> Result<Self, FilterError> {
        let exclude_patterns = patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|e| FilterError::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: e.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { exclude_patterns })
    }

    /// Returns why `file_name` should be skipped, or `None` if it should be organized.
    ///
    /// The hidden rule is checked first and cannot be overridden.
    pub fn skip_reason(&self, file_name: &str) -> Option<SkipReason> {
        if file_name.starts_with('.') {
            return Some(SkipReason::Hidden);
        }

        self.exclude_patterns
            .iter()
            .find(|pattern| pattern.matches(file_name))
            .map(|pattern| SkipReason::Excluded(pattern.as_str().to_string()))
    }
}

/// Options for a single organize run.
#[derive(Debug, Clone, Default)]
pub struct OrganizeOptions {
    /// Plan everything but create no folders and move nothing.
    pub dry_run: bool,
    /// File selection rules.
    pub filter: ScanFilter,
}

impl OrganizeOptions {
    /// Builds options from the raw exclude patterns given on the command line.
    pub fn new(dry_run: bool, exclude: &[String]) -> Result<Self, FilterError> {
        Ok(Self {
            dry_run,
            filter: ScanFilter::new(exclude)?,
        })
    }
}
