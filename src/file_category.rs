//! Extension-based file categorization.
//!
//! A [`CategoryTable`] is an ordered list of named categories, each owning a set of
//! lowercase extensions (with the leading dot). Lookups walk the table in order and
//! the first category containing the extension wins; anything unmatched lands in the
//! fallback category.
//!
//! # Examples
//!
//! ```
//! use sortdir::file_category::CategoryTable;
//!
//! let table = CategoryTable::default();
//! assert_eq!(table.classify("photo.JPG"), "Images");
//! assert_eq!(table.classify("archive.tar.gz"), "Archives");
//! assert_eq!(table.classify("noext"), "Other");
//! ```

use std::collections::HashSet;

/// Name of the catch-all category used by the standard table.
pub const OTHER: &str = "Other";

/// A named bucket of file extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    extensions: HashSet<String>,
}

impl Category {
    /// Returns the category name, which is also its folder name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if `extension` (already normalized) belongs to this category.
    pub fn contains(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }

    /// Number of extensions in this category.
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

/// Ordered mapping from category name to extension set.
///
/// Built once, then shared read-only for the whole run. The fallback category is
/// always present and is chosen whenever no other category claims an extension.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<Category>,
    fallback: String,
}

impl CategoryTable {
    /// Creates the standard table.
    pub fn new() -> Self {
        Self::empty(OTHER)
            .with_category(
                "Images",
                &[
                    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".svg", ".webp", ".heic",
                ],
            )
            .with_category(
                "Documents",
                &[
                    ".pdf", ".docx", ".doc", ".txt", ".odt", ".rtf", ".csv", ".xls", ".xlsx",
                    ".ppt", ".pptx", ".md",
                ],
            )
            .with_category("Audio", &[".mp3", ".wav", ".aac", ".flac", ".ogg", ".m4a"])
            .with_category(
                "Video",
                &[".mp4", ".mov", ".avi", ".mkv", ".wmv", ".flv", ".webm"],
            )
            .with_category("Archives", &[".zip", ".tar", ".gz", ".rar", ".7z"])
            .with_category(
                "Scripts",
                &[
                    ".py", ".js", ".sh", ".bat", ".java", ".cpp", ".c", ".html", ".css",
                ],
            )
            .with_category(
                "Executables & Installers",
                &[".exe", ".msi", ".dmg", ".app"],
            )
    }

    /// Creates a table holding only the fallback category.
    pub fn empty(fallback: &str) -> Self {
        Self {
            categories: vec![Category {
                name: fallback.to_string(),
                extensions: HashSet::new(),
            }],
            fallback: fallback.to_string(),
        }
    }

    /// Appends a category, keeping the fallback last.
    ///
    /// Extensions are normalized: lowercased, with a leading dot added when missing.
    /// Adding a name that already exists merges the extensions into it.
    ///
    /// ```
    /// use sortdir::file_category::CategoryTable;
    ///
    /// let table = CategoryTable::empty("Misc").with_category("Books", &["EPUB", ".mobi"]);
    /// assert_eq!(table.classify("novel.epub"), "Books");
    /// assert_eq!(table.classify("novel.pdf"), "Misc");
    /// ```
    pub fn with_category(mut self, name: &str, extensions: &[&str]) -> Self {
        let normalized = extensions.iter().map(|ext| normalize_extension(ext));

        if let Some(existing) = self.categories.iter_mut().find(|c| c.name == name) {
            existing.extensions.extend(normalized);
            return self;
        }

        let category = Category {
            name: name.to_string(),
            extensions: normalized.collect(),
        };
        // The fallback entry stays at the end of the table.
        let at = self.categories.len().saturating_sub(1);
        self.categories.insert(at, category);
        self
    }

    /// Name of the catch-all category.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Categories in lookup order, fallback last.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Returns the first category, in table order, that claims `extension`.
    pub fn category_for_extension(&self, extension: &str) -> Option<&str> {
        if extension.is_empty() {
            return None;
        }
        let extension = normalize_extension(extension);
        self.categories
            .iter()
            .find(|c| c.contains(&extension))
            .map(|c| c.name())
    }

    /// Determines the category folder for a file name.
    ///
    /// Pure: the same name always yields the same category.
    pub fn classify(&self, file_name: &str) -> &str {
        self.category_for_extension(&extension_of(file_name))
            .unwrap_or(self.fallback.as_str())
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

/// Splits a file name into stem and extension at the last dot.
///
/// Leading dots belong to the stem, so `.bashrc` has no extension. The extension
/// keeps its dot and original case.
///
/// ```
/// use sortdir::file_category::split_name;
///
/// assert_eq!(split_name("archive.tar.gz"), ("archive.tar", ".gz"));
/// assert_eq!(split_name("README"), ("README", ""));
/// assert_eq!(split_name(".bashrc"), (".bashrc", ""));
/// ```
pub fn split_name(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(idx) if file_name[..idx].chars().any(|c| c != '.') => file_name.split_at(idx),
        _ => (file_name, ""),
    }
}

/// Returns the normalized extension of a file name: lowercase, with the dot.
///
/// Empty when the name has no dot or nothing follows the last dot.
pub fn extension_of(file_name: &str) -> String {
    let (_, ext) = split_name(file_name);
    if ext.len() <= 1 {
        String::new()
    } else {
        ext.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_order() {
        let table = CategoryTable::default();
        let names: Vec<_> = table.categories().iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec![
                "Images",
                "Documents",
                "Audio",
                "Video",
                "Archives",
                "Scripts",
                "Executables & Installers",
                "Other",
            ]
        );
        assert!(table.categories().last().unwrap().is_empty());
    }

    #[test]
    fn test_classify_case_insensitive() {
        let table = CategoryTable::default();
        assert_eq!(table.classify("photo.JPG"), "Images");
        assert_eq!(table.classify("Photo.Jpeg"), "Images");
        assert_eq!(table.classify("notes.TXT"), "Documents");
    }

    #[test]
    fn test_classify_uses_last_extension() {
        let table = CategoryTable::default();
        assert_eq!(table.classify("archive.tar.gz"), "Archives");
        assert_eq!(table.classify("backup.txt.zip"), "Archives");
    }

    #[test]
    fn test_classify_defaults_to_other() {
        let table = CategoryTable::default();
        assert_eq!(table.classify("noext"), "Other");
        assert_eq!(table.classify("weird.xyz"), "Other");
        assert_eq!(table.classify("trailing."), "Other");
    }

    #[test]
    fn test_category_names_with_spaces_and_ampersand() {
        let table = CategoryTable::default();
        assert_eq!(table.classify("setup.EXE"), "Executables & Installers");
    }

    #[test]
    fn test_first_category_wins_on_overlap() {
        let table = CategoryTable::empty("Other")
            .with_category("First", &["dat"])
            .with_category("Second", &[".dat", ".bin"]);
        assert_eq!(table.classify("x.dat"), "First");
        assert_eq!(table.classify("x.bin"), "Second");
    }

    #[test]
    fn test_with_category_merges_existing() {
        let table = CategoryTable::empty("Other")
            .with_category("Data", &["csv"])
            .with_category("Data", &["tsv"]);
        assert_eq!(table.categories().len(), 2);
        assert_eq!(table.classify("a.tsv"), "Data");
        assert_eq!(table.classify("a.csv"), "Data");
    }

    #[test]
    fn test_fallback_stays_last() {
        let table = CategoryTable::empty("Misc").with_category("Text", &["txt"]);
        assert_eq!(table.fallback(), "Misc");
        assert_eq!(table.categories().last().unwrap().name(), "Misc");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("photo.JPG"), ".jpg");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("noext"), "");
        assert_eq!(extension_of("trailing."), "");
        assert_eq!(extension_of(".hidden"), "");
        assert_eq!(extension_of(".hidden.txt"), ".txt");
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("notes.txt"), ("notes", ".txt"));
        assert_eq!(split_name("noext"), ("noext", ""));
        assert_eq!(split_name("trailing."), ("trailing", "."));
        assert_eq!(split_name("..double"), ("..double", ""));
    }

    #[test]
    fn test_category_for_extension_empty() {
        let table = CategoryTable::default();
        assert_eq!(table.category_for_extension(""), None);
        assert_eq!(table.category_for_extension("PNG"), Some("Images"));
    }
}
