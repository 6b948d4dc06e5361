//! File discovery and single-file selection
//!
//! [`FileDiscovery`] lists the entries of one directory (no recursion) through
//! a lazy iterator. Every call to [`FileDiscovery::entries`] reads the
//! directory again, so the listing is restartable and never cached.
//!
//! A missing folder is not an error: it is created and the listing is empty.

use crate::error::{ErrorKind, Result};
use crate::paths::ensure_path;
use crate::sink::ErrorSink;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A leading dot followed by a letter.
static HIDDEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\.[A-Za-z]").expect("hidden-file pattern is valid"));

pub fn is_hidden(name: &str) -> bool {
    HIDDEN_PATTERN.is_match(name)
}

/// Options for a directory listing
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Skip names matching `^\.[A-Za-z]`
    pub ignore_hidden: bool,
    pub include_files: bool,
    pub include_folders: bool,
    /// Substrings that must all appear in the entry name (case-insensitive)
    pub conditions: Vec<String>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            ignore_hidden: true,
            include_files: true,
            include_folders: false,
            conditions: Vec::new(),
        }
    }
}

impl DiscoveryOptions {
    pub fn with_conditions<S: AsRef<str>>(mut self, conditions: &[S]) -> Self {
        self.conditions = conditions.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }
}

#[derive(Debug, Clone)]
struct EntryFilter {
    ignore_hidden: bool,
    include_files: bool,
    include_folders: bool,
    conditions: Vec<String>,
}

impl EntryFilter {
    fn new(options: &DiscoveryOptions) -> Self {
        Self {
            ignore_hidden: options.ignore_hidden,
            include_files: options.include_files,
            include_folders: options.include_folders,
            conditions: options.conditions.iter().map(|c| c.to_lowercase()).collect(),
        }
    }

    fn accepts(&self, name: &str, path: &Path) -> bool {
        if self.ignore_hidden && is_hidden(name) {
            return false;
        }

        let lowered = name.to_lowercase();
        if !self.conditions.iter().all(|c| lowered.contains(c.as_str())) {
            return false;
        }

        (self.include_files && path.is_file()) || (self.include_folders && path.is_dir())
    }
}

/// Filtered listing of a single directory.
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    folder: String,
    options: DiscoveryOptions,
}

impl FileDiscovery {
    pub fn new(folder: impl Into<String>, options: DiscoveryOptions) -> Self {
        Self {
            folder: folder.into(),
            options,
        }
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Start a fresh pass over the directory.
    ///
    /// Creates the folder (and its parents) when it does not exist yet, in
    /// which case the listing is empty.
    pub fn entries(&self) -> Result<Entries> {
        let folder = Path::new(&self.folder);
        let filter = EntryFilter::new(&self.options);

        if !folder.exists() {
            let created = ensure_path(&self.folder)?;
            info!(folder = %self.folder, created, "Discovery folder was missing, created it");
            return Ok(Entries {
                read_dir: None,
                folder: folder.to_path_buf(),
                filter,
            });
        }

        Ok(Entries {
            read_dir: Some(fs::read_dir(folder)?),
            folder: folder.to_path_buf(),
            filter,
        })
    }

    /// Collect one full pass.
    pub fn list(&self) -> Result<Vec<String>> {
        Ok(self.entries()?.collect())
    }
}

/// Lazy iterator over accepted entry names, in directory order.
#[derive(Debug)]
pub struct Entries {
    read_dir: Option<fs::ReadDir>,
    folder: PathBuf,
    filter: EntryFilter,
}

impl Iterator for Entries {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let read_dir = self.read_dir.as_mut()?;
        for entry in read_dir.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(folder = %self.folder.display(), error = %err, "Skipping unreadable entry");
                    continue;
                }
            };
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    debug!(name = ?raw, "Skipping entry with non UTF-8 name");
                    continue;
                }
            };
            if self.filter.accepts(&name, &entry.path()) {
                return Some(name);
            }
        }
        None
    }
}

/// Return the one file in `folder` whose name contains every condition.
///
/// Zero or several matches are recorded as `SelectionError` and yield `None`;
/// callers must not use the result as a path in that case.
pub fn select_one<S: AsRef<str>>(
    folder: &str,
    conditions: &[S],
    sink: &mut ErrorSink,
) -> Result<Option<String>> {
    let options = DiscoveryOptions::default().with_conditions(conditions);
    let mut matches = FileDiscovery::new(folder, options).list()?;
    let joined = conditions
        .iter()
        .map(|c| c.as_ref())
        .collect::<Vec<&str>>()
        .join("_");

    match matches.len() {
        0 => {
            sink.record(
                ErrorKind::SelectionError,
                format!("no file matched the given conditions: {}", joined),
            );
            Ok(None)
        }
        1 => Ok(matches.pop()),
        n => {
            debug!(folder = %folder, candidates = ?matches, "Ambiguous selection");
            sink.record(
                ErrorKind::SelectionError,
                format!("more than one file matched: {} files for {}", n, joined),
            );
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn folder_with(names: &[&str]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for name in names {
            File::create(temp_dir.path().join(name)).unwrap();
        }
        temp_dir
    }

    fn folder_str(dir: &TempDir) -> String {
        dir.path().to_string_lossy().to_string()
    }

    fn sorted(mut names: Vec<String>) -> Vec<String> {
        names.sort();
        names
    }

    #[test]
    fn hidden_pattern_needs_a_letter() {
        assert!(is_hidden(".hidden"));
        assert!(is_hidden(".Env"));
        assert!(!is_hidden(".1config"));
        assert!(!is_hidden("..."));
        assert!(!is_hidden("a.txt"));
    }

    #[test]
    fn default_listing_skips_hidden_files() {
        let dir = folder_with(&[".hidden", "a.txt", "b.txt"]);
        let discovery = FileDiscovery::new(folder_str(&dir), DiscoveryOptions::default());

        assert_eq!(sorted(discovery.list().unwrap()), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn hidden_files_listed_when_not_ignored() {
        let dir = folder_with(&[".hidden", "a.txt"]);
        let options = DiscoveryOptions {
            ignore_hidden: false,
            ..DiscoveryOptions::default()
        };

        let names = FileDiscovery::new(folder_str(&dir), options).list().unwrap();
        assert_eq!(sorted(names), vec![".hidden", "a.txt"]);
    }

    #[test]
    fn conditions_are_case_insensitive_and_all_required() {
        let dir = folder_with(&["North-2024-Orders.csv", "north-2023-orders.csv", "south-2024.csv"]);
        let options = DiscoveryOptions::default().with_conditions(&["NORTH", "2024"]);

        let names = FileDiscovery::new(folder_str(&dir), options).list().unwrap();
        assert_eq!(names, vec!["North-2024-Orders.csv"]);
    }

    #[test]
    fn kind_filters_combine_with_or() {
        let dir = folder_with(&["a.txt"]);
        fs::create_dir(dir.path().join("sub")).unwrap();

        let files_only = FileDiscovery::new(folder_str(&dir), DiscoveryOptions::default());
        assert_eq!(files_only.list().unwrap(), vec!["a.txt"]);

        let folders_only = DiscoveryOptions {
            include_files: false,
            include_folders: true,
            ..DiscoveryOptions::default()
        };
        assert_eq!(
            FileDiscovery::new(folder_str(&dir), folders_only).list().unwrap(),
            vec!["sub"]
        );

        let both = DiscoveryOptions {
            include_folders: true,
            ..DiscoveryOptions::default()
        };
        assert_eq!(
            sorted(FileDiscovery::new(folder_str(&dir), both).list().unwrap()),
            vec!["a.txt", "sub"]
        );

        let neither = DiscoveryOptions {
            include_files: false,
            ..DiscoveryOptions::default()
        };
        assert!(FileDiscovery::new(folder_str(&dir), neither).list().unwrap().is_empty());
    }

    #[test]
    fn missing_folder_is_created_and_empty() {
        let temp_dir = TempDir::new().unwrap();
        let folder = format!("{}/data/incoming", temp_dir.path().display());

        let names = FileDiscovery::new(folder.clone(), DiscoveryOptions::default())
            .list()
            .unwrap();

        assert!(names.is_empty());
        assert!(Path::new(&folder).is_dir());
    }

    #[test]
    fn listing_is_restartable_and_uncached() {
        let dir = folder_with(&["a.txt"]);
        let discovery = FileDiscovery::new(folder_str(&dir), DiscoveryOptions::default());

        assert_eq!(discovery.list().unwrap(), vec!["a.txt"]);
        File::create(dir.path().join("b.txt")).unwrap();
        assert_eq!(sorted(discovery.list().unwrap()), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn select_one_with_several_matches_records_and_returns_none() {
        let dir = folder_with(&[".hidden", "a.txt", "b.txt"]);
        let mut sink = ErrorSink::default();

        let selected = select_one(&folder_str(&dir), &[] as &[&str], &mut sink).unwrap();

        assert_eq!(selected, None);
        assert_eq!(sink.errors().len(), 1);
        assert_eq!(sink.errors()[0].kind, ErrorKind::SelectionError);
        assert!(sink.errors()[0].message.starts_with("more than one file matched"));
    }

    #[test]
    fn select_one_with_single_match() {
        let dir = folder_with(&[".hidden", "a.txt", "b.txt"]);
        let mut sink = ErrorSink::default();

        let selected = select_one(&folder_str(&dir), &["a"], &mut sink).unwrap();

        assert_eq!(selected.as_deref(), Some("a.txt"));
        assert!(sink.is_empty());
    }

    #[test]
    fn select_one_without_match_records_conditions() {
        let dir = folder_with(&["a.txt"]);
        let mut sink = ErrorSink::default();

        let selected = select_one(&folder_str(&dir), &["orders", "2024"], &mut sink).unwrap();

        assert_eq!(selected, None);
        assert_eq!(
            sink.errors()[0].message,
            "no file matched the given conditions: orders_2024"
        );
    }
}
