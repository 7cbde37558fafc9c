mod filter;

pub use filter::{FileFilter, GlobFilter};

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::Result;
use crate::rules::{RuleId, RuleRegistry, Severity, Violation};

/// Aggregated outcome of scanning a directory tree.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub files_scanned: usize,
    pub violations: Vec<Violation>,
    /// Non-fatal problems encountered while scanning (unreadable files).
    pub warnings: Vec<String>,
    pub scanned_at: DateTime<Utc>,
}

impl ScanResult {
    #[must_use]
    pub fn total_violations(&self) -> usize {
        self.violations.len()
    }

    /// Violations grouped by file, in scan order.
    #[must_use]
    pub fn by_file(&self) -> IndexMap<&Path, Vec<&Violation>> {
        let mut map: IndexMap<&Path, Vec<&Violation>> = IndexMap::new();
        for v in &self.violations {
            map.entry(v.file_path.as_path()).or_default().push(v);
        }
        map
    }

    /// Violations grouped by rule.
    #[must_use]
    pub fn by_rule(&self) -> IndexMap<RuleId, Vec<&Violation>> {
        let mut map: IndexMap<RuleId, Vec<&Violation>> = IndexMap::new();
        for v in &self.violations {
            map.entry(v.rule).or_default().push(v);
        }
        map
    }

    /// Violations grouped by severity.
    #[must_use]
    pub fn by_severity(&self) -> IndexMap<Severity, Vec<&Violation>> {
        let mut map: IndexMap<Severity, Vec<&Violation>> = IndexMap::new();
        for v in &self.violations {
            map.entry(v.severity).or_default().push(v);
        }
        map
    }

    /// Violations belonging to one file.
    #[must_use]
    pub fn violations_for(&self, path: &Path) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.file_path == path)
            .collect()
    }
}

/// Whether a file is test code: filename stem ending in `test`/`tests`,
/// or an `@IsTest` annotation anywhere in the content.
#[must_use]
pub fn is_test_code(path: &Path, content: &str) -> bool {
    let stem_is_test = path
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| {
            let lower = stem.to_lowercase();
            lower.ends_with("test") || lower.ends_with("tests")
        });

    stem_is_test || content.to_lowercase().contains("@istest")
}

/// Walks a directory tree and applies every registered rule to every
/// eligible file.
///
/// Stateless between scans: each call re-reads the tree, so a second
/// `scan` observes any file modifications made since the first.
pub struct ApexScanner<F: FileFilter> {
    registry: RuleRegistry,
    filter: F,
    include_test_code: bool,
    use_gitignore: bool,
}

impl<F: FileFilter + Sync> ApexScanner<F> {
    #[must_use]
    pub const fn new(registry: RuleRegistry, filter: F) -> Self {
        Self {
            registry,
            filter,
            include_test_code: true,
            use_gitignore: false,
        }
    }

    #[must_use]
    pub const fn with_test_code(mut self, include: bool) -> Self {
        self.include_test_code = include;
        self
    }

    #[must_use]
    pub const fn with_gitignore(mut self, use_gitignore: bool) -> Self {
        self.use_gitignore = use_gitignore;
        self
    }

    /// Scan `root` recursively and aggregate all violations.
    ///
    /// Unreadable files are skipped with a warning, never fatal. Per-file
    /// work runs in parallel; results are sorted by (file, line, column)
    /// so output is deterministic.
    ///
    /// # Errors
    /// Returns an error only if the root directory itself cannot be read.
    pub fn scan(&self, root: &Path) -> Result<ScanResult> {
        let files = self.collect_files(root);

        let outcomes: Vec<FileOutcome> = files
            .par_iter()
            .map(|path| self.scan_file(path))
            .collect();

        let mut violations = Vec::new();
        let mut warnings = Vec::new();
        let mut files_scanned = 0;

        for outcome in outcomes {
            match outcome {
                FileOutcome::Scanned(vs) => {
                    files_scanned += 1;
                    violations.extend(vs);
                }
                FileOutcome::SkippedTestCode => {}
                FileOutcome::Unreadable(warning) => warnings.push(warning),
            }
        }

        violations.sort_by(|a, b| {
            (&a.file_path, a.line, a.column, a.rule.as_str())
                .cmp(&(&b.file_path, b.line, b.column, b.rule.as_str()))
        });

        Ok(ScanResult {
            files_scanned,
            violations,
            warnings,
            scanned_at: Utc::now(),
        })
    }

    fn collect_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = if self.use_gitignore {
            self.collect_with_gitignore(root)
        } else {
            self.collect_with_walkdir(root)
        };
        files.sort();
        files
    }

    fn collect_with_walkdir(&self, root: &Path) -> Vec<PathBuf> {
        WalkDir::new(root)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file() && self.filter.should_include(e.path()))
            .map(walkdir::DirEntry::into_path)
            .collect()
    }

    fn collect_with_gitignore(&self, root: &Path) -> Vec<PathBuf> {
        use ignore::WalkBuilder;

        WalkBuilder::new(root)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .require_git(false)
            .hidden(false)
            .parents(false)
            .build()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
            .filter(|e| self.filter.should_include(e.path()))
            .map(ignore::DirEntry::into_path)
            .collect()
    }

    fn scan_file(&self, path: &Path) -> FileOutcome {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                return FileOutcome::Unreadable(format!(
                    "Skipping unreadable file {}: {e}",
                    path.display()
                ));
            }
        };

        let test_code = is_test_code(path, &content);
        if test_code && !self.include_test_code {
            return FileOutcome::SkippedTestCode;
        }

        let mut violations = Vec::new();
        for rule in self.registry.rules() {
            violations.extend(rule.check(path, &content));
        }

        for v in &mut violations {
            v.is_test_code = test_code;
        }

        FileOutcome::Scanned(violations)
    }
}

enum FileOutcome {
    Scanned(Vec<Violation>),
    SkippedTestCode,
    Unreadable(String),
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
