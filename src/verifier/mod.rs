use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::fixer::{BackupPolicy, FixReport, FixedEntry, backup, content_hash};
use crate::rules::Violation;
use crate::scanner::{ApexScanner, FileFilter, ScanResult};

/// How far a violation's line may drift from its pre-fix position and
/// still count as the same issue. Fixes insert lines, shifting
/// everything below them.
pub const LINE_DRIFT_TOLERANCE: usize = 5;

/// One file restored from its backup after the fix set regressed it.
#[derive(Debug, Clone, Serialize)]
pub struct Rollback {
    pub file_path: PathBuf,
    pub reason: String,
    pub regression_count: usize,
}

/// Outcome of verifying a fix run against the pre-fix baseline.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerifyReport {
    /// Fixes whose violation no longer appears in the re-scan.
    pub verified: Vec<FixedEntry>,
    /// Violations present after fixing but absent before.
    pub new_violations: Vec<Violation>,
    pub rollbacks: Vec<Rollback>,
    /// Non-fatal problems (best-effort rollback failures).
    pub warnings: Vec<String>,
}

/// Re-scans the tree after fixing, diffs against the pre-fix baseline,
/// and rolls back any file whose fix set introduced regressions.
pub struct Verifier<F: FileFilter> {
    scanner: ApexScanner<F>,
    root: PathBuf,
    backup_policy: BackupPolicy,
}

impl<F: FileFilter + Sync> Verifier<F> {
    /// The scanner must be configured identically to the one that
    /// produced the baseline, so the diff compares like with like.
    #[must_use]
    pub const fn new(scanner: ApexScanner<F>, root: PathBuf, backup_policy: BackupPolicy) -> Self {
        Self {
            scanner,
            root,
            backup_policy,
        }
    }

    /// Verify every applied fix and roll back regressed files.
    ///
    /// # Errors
    /// Returns an error only if the re-scan itself fails; per-file
    /// rollback problems are surfaced as warnings.
    pub fn verify(&self, baseline: &ScanResult, fixes: &FixReport) -> Result<VerifyReport> {
        if fixes.updated_files.is_empty() {
            return Ok(VerifyReport::default());
        }

        // Fresh scan; never reuse stale results.
        let rescan = self.scanner.scan(&self.root)?;

        let mut report = VerifyReport::default();

        for entry in &fixes.fixed {
            let still_present = rescan
                .violations
                .iter()
                .any(|v| v.matches_within(&entry.violation, LINE_DRIFT_TOLERANCE));
            if !still_present {
                report.verified.push(entry.clone());
            }
        }

        for path in &fixes.updated_files {
            let before = baseline.violations_for(path);
            let regressions: Vec<Violation> = rescan
                .violations_for(path)
                .into_iter()
                .filter(|after| {
                    !before
                        .iter()
                        .any(|b| b.matches_within(after, LINE_DRIFT_TOLERANCE))
                })
                .cloned()
                .collect();

            if regressions.is_empty() {
                if self.backup_policy == BackupPolicy::CleanOnSuccess
                    && let Err(e) = backup::remove_backup(path)
                {
                    report
                        .warnings
                        .push(format!("could not remove backup of {}: {e}", path.display()));
                }
                continue;
            }

            let count = regressions.len();
            report.new_violations.extend(regressions);
            self.roll_back(path, count, fixes, &mut report);
        }

        Ok(report)
    }

    /// Best-effort restore: on failure the file keeps its (possibly
    /// regressed) fixed content.
    fn roll_back(&self, path: &Path, count: usize, fixes: &FixReport, report: &mut VerifyReport) {
        match backup::restore_backup(path) {
            Ok(()) => {
                if let Some(expected) = fixes.pre_fix_hashes.get(path)
                    && let Ok(restored) = std::fs::read_to_string(path)
                    && content_hash(&restored) != *expected
                {
                    report.warnings.push(format!(
                        "restored {} does not match its pre-fix content",
                        path.display()
                    ));
                }

                report.rollbacks.push(Rollback {
                    file_path: path.to_path_buf(),
                    reason: format!("fix introduced {count} new violation(s)"),
                    regression_count: count,
                });
            }
            Err(e) => {
                report.warnings.push(format!(
                    "rollback of {} failed; file left in fixed state: {e}",
                    path.display()
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
