pub mod backup;
mod strategies;

pub use backup::{BACKUP_SUFFIX, BackupPolicy, backup_path, content_hash};
pub use strategies::{FixOutcome, FixStrategy};

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use crate::priority::{Eligibility, TierPolicy};
use crate::rules::Violation;

/// A successfully applied fix.
#[derive(Debug, Clone, Serialize)]
pub struct FixedEntry {
    pub violation: Violation,
    pub description: String,
}

/// A fix that was attempted (or refused) with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct FailedEntry {
    pub violation: Violation,
    pub reason: String,
}

/// Outcome of a fix run across all candidate violations.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FixReport {
    pub fixed: Vec<FixedEntry>,
    pub failed: Vec<FailedEntry>,
    pub updated_files: Vec<PathBuf>,
    /// SHA-256 of each updated file's pre-fix content, keyed by path.
    /// Lets the verifier confirm a rollback restored the original bytes.
    pub pre_fix_hashes: IndexMap<PathBuf, String>,
    /// Non-fatal problems (backup failures) surfaced as data.
    pub warnings: Vec<String>,
}

impl FixReport {
    #[must_use]
    pub fn fixed_count(&self) -> usize {
        self.fixed.len()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

/// Orchestrates backup, ordered strategy application, and per-file
/// write-back.
///
/// Failure is isolated per file: an unreadable or unwritable file marks
/// its own violations failed and the run continues.
pub struct Fixer {
    policy: TierPolicy,
}

impl Default for Fixer {
    fn default() -> Self {
        Self::new(TierPolicy::default())
    }
}

impl Fixer {
    #[must_use]
    pub const fn new(policy: TierPolicy) -> Self {
        Self { policy }
    }

    /// Apply every eligible fix among `violations`, grouped per file.
    ///
    /// Violations that are not instance-fixable, or that sit in test
    /// code, are skipped silently; violations whose tier policy forbids
    /// fixing are recorded as failed with a "not eligible" reason.
    #[must_use]
    pub fn fix(&self, violations: &[Violation]) -> FixReport {
        let mut by_file: IndexMap<PathBuf, Vec<&Violation>> = IndexMap::new();
        for violation in violations {
            by_file
                .entry(violation.file_path.clone())
                .or_default()
                .push(violation);
        }

        let mut report = FixReport::default();

        for (path, file_violations) in by_file {
            if let Err(e) = self.fix_file(&path, &file_violations, &mut report) {
                for violation in file_violations {
                    report.failed.push(FailedEntry {
                        violation: (*violation).clone(),
                        reason: format!("file processing error: {e}"),
                    });
                }
            }
        }

        report
    }

    fn fix_file(
        &self,
        path: &Path,
        violations: &[&Violation],
        report: &mut FixReport,
    ) -> crate::Result<()> {
        // Nothing to do when no instance can even reach a strategy;
        // avoids creating backups for files that will not change.
        if !violations
            .iter()
            .any(|v| self.policy.eligibility(v) == Eligibility::Eligible)
        {
            self.record_policy_failures(violations, report);
            return Ok(());
        }

        // Backup failure is logged but non-fatal: fixing proceeds
        // without a safety net.
        if let Err(e) = backup::create_backup(path) {
            report.warnings.push(format!(
                "could not back up {}; fixing without a safety net: {e}",
                path.display()
            ));
        }

        let original = fs::read_to_string(path).map_err(|e| crate::ApexGuardError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut working = original.clone();

        // Bottom-up: a strategy may insert lines, which would invalidate
        // the line numbers of not-yet-processed violations below it.
        let mut ordered: Vec<&Violation> = violations.to_vec();
        ordered.sort_by(|a, b| b.line.cmp(&a.line));

        let mut applied_any = false;

        for violation in ordered {
            match self.policy.eligibility(violation) {
                Eligibility::NotFixable | Eligibility::TestCode => continue,
                Eligibility::PolicyExcluded => {
                    report.failed.push(FailedEntry {
                        violation: (*violation).clone(),
                        reason: "not eligible for automatic fixing".to_string(),
                    });
                    continue;
                }
                Eligibility::Eligible => {}
            }

            let Some(strategy) = FixStrategy::for_rule(violation.rule) else {
                continue;
            };

            match strategy.apply(&working, violation) {
                FixOutcome::Applied {
                    content,
                    description,
                } => {
                    if brace_balance(&content) != brace_balance(&working) {
                        report.failed.push(FailedEntry {
                            violation: (*violation).clone(),
                            reason: "rewrite would unbalance braces".to_string(),
                        });
                        continue;
                    }

                    working = content;
                    applied_any = true;
                    report.fixed.push(FixedEntry {
                        violation: (*violation).clone(),
                        description,
                    });
                }
                FixOutcome::Rejected { reason } => {
                    report.failed.push(FailedEntry {
                        violation: (*violation).clone(),
                        reason,
                    });
                }
            }
        }

        if applied_any {
            fs::write(path, &working).map_err(|e| crate::ApexGuardError::FileWrite {
                path: path.to_path_buf(),
                source: e,
            })?;
            report
                .pre_fix_hashes
                .insert(path.to_path_buf(), content_hash(&original));
            report.updated_files.push(path.to_path_buf());
        }

        Ok(())
    }

    fn record_policy_failures(&self, violations: &[&Violation], report: &mut FixReport) {
        for violation in violations {
            if self.policy.eligibility(violation) == Eligibility::PolicyExcluded {
                report.failed.push(FailedEntry {
                    violation: (*violation).clone(),
                    reason: "not eligible for automatic fixing".to_string(),
                });
            }
        }
    }
}

/// Net brace balance of a text; rewrites must preserve it.
fn brace_balance(content: &str) -> i64 {
    content.chars().fold(0i64, |acc, ch| match ch {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
