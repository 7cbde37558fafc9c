use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Result;
use crate::priority::PrioritizedResult;
use crate::rules::Violation;

use super::{AnalysisReport, OutputFormatter};

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput<'a> {
    scan: ScanSection<'a>,
    prioritized: &'a PrioritizedResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<FixSection<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verification: Option<VerifySection<'a>>,
}

#[derive(Serialize)]
struct ScanSection<'a> {
    files_scanned: usize,
    total_violations: usize,
    scanned_at: String,
    violations: &'a [Violation],
    violations_by_rule: IndexMap<String, usize>,
    violations_by_severity: IndexMap<String, usize>,
    warnings: &'a [String],
}

#[derive(Serialize)]
struct FixSection<'a> {
    fixed: Vec<FixEntryJson<'a>>,
    failed: Vec<FailEntryJson<'a>>,
    updated_files: Vec<String>,
}

#[derive(Serialize)]
struct FixEntryJson<'a> {
    violation: &'a Violation,
    description: &'a str,
}

#[derive(Serialize)]
struct FailEntryJson<'a> {
    violation: &'a Violation,
    reason: &'a str,
}

#[derive(Serialize)]
struct VerifySection<'a> {
    verified: usize,
    new_violations: &'a [Violation],
    rollbacks: Vec<RollbackJson<'a>>,
}

#[derive(Serialize)]
struct RollbackJson<'a> {
    file_path: String,
    reason: &'a str,
    regression_count: usize,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &AnalysisReport<'_>) -> Result<String> {
        let scan = report.scan;

        let mut violations_by_rule: IndexMap<String, usize> = IndexMap::new();
        for (rule, vs) in scan.by_rule() {
            violations_by_rule.insert(rule.as_str().to_string(), vs.len());
        }

        let mut violations_by_severity: IndexMap<String, usize> = IndexMap::new();
        for (severity, vs) in scan.by_severity() {
            violations_by_severity.insert(severity.as_str().to_string(), vs.len());
        }

        let fix = report.fix.map(|f| FixSection {
            fixed: f
                .fixed
                .iter()
                .map(|e| FixEntryJson {
                    violation: &e.violation,
                    description: &e.description,
                })
                .collect(),
            failed: f
                .failed
                .iter()
                .map(|e| FailEntryJson {
                    violation: &e.violation,
                    reason: &e.reason,
                })
                .collect(),
            updated_files: f
                .updated_files
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
        });

        let verification = report.verify.map(|v| VerifySection {
            verified: v.verified.len(),
            new_violations: &v.new_violations,
            rollbacks: v
                .rollbacks
                .iter()
                .map(|r| RollbackJson {
                    file_path: r.file_path.display().to_string(),
                    reason: &r.reason,
                    regression_count: r.regression_count,
                })
                .collect(),
        });

        let output = JsonOutput {
            scan: ScanSection {
                files_scanned: scan.files_scanned,
                total_violations: scan.total_violations(),
                scanned_at: scan.scanned_at.to_rfc3339(),
                violations: &scan.violations,
                violations_by_rule,
                violations_by_severity,
                warnings: &scan.warnings,
            },
            prioritized: report.prioritized,
            fix,
            verification,
        };

        Ok(serde_json::to_string_pretty(&output)?)
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
