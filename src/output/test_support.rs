use std::path::Path;

use chrono::Utc;

use crate::fixer::{FailedEntry, FixReport, FixedEntry};
use crate::priority::{PrioritizedResult, Prioritizer};
use crate::rules::{RuleId, Severity, Violation, ViolationContext};
use crate::scanner::ScanResult;
use crate::verifier::{Rollback, VerifyReport};

pub fn sample_violation(rule: RuleId, severity: Severity, line: usize) -> Violation {
    Violation::new(rule, severity, Path::new("src/Account.cls"), line, 1, "test finding")
        .with_context(ViolationContext {
            snippet: "insert acc;".to_string(),
            ..ViolationContext::default()
        })
}

pub fn sample_scan() -> ScanResult {
    ScanResult {
        files_scanned: 2,
        violations: vec![
            sample_violation(RuleId::CrudViolation, Severity::Critical, 10),
            sample_violation(RuleId::DebugStatement, Severity::Moderate, 12),
            sample_violation(RuleId::TrailingWhitespace, Severity::Low, 14),
        ],
        warnings: Vec::new(),
        scanned_at: Utc::now(),
    }
}

pub fn sample_prioritized(scan: &ScanResult) -> PrioritizedResult {
    Prioritizer::default().prioritize(scan)
}

pub fn sample_fix_report() -> FixReport {
    let mut report = FixReport::default();
    report.fixed.push(FixedEntry {
        violation: sample_violation(RuleId::DebugStatement, Severity::Moderate, 12),
        description: "commented out debug statement".to_string(),
    });
    report.failed.push(FailedEntry {
        violation: sample_violation(RuleId::CrudViolation, Severity::Critical, 10),
        reason: "cannot determine target sObject type - manual fix required".to_string(),
    });
    report
        .updated_files
        .push(Path::new("src/Account.cls").to_path_buf());
    report
}

pub fn sample_verify_report() -> VerifyReport {
    let mut report = VerifyReport::default();
    report.verified.push(FixedEntry {
        violation: sample_violation(RuleId::DebugStatement, Severity::Moderate, 12),
        description: "commented out debug statement".to_string(),
    });
    report.rollbacks.push(Rollback {
        file_path: Path::new("src/Broken.cls").to_path_buf(),
        reason: "fix introduced 2 new violation(s)".to_string(),
        regression_count: 2,
    });
    report
}
