use std::path::Path;

use chrono::Utc;

use super::*;
use crate::rules::Severity;
use crate::scanner::ScanResult;

fn violation(rule: RuleId, path: &str, line: usize) -> Violation {
    let severity = match rule {
        RuleId::CrudViolation | RuleId::SharingViolation | RuleId::SoqlInjection => {
            Severity::Critical
        }
        RuleId::DebugStatement | RuleId::CognitiveComplexity => Severity::Moderate,
        RuleId::TrailingWhitespace => Severity::Low,
    };
    Violation::new(rule, severity, Path::new(path), line, 1, "test")
}

fn scan_result(violations: Vec<Violation>) -> ScanResult {
    ScanResult {
        files_scanned: 3,
        violations,
        warnings: Vec::new(),
        scanned_at: Utc::now(),
    }
}

fn mixed_scan() -> ScanResult {
    scan_result(vec![
        violation(RuleId::CrudViolation, "A.cls", 10),
        violation(RuleId::CrudViolation, "A.cls", 20),
        violation(RuleId::CrudViolation, "B.cls", 5),
        violation(RuleId::SoqlInjection, "B.cls", 9),
        violation(RuleId::CognitiveComplexity, "A.cls", 1),
        violation(RuleId::TrailingWhitespace, "A.cls", 3),
        violation(RuleId::TrailingWhitespace, "A.cls", 4),
        violation(RuleId::TrailingWhitespace, "C.cls", 7),
    ])
}

#[test]
fn partition_is_total_and_disjoint() {
    let scan = mixed_scan();
    let result = Prioritizer::default().prioritize(&scan);

    let grouped: usize = result
        .tiers
        .values()
        .flat_map(|t| &t.rule_groups)
        .map(|g| g.occurrences)
        .sum();
    assert_eq!(grouped, scan.total_violations());

    // Every rule appears in exactly one tier.
    let mut seen = std::collections::HashSet::new();
    for tier in result.tiers.values() {
        for group in &tier.rule_groups {
            assert!(seen.insert(group.rule), "rule {} in two tiers", group.rule);
        }
    }
}

#[test]
fn summary_totals_equal_group_totals() {
    let scan = mixed_scan();
    let result = Prioritizer::default().prioritize(&scan);

    let findings: usize = result
        .tiers
        .values()
        .flat_map(|t| &t.rule_groups)
        .map(|g| g.file_count)
        .sum();
    let occurrences: usize = result
        .tiers
        .values()
        .flat_map(|t| &t.rule_groups)
        .map(|g| g.occurrences)
        .sum();

    assert_eq!(result.summary.total_findings, findings);
    assert_eq!(result.summary.total_occurrences, occurrences);

    for (tier, tier_summary) in &result.summary.tiers {
        let report = &result.tiers[tier];
        let tier_findings: usize = report.rule_groups.iter().map(|g| g.file_count).sum();
        let tier_occurrences: usize = report.rule_groups.iter().map(|g| g.occurrences).sum();
        assert_eq!(tier_summary.findings, tier_findings);
        assert_eq!(tier_summary.occurrences, tier_occurrences);
    }
}

#[test]
fn findings_never_exceed_occurrences() {
    let result = Prioritizer::default().prioritize(&mixed_scan());

    for tier in result.tiers.values() {
        for group in &tier.rule_groups {
            assert!(group.file_count <= group.occurrences);
        }
    }
}

#[test]
fn groups_collapse_occurrences_per_file() {
    let result = Prioritizer::default().prioritize(&mixed_scan());

    let critical = &result.tiers[&Tier::Critical];
    let crud = critical
        .rule_groups
        .iter()
        .find(|g| g.rule == RuleId::CrudViolation)
        .expect("crud group present");

    assert_eq!(crud.occurrences, 3);
    assert_eq!(crud.file_count, 2, "two distinct files");
    assert_eq!(crud.files[0].occurrences, 2);
    assert_eq!(crud.files[1].occurrences, 1);
}

#[test]
fn sample_is_capped_at_five() {
    let violations = (1..=20)
        .map(|line| violation(RuleId::TrailingWhitespace, "Big.cls", line))
        .collect();
    let result = Prioritizer::default().prioritize(&scan_result(violations));

    let cleanup = &result.tiers[&Tier::Cleanup];
    let group = &cleanup.rule_groups[0];
    assert_eq!(group.occurrences, 20);
    assert_eq!(group.files[0].occurrences, 20);
    assert_eq!(group.files[0].sample.len(), 5);
    assert_eq!(group.files[0].sample[0].line, 1);
}

#[test]
fn every_rule_group_carries_guidance() {
    let result = Prioritizer::default().prioritize(&mixed_scan());

    for tier in result.tiers.values() {
        for group in &tier.rule_groups {
            assert!(!group.guidance.is_empty());
            assert_eq!(group.guidance, remediation_guidance(group.rule));
        }
    }
}

#[test]
fn empty_scan_produces_empty_tiers() {
    let result = Prioritizer::default().prioritize(&scan_result(Vec::new()));

    assert_eq!(result.summary.total_findings, 0);
    assert_eq!(result.summary.total_occurrences, 0);
    assert_eq!(result.tiers.len(), 3, "all tiers present even when empty");
    assert!(result.tiers.values().all(|t| t.rule_groups.is_empty()));
}

#[test]
fn tier_reports_carry_policy_metadata() {
    let result = Prioritizer::default().prioritize(&mixed_scan());

    let critical = &result.tiers[&Tier::Critical];
    assert_eq!(critical.fix_mode, FixMode::Conditional);
    assert!(!critical.rationale.is_empty());

    let cleanup = &result.tiers[&Tier::Cleanup];
    assert_eq!(cleanup.fix_mode, FixMode::Always);
}
