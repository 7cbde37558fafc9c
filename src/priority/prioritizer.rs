use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;

use crate::rules::{RuleId, Violation};
use crate::scanner::ScanResult;

use super::{FixMode, Tier, TierPolicy, remediation_guidance};

/// Number of member violations kept per file group for display.
const SAMPLE_CAP: usize = 5;

/// Violations of one rule within one file. One "finding" in report
/// terms, however many occurrences it holds.
#[derive(Debug, Clone, Serialize)]
pub struct FileGroup {
    pub path: PathBuf,
    pub occurrences: usize,
    /// First few member violations, capped for display.
    pub sample: Vec<Violation>,
}

/// All findings of one rule within one tier.
#[derive(Debug, Clone, Serialize)]
pub struct RuleGroup {
    pub rule: RuleId,
    pub guidance: &'static str,
    /// Raw instance count across all files.
    pub occurrences: usize,
    /// Number of distinct files affected.
    pub file_count: usize,
    pub files: Vec<FileGroup>,
}

/// One tier's worth of grouped findings.
#[derive(Debug, Clone, Serialize)]
pub struct TierReport {
    pub tier: Tier,
    pub rationale: &'static str,
    pub fix_mode: FixMode,
    pub rule_groups: Vec<RuleGroup>,
}

/// Per-tier counts for the summary, separating findings (rule x file
/// pairs) from occurrences (raw instances).
#[derive(Debug, Clone, Default, Serialize)]
pub struct TierSummary {
    pub findings: usize,
    pub occurrences: usize,
    /// Occurrences per rule within the tier.
    pub rules: IndexMap<RuleId, usize>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PrioritySummary {
    pub total_findings: usize,
    pub total_occurrences: usize,
    pub tiers: IndexMap<Tier, TierSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrioritizedResult {
    pub summary: PrioritySummary,
    pub tiers: IndexMap<Tier, TierReport>,
}

/// Classifies violations into tiers and groups them by rule and file
/// for noise reduction: a rule with thousands of occurrences across a
/// hundred files reports as a hundred findings, not thousands of line
/// items.
pub struct Prioritizer {
    policy: TierPolicy,
}

impl Default for Prioritizer {
    fn default() -> Self {
        Self::new(TierPolicy::default())
    }
}

impl Prioritizer {
    #[must_use]
    pub const fn new(policy: TierPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub const fn policy(&self) -> &TierPolicy {
        &self.policy
    }

    /// Partition, group, and summarize a scan result.
    ///
    /// Every input violation lands in exactly one tier and one rule
    /// group; summary totals equal the sum over tiers of group totals.
    #[must_use]
    pub fn prioritize(&self, scan: &ScanResult) -> PrioritizedResult {
        // tier -> rule -> file -> violations, insertion-ordered at every
        // level so reports are deterministic.
        let mut partitioned: IndexMap<Tier, IndexMap<RuleId, IndexMap<PathBuf, Vec<Violation>>>> =
            Tier::ALL.iter().map(|t| (*t, IndexMap::new())).collect();

        for violation in &scan.violations {
            let tier = self.policy.tier_of(violation.rule, violation.severity);
            partitioned
                .entry(tier)
                .or_default()
                .entry(violation.rule)
                .or_default()
                .entry(violation.file_path.clone())
                .or_default()
                .push(violation.clone());
        }

        let mut summary = PrioritySummary::default();
        let mut tiers = IndexMap::new();

        for (tier, by_rule) in partitioned {
            let mut tier_summary = TierSummary::default();
            let mut rule_groups = Vec::new();

            for (rule, by_file) in by_rule {
                let occurrences: usize = by_file.values().map(Vec::len).sum();
                let file_count = by_file.len();

                tier_summary.findings += file_count;
                tier_summary.occurrences += occurrences;
                tier_summary.rules.insert(rule, occurrences);

                let files = by_file
                    .into_iter()
                    .map(|(path, mut violations)| {
                        let occurrences = violations.len();
                        violations.truncate(SAMPLE_CAP);
                        FileGroup {
                            path,
                            occurrences,
                            sample: violations,
                        }
                    })
                    .collect();

                rule_groups.push(RuleGroup {
                    rule,
                    guidance: remediation_guidance(rule),
                    occurrences,
                    file_count,
                    files,
                });
            }

            summary.total_findings += tier_summary.findings;
            summary.total_occurrences += tier_summary.occurrences;
            summary.tiers.insert(tier, tier_summary);

            tiers.insert(
                tier,
                TierReport {
                    tier,
                    rationale: tier.rationale(),
                    fix_mode: self.policy.fix_mode(tier),
                    rule_groups,
                },
            );
        }

        PrioritizedResult { summary, tiers }
    }
}

#[cfg(test)]
#[path = "prioritizer_tests.rs"]
mod tests;
