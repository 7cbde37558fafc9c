mod guidance;
mod prioritizer;

pub use guidance::remediation_guidance;
pub use prioritizer::{
    FileGroup, PrioritizedResult, Prioritizer, PrioritySummary, RuleGroup, TierReport, TierSummary,
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::rules::{RuleId, Severity, Violation};

/// Fixed risk classification of rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tier {
    Critical,
    Important,
    Cleanup,
}

impl Tier {
    pub const ALL: [Self; 3] = [Self::Critical, Self::Important, Self::Cleanup];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Important => "Important",
            Self::Cleanup => "Cleanup",
        }
    }

    #[must_use]
    pub const fn rationale(self) -> &'static str {
        match self {
            Self::Critical => "Security and data-access issues that can expose records or bypass permissions",
            Self::Important => "Performance and maintainability issues that degrade the codebase over time",
            Self::Cleanup => "Style and hygiene issues that are safe to fix mechanically",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-tier auto-fix policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixMode {
    /// Tier members are never auto-fixed.
    Never,
    /// Tier members are auto-fixed only when the instance carries enough
    /// context to be fixed safely.
    Conditional,
    /// All fixable tier members are auto-fixed.
    Always,
}

impl FixMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Conditional => "conditional",
            Self::Always => "always",
        }
    }
}

/// Why a violation is, or is not, eligible for automatic fixing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    /// The instance lacks the context to be fixed (or the rule cannot fix).
    NotFixable,
    /// Test-code findings are reported but never auto-fixed.
    TestCode,
    /// The rule's tier forbids automatic fixing.
    PolicyExcluded,
}

/// Static rule-to-tier table plus the per-tier fix policy.
///
/// An explicit value handed to the prioritizer and fixer, never a
/// module-level singleton.
#[derive(Debug, Clone)]
pub struct TierPolicy {
    assignments: IndexMap<RuleId, Tier>,
    fix_modes: IndexMap<Tier, FixMode>,
}

impl Default for TierPolicy {
    fn default() -> Self {
        let mut assignments = IndexMap::new();
        assignments.insert(RuleId::CrudViolation, Tier::Critical);
        assignments.insert(RuleId::SharingViolation, Tier::Critical);
        assignments.insert(RuleId::SoqlInjection, Tier::Critical);
        assignments.insert(RuleId::CognitiveComplexity, Tier::Important);
        assignments.insert(RuleId::DebugStatement, Tier::Cleanup);
        assignments.insert(RuleId::TrailingWhitespace, Tier::Cleanup);

        let mut fix_modes = IndexMap::new();
        fix_modes.insert(Tier::Critical, FixMode::Conditional);
        fix_modes.insert(Tier::Important, FixMode::Never);
        fix_modes.insert(Tier::Cleanup, FixMode::Always);

        Self {
            assignments,
            fix_modes,
        }
    }
}

impl TierPolicy {
    #[must_use]
    pub fn with_fix_mode(mut self, tier: Tier, mode: FixMode) -> Self {
        self.fix_modes.insert(tier, mode);
        self
    }

    /// Tier of a rule. Unmapped rules fall back to their declared
    /// severity: Critical/High map to the Critical tier, Moderate to
    /// Important, everything else to Cleanup.
    #[must_use]
    pub fn tier_of(&self, rule: RuleId, severity: Severity) -> Tier {
        self.assignments.get(&rule).copied().unwrap_or(match severity {
            Severity::Critical | Severity::High => Tier::Critical,
            Severity::Moderate => Tier::Important,
            Severity::Low | Severity::Info => Tier::Cleanup,
        })
    }

    #[must_use]
    pub fn fix_mode(&self, tier: Tier) -> FixMode {
        self.fix_modes.get(&tier).copied().unwrap_or(FixMode::Never)
    }

    /// Decide whether a violation may be handed to a fix strategy.
    ///
    /// Instance-level fixability and the test-code flag are checked
    /// before the tier gate, so a non-fixable instance in an
    /// always-fixable tier is a skip, not a policy refusal.
    #[must_use]
    pub fn eligibility(&self, violation: &Violation) -> Eligibility {
        if violation.is_test_code {
            return Eligibility::TestCode;
        }
        if !violation.fixable || !violation.rule.supports_autofix() {
            return Eligibility::NotFixable;
        }

        let tier = self.tier_of(violation.rule, violation.severity);
        match self.fix_mode(tier) {
            FixMode::Never => Eligibility::PolicyExcluded,
            FixMode::Conditional | FixMode::Always => Eligibility::Eligible,
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
