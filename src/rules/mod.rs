mod complexity;
mod crud;
mod debug;
mod injection;
mod sharing;
mod violation;
mod whitespace;

pub use complexity::{CognitiveComplexityRule, DEFAULT_COMPLEXITY_THRESHOLD};
pub use crud::CrudRule;
pub use debug::DebugStatementRule;
pub use injection::SoqlInjectionRule;
pub use sharing::SharingRule;
pub use violation::{DmlKind, Violation, ViolationContext};
pub use whitespace::TrailingWhitespaceRule;

use std::path::Path;

use serde::Serialize;

/// Severity declared at rule-definition time, never recomputed per instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    Critical,
    High,
    Moderate,
    Low,
    Info,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Moderate => "Moderate",
            Self::Low => "Low",
            Self::Info => "Info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a detector. Names follow the conventional Apex rule
/// vocabulary so findings line up with what Salesforce tooling reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RuleId {
    #[serde(rename = "ApexCRUDViolation")]
    CrudViolation,
    #[serde(rename = "ApexSharingViolation")]
    SharingViolation,
    #[serde(rename = "ApexSOQLInjection")]
    SoqlInjection,
    #[serde(rename = "AvoidDebugStatements")]
    DebugStatement,
    #[serde(rename = "CognitiveComplexity")]
    CognitiveComplexity,
    #[serde(rename = "NoTrailingWhitespace")]
    TrailingWhitespace,
}

impl RuleId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CrudViolation => "ApexCRUDViolation",
            Self::SharingViolation => "ApexSharingViolation",
            Self::SoqlInjection => "ApexSOQLInjection",
            Self::DebugStatement => "AvoidDebugStatements",
            Self::CognitiveComplexity => "CognitiveComplexity",
            Self::TrailingWhitespace => "NoTrailingWhitespace",
        }
    }

    /// Whether the rule is inherently capable of producing an auto-fix.
    /// Instance-level eligibility is tracked separately on each violation.
    #[must_use]
    pub const fn supports_autofix(self) -> bool {
        match self {
            Self::CrudViolation
            | Self::SharingViolation
            | Self::DebugStatement
            | Self::TrailingWhitespace => true,
            Self::SoqlInjection | Self::CognitiveComplexity => false,
        }
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for pattern detectors.
///
/// Implementations must be pure and idempotent: no I/O, no shared state,
/// and scanning unchanged content twice yields identical violations.
pub trait Rule: Send + Sync {
    fn id(&self) -> RuleId;

    fn severity(&self) -> Severity;

    /// Check a file's content and return all detected violations.
    fn check(&self, path: &Path, content: &str) -> Vec<Violation>;
}

/// The set of rules a scanner applies. An explicit value, not a global,
/// so tests can run against reduced rule sets.
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_complexity_threshold(DEFAULT_COMPLEXITY_THRESHOLD)
    }
}

impl RuleRegistry {
    #[must_use]
    pub fn with_complexity_threshold(threshold: u32) -> Self {
        Self {
            rules: vec![
                Box::new(CrudRule::new()),
                Box::new(SharingRule::new()),
                Box::new(SoqlInjectionRule::new()),
                Box::new(DebugStatementRule::new()),
                Box::new(CognitiveComplexityRule::new(threshold)),
                Box::new(TrailingWhitespaceRule),
            ],
        }
    }

    #[must_use]
    pub const fn from_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Whether `position` (0-based byte offset) in `line` falls inside a
/// comment. Line-local approximation: a `//` earlier in the line, or a
/// `/*` opened earlier without a closing `*/` before it.
#[must_use]
pub fn is_commented(line: &str, position: usize) -> bool {
    let prefix = &line[..position.min(line.len())];

    if let Some(comment_pos) = line.find("//")
        && comment_pos < position
    {
        return true;
    }

    prefix.contains("/*") && !prefix.contains("*/")
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
