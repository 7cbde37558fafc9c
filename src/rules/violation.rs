use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{RuleId, Severity};

/// Kind of data operation detected by the CRUD rule. Drives which
/// permission guard the fix strategy generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DmlKind {
    Insert,
    Update,
    Delete,
    Upsert,
    Query,
}

impl DmlKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Upsert => "upsert",
            Self::Query => "query",
        }
    }
}

/// Rule-specific payload attached to a violation. Fix strategies read
/// from here; reporters render the snippet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViolationContext {
    /// Trimmed source line the violation was detected on.
    pub snippet: String,

    /// Inferred sObject type name, when the CRUD rule could resolve one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,

    /// Data operation kind for CRUD violations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<DmlKind>,

    /// Cognitive complexity score for complexity violations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<u32>,

    /// Number of trailing whitespace characters for whitespace violations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_whitespace: Option<usize>,
}

/// One detected instance of a rule at a specific file and line.
///
/// Identity for cross-pipeline matching (baseline diff, fix tracking) is
/// `(rule, file_path, line)` with a small line-drift tolerance, because
/// fixes that insert lines shift everything below them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule: RuleId,
    pub severity: Severity,
    pub file_path: PathBuf,
    /// 1-based line of the detected pattern; the edit anchor for fixes.
    pub line: usize,
    /// 1-based column of the detected pattern.
    pub column: usize,
    pub description: String,
    /// Whether this instance carries enough context to be auto-fixed.
    pub fixable: bool,
    pub context: ViolationContext,
    /// True if the owning file is classified as test code. Test-code
    /// violations are reported but never auto-fixed.
    pub is_test_code: bool,
}

impl Violation {
    #[must_use]
    pub fn new(
        rule: RuleId,
        severity: Severity,
        file_path: &Path,
        line: usize,
        column: usize,
        description: impl Into<String>,
    ) -> Self {
        Self {
            rule,
            severity,
            file_path: file_path.to_path_buf(),
            line,
            column,
            description: description.into(),
            fixable: false,
            context: ViolationContext::default(),
            is_test_code: false,
        }
    }

    #[must_use]
    pub fn with_fixable(mut self, fixable: bool) -> Self {
        self.fixable = fixable;
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: ViolationContext) -> Self {
        self.context = context;
        self
    }

    /// Whether `other` refers to the same issue: same rule, same file,
    /// and a line within `drift` of this one.
    #[must_use]
    pub fn matches_within(&self, other: &Self, drift: usize) -> bool {
        self.rule == other.rule
            && self.file_path == other.file_path
            && self.line.abs_diff(other.line) <= drift
    }
}

#[cfg(test)]
#[path = "violation_tests.rs"]
mod tests;
