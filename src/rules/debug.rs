use std::path::Path;

use regex::Regex;

use super::{Rule, RuleId, Severity, Violation, ViolationContext, is_commented};

/// Flags `System.debug` calls that are not already commented out.
pub struct DebugStatementRule {
    pattern: Regex,
}

impl Default for DebugStatementRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugStatementRule {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"(?i)System\.debug\s*\(").expect("Invalid regex"),
        }
    }
}

impl Rule for DebugStatementRule {
    fn id(&self) -> RuleId {
        RuleId::DebugStatement
    }

    fn severity(&self) -> Severity {
        Severity::Moderate
    }

    fn check(&self, path: &Path, content: &str) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (line_idx, line) in content.lines().enumerate() {
            for mat in self.pattern.find_iter(line) {
                if is_commented(line, mat.start()) {
                    continue;
                }

                violations.push(
                    Violation::new(
                        RuleId::DebugStatement,
                        Severity::Moderate,
                        path,
                        line_idx + 1,
                        mat.start() + 1,
                        "Avoid System.debug statements in production code",
                    )
                    .with_fixable(true)
                    .with_context(ViolationContext {
                        snippet: line.trim().to_string(),
                        ..ViolationContext::default()
                    }),
                );
            }
        }

        violations
    }
}

#[cfg(test)]
#[path = "debug_tests.rs"]
mod tests;
