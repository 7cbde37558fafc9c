use std::path::Path;

use super::{Rule, RuleId, Severity, Violation, ViolationContext};

/// Flags non-empty lines ending in spaces or tabs.
pub struct TrailingWhitespaceRule;

/// Length of the trailing `[ \t]` run on `line`, ignoring a trailing `\r`.
fn trailing_whitespace_len(line: &str) -> usize {
    let line = line.strip_suffix('\r').unwrap_or(line);
    line.len() - line.trim_end_matches([' ', '\t']).len()
}

impl Rule for TrailingWhitespaceRule {
    fn id(&self) -> RuleId {
        RuleId::TrailingWhitespace
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn check(&self, path: &Path, content: &str) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (line_idx, line) in content.lines().enumerate() {
            let trailing = trailing_whitespace_len(line);
            if trailing == 0 || line.trim().is_empty() {
                continue;
            }

            let column = line.strip_suffix('\r').unwrap_or(line).len() - trailing + 1;
            violations.push(
                Violation::new(
                    RuleId::TrailingWhitespace,
                    Severity::Low,
                    path,
                    line_idx + 1,
                    column,
                    "Line has trailing whitespace",
                )
                .with_fixable(true)
                .with_context(ViolationContext {
                    snippet: line.trim().to_string(),
                    trailing_whitespace: Some(trailing),
                    ..ViolationContext::default()
                }),
            );
        }

        violations
    }
}

#[cfg(test)]
#[path = "whitespace_tests.rs"]
mod tests;
