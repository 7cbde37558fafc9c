use std::path::Path;

use regex::Regex;

use super::{Rule, RuleId, Severity, Violation, ViolationContext, is_commented};

/// Lines above a declaration that may still carry its sharing modifier
/// (split declarations, annotations).
const SHARING_LOOKBACK: usize = 3;

/// Flags public/global class and interface declarations that lack a
/// sharing modifier.
///
/// Class declarations matching the plain structural shape are
/// auto-fixable; interfaces are reported only.
pub struct SharingRule {
    decl_pattern: Regex,
    sharing_pattern: Regex,
}

impl Default for SharingRule {
    fn default() -> Self {
        Self::new()
    }
}

impl SharingRule {
    #[must_use]
    pub fn new() -> Self {
        Self {
            decl_pattern: Regex::new(
                r"(?i)^\s*(public|global)\s+((?:abstract|virtual)\s+)?(class|interface)\s+(\w+)",
            )
            .expect("Invalid regex"),
            sharing_pattern: Regex::new(r"(?i)\b(with|without|inherited)\s+sharing\b")
                .expect("Invalid regex"),
        }
    }

    fn has_sharing_modifier(&self, lines: &[&str], line_idx: usize) -> bool {
        let start = line_idx.saturating_sub(SHARING_LOOKBACK);
        lines[start..=line_idx]
            .iter()
            .any(|line| self.sharing_pattern.is_match(line))
    }
}

impl Rule for SharingRule {
    fn id(&self) -> RuleId {
        RuleId::SharingViolation
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn check(&self, path: &Path, content: &str) -> Vec<Violation> {
        let lines: Vec<&str> = content.lines().collect();
        let mut violations = Vec::new();

        for (line_idx, line) in lines.iter().enumerate() {
            let Some(caps) = self.decl_pattern.captures(line) else {
                continue;
            };

            let Some(mat) = caps.get(0) else { continue };
            if is_commented(line, mat.start()) || self.has_sharing_modifier(&lines, line_idx) {
                continue;
            }

            let kind = caps[3].to_lowercase();
            let is_class = kind == "class";

            violations.push(
                Violation::new(
                    RuleId::SharingViolation,
                    Severity::Critical,
                    path,
                    line_idx + 1,
                    mat.start() + 1,
                    format!("{kind} declaration without a sharing model (with sharing, without sharing, or inherited sharing)"),
                )
                .with_fixable(is_class)
                .with_context(ViolationContext {
                    snippet: line.trim().to_string(),
                    entity: Some(caps[4].to_string()),
                    ..ViolationContext::default()
                }),
            );
        }

        violations
    }
}

#[cfg(test)]
#[path = "sharing_tests.rs"]
mod tests;
