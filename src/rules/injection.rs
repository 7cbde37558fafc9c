use std::path::Path;

use regex::Regex;

use super::{Rule, RuleId, Severity, Violation, ViolationContext, is_commented};

/// Flags dynamic-query construction that concatenates strings into the
/// query text. A heuristic over single statements, not a taint analysis;
/// never auto-fixable.
pub struct SoqlInjectionRule {
    dynamic_query: Regex,
    concat_near_quote: Regex,
    inline_query_concat: Regex,
}

impl Default for SoqlInjectionRule {
    fn default() -> Self {
        Self::new()
    }
}

impl SoqlInjectionRule {
    #[must_use]
    pub fn new() -> Self {
        Self {
            dynamic_query: Regex::new(r"(?i)Database\.query\s*\(").expect("Invalid regex"),
            concat_near_quote: Regex::new(r"'\s*\+|\+\s*'").expect("Invalid regex"),
            inline_query_concat: Regex::new(r"(?i)\[\s*SELECT\s+.*?\+.*?FROM")
                .expect("Invalid regex"),
        }
    }
}

impl Rule for SoqlInjectionRule {
    fn id(&self) -> RuleId {
        RuleId::SoqlInjection
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn check(&self, path: &Path, content: &str) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (line_idx, line) in content.lines().enumerate() {
            let dynamic = self
                .dynamic_query
                .find(line)
                .filter(|_| self.concat_near_quote.is_match(line));
            let inline = self.inline_query_concat.find(line);

            let Some(mat) = dynamic.or(inline) else {
                continue;
            };

            if is_commented(line, mat.start()) {
                continue;
            }

            violations.push(
                Violation::new(
                    RuleId::SoqlInjection,
                    Severity::Critical,
                    path,
                    line_idx + 1,
                    mat.start() + 1,
                    "Potential SOQL injection: user input concatenated into a dynamic query",
                )
                .with_context(ViolationContext {
                    snippet: line.trim().to_string(),
                    ..ViolationContext::default()
                }),
            );
        }

        violations
    }
}

#[cfg(test)]
#[path = "injection_tests.rs"]
mod tests;
