use std::path::Path;

use regex::Regex;

use super::{Rule, RuleId, Severity, Violation, ViolationContext};

/// Complexity score above which a method is flagged.
pub const DEFAULT_COMPLEXITY_THRESHOLD: u32 = 15;

/// Flags methods whose cognitive complexity exceeds a threshold.
///
/// The method body is extracted by brace counting from the signature
/// line; branching constructs inside it are counted by pattern
/// occurrence, weighted by brace-nesting depth. Never auto-fixable.
pub struct CognitiveComplexityRule {
    method_pattern: Regex,
    branch_patterns: Vec<Regex>,
    threshold: u32,
}

impl CognitiveComplexityRule {
    #[must_use]
    pub fn new(threshold: u32) -> Self {
        let branch_sources = [
            r"\bif\s*\(",
            r"\belse\s+if\s*\(",
            r"\belse\s*\{",
            r"\bfor\s*\(",
            r"\bwhile\s*\(",
            r"\bdo\s*\{",
            r"\bcatch\s*\(",
            r"\bwhen\s+",
            r"&&",
            r"\|\|",
            r"\?.*:",
        ];

        Self {
            method_pattern: Regex::new(
                r"(?i)^\s*(public|private|protected|global)\s+(?:static\s+)?[\w<>,.\s]+?\s+(\w+)\s*\([^)]*\)\s*\{",
            )
            .expect("Invalid regex"),
            branch_patterns: branch_sources
                .iter()
                .map(|src| Regex::new(&format!("(?i){src}")).expect("Invalid regex"))
                .collect(),
            threshold,
        }
    }

    #[must_use]
    pub const fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Score the method body: occurrences of branching constructs, each
    /// weighted by the brace-nesting depth where it appears.
    fn score(&self, body: &[&str]) -> u32 {
        let mut complexity = 0u32;
        let mut nesting = 0i32;

        for line in body {
            for ch in line.chars() {
                match ch {
                    '{' => nesting += 1,
                    '}' => nesting = (nesting - 1).max(0),
                    _ => {}
                }
            }

            let weight = nesting.max(1) as u32;
            for pattern in &self.branch_patterns {
                complexity += pattern.find_iter(line).count() as u32 * weight;
            }
        }

        complexity
    }
}

/// Find the 0-based index of the line closing the brace block opened at
/// `start`. Returns the last line when the block never closes.
fn find_block_end(lines: &[&str], start: usize) -> usize {
    let mut brace_count = 0i32;
    let mut found_open = false;

    for (i, line) in lines.iter().enumerate().skip(start) {
        for ch in line.chars() {
            match ch {
                '{' => {
                    brace_count += 1;
                    found_open = true;
                }
                '}' => {
                    brace_count -= 1;
                    if found_open && brace_count == 0 {
                        return i;
                    }
                }
                _ => {}
            }
        }
    }

    lines.len().saturating_sub(1)
}

impl Rule for CognitiveComplexityRule {
    fn id(&self) -> RuleId {
        RuleId::CognitiveComplexity
    }

    fn severity(&self) -> Severity {
        Severity::Moderate
    }

    fn check(&self, path: &Path, content: &str) -> Vec<Violation> {
        let lines: Vec<&str> = content.lines().collect();
        let mut violations = Vec::new();

        for (line_idx, line) in lines.iter().enumerate() {
            if !self.method_pattern.is_match(line) {
                continue;
            }

            let end = find_block_end(&lines, line_idx);
            let body = &lines[line_idx..=end.min(lines.len().saturating_sub(1))];
            let complexity = self.score(body);

            if complexity > self.threshold {
                violations.push(
                    Violation::new(
                        RuleId::CognitiveComplexity,
                        Severity::Moderate,
                        path,
                        line_idx + 1,
                        1,
                        format!(
                            "Method has high cognitive complexity ({complexity}, threshold {})",
                            self.threshold
                        ),
                    )
                    .with_context(ViolationContext {
                        snippet: line.trim().to_string(),
                        complexity: Some(complexity),
                        ..ViolationContext::default()
                    }),
                );
            }
        }

        violations
    }
}

#[cfg(test)]
#[path = "complexity_tests.rs"]
mod tests;
