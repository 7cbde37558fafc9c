use regex::Regex;

use crate::rules::{DmlKind, RuleId, Violation};

/// Result of applying a fix strategy. Strategies are pure content
/// transforms; the caller owns all file I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    Applied { content: String, description: String },
    Rejected { reason: String },
}

impl FixOutcome {
    fn applied(content: String, description: impl Into<String>) -> Self {
        Self::Applied {
            content,
            description: description.into(),
        }
    }

    fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

/// Deterministic text rewrite for one fixable rule, addressed by the
/// violation's 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixStrategy {
    CommentOutDebug,
    InsertSharing,
    TrimTrailingWhitespace,
    InsertCrudGuard,
}

impl FixStrategy {
    /// Strategy handling a rule, if any.
    #[must_use]
    pub const fn for_rule(rule: RuleId) -> Option<Self> {
        match rule {
            RuleId::DebugStatement => Some(Self::CommentOutDebug),
            RuleId::SharingViolation => Some(Self::InsertSharing),
            RuleId::TrailingWhitespace => Some(Self::TrimTrailingWhitespace),
            RuleId::CrudViolation => Some(Self::InsertCrudGuard),
            RuleId::SoqlInjection | RuleId::CognitiveComplexity => None,
        }
    }

    /// Apply the rewrite to `content` at the violation's line.
    #[must_use]
    pub fn apply(self, content: &str, violation: &Violation) -> FixOutcome {
        let lines: Vec<&str> = content.split('\n').collect();
        let Some(target_idx) = violation.line.checked_sub(1).filter(|i| *i < lines.len()) else {
            return FixOutcome::rejected(format!("line {} does not exist", violation.line));
        };

        match self {
            Self::CommentOutDebug => comment_out_debug(&lines, target_idx),
            Self::InsertSharing => insert_sharing(&lines, target_idx),
            Self::TrimTrailingWhitespace => trim_trailing_whitespace(&lines, target_idx),
            Self::InsertCrudGuard => insert_crud_guard(&lines, target_idx, violation),
        }
    }
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

fn join(lines: Vec<String>) -> String {
    lines.join("\n")
}

fn rebuild_with(lines: &[&str], target_idx: usize, replacement: String) -> Vec<String> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == target_idx {
                replacement.clone()
            } else {
                (*line).to_string()
            }
        })
        .collect()
}

fn comment_out_debug(lines: &[&str], target_idx: usize) -> FixOutcome {
    let line = lines[target_idx];
    let trimmed = line.trim_start();

    if trimmed.starts_with("//") {
        return FixOutcome::rejected("line is already commented out");
    }
    if !trimmed.to_lowercase().contains("system.debug") {
        return FixOutcome::rejected("no debug statement on the target line");
    }

    let replacement = format!("{}// {}", leading_whitespace(line), trimmed);
    FixOutcome::applied(
        join(rebuild_with(lines, target_idx, replacement)),
        "commented out debug statement",
    )
}

fn insert_sharing(lines: &[&str], target_idx: usize) -> FixOutcome {
    // Visibility, then everything from the optional abstract/virtual
    // keyword through the class name. Interfaces have no sharing model,
    // so only `class` declarations match.
    let decl = Regex::new(r"(?i)^(\s*(?:public|global))\s+((?:(?:abstract|virtual)\s+)?class\s+\w+.*)$")
        .expect("Invalid regex");

    let line = lines[target_idx];
    let Some(caps) = decl.captures(line) else {
        return FixOutcome::rejected("declaration does not match the expected class shape");
    };

    let replacement = format!("{} with sharing {}", &caps[1], &caps[2]);
    FixOutcome::applied(
        join(rebuild_with(lines, target_idx, replacement)),
        "added 'with sharing' to class declaration",
    )
}

fn trim_trailing_whitespace(lines: &[&str], target_idx: usize) -> FixOutcome {
    let line = lines[target_idx];
    let (body, carriage) = line
        .strip_suffix('\r')
        .map_or((line, ""), |stripped| (stripped, "\r"));

    let replacement = format!("{}{carriage}", body.trim_end_matches([' ', '\t']));
    FixOutcome::applied(
        join(rebuild_with(lines, target_idx, replacement)),
        "stripped trailing whitespace",
    )
}

fn insert_crud_guard(lines: &[&str], target_idx: usize, violation: &Violation) -> FixOutcome {
    match violation.context.operation {
        Some(DmlKind::Query) => insert_security_clause(lines, target_idx),
        Some(kind) => insert_dml_guard(lines, target_idx, kind, violation),
        None => FixOutcome::rejected("missing operation context"),
    }
}

fn insert_security_clause(lines: &[&str], target_idx: usize) -> FixOutcome {
    let line = lines[target_idx];

    if line.to_uppercase().contains("SECURITY_ENFORCED") {
        return FixOutcome::rejected("security clause already present");
    }

    let query = Regex::new(r"(?i)^(.*\[\s*SELECT\b[^\[\]]*?)\s*\](.*)$").expect("Invalid regex");
    let Some(caps) = query.captures(line) else {
        return FixOutcome::rejected("query does not match the expected single-line shape");
    };

    let replacement = format!("{} WITH SECURITY_ENFORCED]{}", &caps[1], &caps[2]);
    FixOutcome::applied(
        join(rebuild_with(lines, target_idx, replacement)),
        "added WITH SECURITY_ENFORCED to query",
    )
}

fn insert_dml_guard(
    lines: &[&str],
    target_idx: usize,
    kind: DmlKind,
    violation: &Violation,
) -> FixOutcome {
    let Some(entity) = violation.context.entity.as_deref() else {
        return FixOutcome::rejected("cannot determine target sObject type - manual fix required");
    };

    let condition = match kind {
        DmlKind::Insert => format!("!Schema.sObjectType.{entity}.isCreateable()"),
        DmlKind::Update => format!("!Schema.sObjectType.{entity}.isUpdateable()"),
        DmlKind::Delete => format!("!Schema.sObjectType.{entity}.isDeletable()"),
        DmlKind::Upsert => format!(
            "!Schema.sObjectType.{entity}.isCreateable() || !Schema.sObjectType.{entity}.isUpdateable()"
        ),
        DmlKind::Query => {
            return FixOutcome::rejected("query operations use the security clause rewrite");
        }
    };

    let indent = leading_whitespace(lines[target_idx]);
    let guard = format!("{indent}if ({condition}) {{ throw new System.NoAccessException(); }}");

    let mut rebuilt: Vec<String> = lines.iter().map(|l| (*l).to_string()).collect();
    rebuilt.insert(target_idx, guard);

    FixOutcome::applied(
        join(rebuilt),
        format!("inserted {} permission check for {entity}", kind.as_str()),
    )
}

#[cfg(test)]
#[path = "strategies_tests.rs"]
mod tests;
