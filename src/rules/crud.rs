use std::path::Path;

use regex::Regex;

use super::{DmlKind, Rule, RuleId, Severity, Violation, ViolationContext, is_commented};

/// Lines to search on each side of a data operation for an existing
/// permission check.
const GUARD_WINDOW: usize = 10;

/// Lines to search backwards when inferring the sObject type of a DML
/// target variable.
const TYPE_INFERENCE_WINDOW: usize = 10;

/// Type names that look like sObjects but are not.
const NON_SOBJECT_TYPES: &[&str] = &[
    "String", "Integer", "Boolean", "Decimal", "Double", "Long", "Date", "Datetime", "Id", "List",
    "Set", "Map", "Object",
];

/// Flags DML statements and SOQL queries with no nearby CRUD/FLS
/// permission check.
///
/// DML instances are auto-fixable only when the target sObject type can
/// be inferred from a nearby declaration; query instances are fixable
/// when the query is a single-line bracketed query missing a security
/// clause.
pub struct CrudRule {
    dml_pattern: Regex,
    query_pattern: Regex,
    single_line_query: Regex,
    guard_pattern: Regex,
}

impl Default for CrudRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CrudRule {
    #[must_use]
    pub fn new() -> Self {
        Self {
            dml_pattern: Regex::new(r"(?i)\b(insert|update|delete|upsert)\s+([A-Za-z_]\w*)\s*;")
                .expect("Invalid regex"),
            query_pattern: Regex::new(r"(?i)\[\s*SELECT\s+.+?\s+FROM\s+(\w+)")
                .expect("Invalid regex"),
            single_line_query: Regex::new(r"(?i)\[\s*SELECT\b[^\[\]]*\]").expect("Invalid regex"),
            guard_pattern: Regex::new(
                r"(?i)\bis(Accessible|Createable|Updateable|Deletable)\s*\(|stripInaccessible|WITH\s+SECURITY_ENFORCED",
            )
            .expect("Invalid regex"),
        }
    }

    fn has_nearby_guard(&self, lines: &[&str], line_idx: usize) -> bool {
        let start = line_idx.saturating_sub(GUARD_WINDOW);
        let end = (line_idx + GUARD_WINDOW + 1).min(lines.len());
        lines[start..end]
            .iter()
            .any(|line| self.guard_pattern.is_match(line))
    }

    /// Infer the sObject type of `var_name` by scanning backwards for its
    /// declaration: `List<Type> var` or `Type var =`.
    fn infer_entity(lines: &[&str], line_idx: usize, var_name: &str) -> Option<String> {
        let list_pattern = Regex::new(&format!(
            r"(?i)List<(\w+)>\s+{}\b",
            regex::escape(var_name)
        ))
        .ok()?;
        let decl_pattern =
            Regex::new(&format!(r"\b(\w+)\s+{}\s*=", regex::escape(var_name))).ok()?;

        let start = line_idx.saturating_sub(TYPE_INFERENCE_WINDOW);
        for line in &lines[start..line_idx] {
            if let Some(caps) = list_pattern.captures(line) {
                return Some(caps[1].to_string());
            }

            if let Some(caps) = decl_pattern.captures(line) {
                let inferred = &caps[1];
                let looks_like_sobject = inferred
                    .chars()
                    .next()
                    .is_some_and(char::is_uppercase)
                    && !NON_SOBJECT_TYPES.contains(&inferred);
                if looks_like_sobject {
                    return Some(inferred.to_string());
                }
            }
        }

        None
    }

    fn dml_kind(keyword: &str) -> DmlKind {
        // Keyword is lowercased by the caller.
        match keyword {
            "insert" => DmlKind::Insert,
            "update" => DmlKind::Update,
            "delete" => DmlKind::Delete,
            _ => DmlKind::Upsert,
        }
    }

    fn check_dml(&self, path: &Path, lines: &[&str], line_idx: usize, out: &mut Vec<Violation>) {
        let line = lines[line_idx];
        let Some(caps) = self.dml_pattern.captures(line) else {
            return;
        };

        let Some(mat) = caps.get(0) else { return };
        if is_commented(line, mat.start()) || self.has_nearby_guard(lines, line_idx) {
            return;
        }

        let keyword = caps[1].to_lowercase();
        let kind = Self::dml_kind(&keyword);
        let entity = Self::infer_entity(lines, line_idx, &caps[2]);
        let fixable = entity.is_some();

        out.push(
            Violation::new(
                RuleId::CrudViolation,
                Severity::Critical,
                path,
                line_idx + 1,
                mat.start() + 1,
                format!("{keyword} operation without CRUD/FLS permission check"),
            )
            .with_fixable(fixable)
            .with_context(ViolationContext {
                snippet: line.trim().to_string(),
                entity,
                operation: Some(kind),
                ..ViolationContext::default()
            }),
        );
    }

    fn check_query(&self, path: &Path, lines: &[&str], line_idx: usize, out: &mut Vec<Violation>) {
        let line = lines[line_idx];
        let Some(caps) = self.query_pattern.captures(line) else {
            return;
        };

        let Some(mat) = caps.get(0) else { return };
        if is_commented(line, mat.start()) || self.has_nearby_guard(lines, line_idx) {
            return;
        }

        // A query is only mechanically rewritable when the whole bracketed
        // expression sits on one line.
        let fixable = self.single_line_query.is_match(line);

        out.push(
            Violation::new(
                RuleId::CrudViolation,
                Severity::Critical,
                path,
                line_idx + 1,
                mat.start() + 1,
                "SOQL query without CRUD/FLS permission check or security clause",
            )
            .with_fixable(fixable)
            .with_context(ViolationContext {
                snippet: line.trim().to_string(),
                entity: Some(caps[1].to_string()),
                operation: Some(DmlKind::Query),
                ..ViolationContext::default()
            }),
        );
    }
}

impl Rule for CrudRule {
    fn id(&self) -> RuleId {
        RuleId::CrudViolation
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn check(&self, path: &Path, content: &str) -> Vec<Violation> {
        let lines: Vec<&str> = content.lines().collect();
        let mut violations = Vec::new();

        for line_idx in 0..lines.len() {
            self.check_dml(path, &lines, line_idx, &mut violations);
            self.check_query(path, &lines, line_idx, &mut violations);
        }

        violations
    }
}

#[cfg(test)]
#[path = "crud_tests.rs"]
mod tests;
