use crate::rules::RuleId;

/// Static remediation guidance shown alongside findings of a rule.
#[must_use]
pub const fn remediation_guidance(rule: RuleId) -> &'static str {
    match rule {
        RuleId::CrudViolation => {
            "Add Schema.sObjectType checks for isAccessible(), isCreateable(), isUpdateable(), or isDeletable() before DML operations, or a WITH SECURITY_ENFORCED clause on queries."
        }
        RuleId::SharingViolation => {
            "Add 'with sharing' to the class declaration to enforce record-level security."
        }
        RuleId::SoqlInjection => {
            "Use bind variables or String.escapeSingleQuotes() to prevent SOQL injection. Never concatenate user input directly into a query."
        }
        RuleId::DebugStatement => {
            "Remove or comment out System.debug statements to improve performance and reduce log clutter."
        }
        RuleId::CognitiveComplexity => {
            "Refactor complex methods by extracting logic into smaller, focused methods. Reduce nesting levels and simplify conditional logic."
        }
        RuleId::TrailingWhitespace => "Remove trailing whitespace to keep diffs clean.",
    }
}

#[cfg(test)]
#[path = "guidance_tests.rs"]
mod tests;
