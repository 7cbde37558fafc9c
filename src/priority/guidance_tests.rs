use super::*;
use crate::rules::RuleId;

#[test]
fn every_rule_has_non_empty_guidance() {
    for rule in [
        RuleId::CrudViolation,
        RuleId::SharingViolation,
        RuleId::SoqlInjection,
        RuleId::DebugStatement,
        RuleId::CognitiveComplexity,
        RuleId::TrailingWhitespace,
    ] {
        assert!(!remediation_guidance(rule).is_empty());
    }
}

#[test]
fn guidance_is_rule_specific() {
    assert!(remediation_guidance(RuleId::SharingViolation).contains("with sharing"));
    assert!(remediation_guidance(RuleId::SoqlInjection).contains("bind variables"));
    assert!(remediation_guidance(RuleId::CognitiveComplexity).contains("Refactor"));
}
