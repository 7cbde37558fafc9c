use std::path::Path;

use super::*;
use crate::rules::{ViolationContext, DmlKind};

fn violation(rule: RuleId, severity: Severity, fixable: bool) -> Violation {
    Violation::new(rule, severity, Path::new("A.cls"), 1, 1, "test").with_fixable(fixable)
}

#[test]
fn default_assignments_cover_all_rules() {
    let policy = TierPolicy::default();

    assert_eq!(
        policy.tier_of(RuleId::CrudViolation, Severity::Critical),
        Tier::Critical
    );
    assert_eq!(
        policy.tier_of(RuleId::SharingViolation, Severity::Critical),
        Tier::Critical
    );
    assert_eq!(
        policy.tier_of(RuleId::SoqlInjection, Severity::Critical),
        Tier::Critical
    );
    assert_eq!(
        policy.tier_of(RuleId::CognitiveComplexity, Severity::Moderate),
        Tier::Important
    );
    assert_eq!(
        policy.tier_of(RuleId::DebugStatement, Severity::Moderate),
        Tier::Cleanup
    );
    assert_eq!(
        policy.tier_of(RuleId::TrailingWhitespace, Severity::Low),
        Tier::Cleanup
    );
}

#[test]
fn default_fix_modes() {
    let policy = TierPolicy::default();
    assert_eq!(policy.fix_mode(Tier::Critical), FixMode::Conditional);
    assert_eq!(policy.fix_mode(Tier::Important), FixMode::Never);
    assert_eq!(policy.fix_mode(Tier::Cleanup), FixMode::Always);
}

#[test]
fn fix_mode_is_overridable() {
    let policy = TierPolicy::default().with_fix_mode(Tier::Cleanup, FixMode::Never);
    assert_eq!(policy.fix_mode(Tier::Cleanup), FixMode::Never);
}

#[test]
fn eligibility_test_code_always_wins() {
    let policy = TierPolicy::default();
    let mut v = violation(RuleId::TrailingWhitespace, Severity::Low, true);
    v.is_test_code = true;
    assert_eq!(policy.eligibility(&v), Eligibility::TestCode);
}

#[test]
fn eligibility_requires_instance_fixability() {
    let policy = TierPolicy::default();
    let v = violation(RuleId::CrudViolation, Severity::Critical, false);
    assert_eq!(policy.eligibility(&v), Eligibility::NotFixable);
}

#[test]
fn injection_is_never_eligible_regardless_of_tier_policy() {
    // Even a policy that always fixes Critical findings cannot make an
    // injection finding eligible; the rule has no fix capability.
    let policy = TierPolicy::default().with_fix_mode(Tier::Critical, FixMode::Always);
    let mut v = violation(RuleId::SoqlInjection, Severity::Critical, false);
    assert_eq!(policy.eligibility(&v), Eligibility::NotFixable);

    // Even a forged fixable flag is stopped by the rule capability gate.
    v.fixable = true;
    assert_eq!(policy.eligibility(&v), Eligibility::NotFixable);
}

#[test]
fn crud_with_context_is_eligible_under_conditional_mode() {
    let policy = TierPolicy::default();
    let v = violation(RuleId::CrudViolation, Severity::Critical, true).with_context(
        ViolationContext {
            entity: Some("Account".to_string()),
            operation: Some(DmlKind::Insert),
            ..ViolationContext::default()
        },
    );
    assert_eq!(policy.eligibility(&v), Eligibility::Eligible);
}

#[test]
fn never_mode_excludes_fixable_violations() {
    let policy = TierPolicy::default().with_fix_mode(Tier::Cleanup, FixMode::Never);
    let v = violation(RuleId::TrailingWhitespace, Severity::Low, true);
    assert_eq!(policy.eligibility(&v), Eligibility::PolicyExcluded);
}

#[test]
fn cleanup_violations_are_eligible_by_default() {
    let policy = TierPolicy::default();
    assert_eq!(
        policy.eligibility(&violation(RuleId::TrailingWhitespace, Severity::Low, true)),
        Eligibility::Eligible
    );
    assert_eq!(
        policy.eligibility(&violation(RuleId::DebugStatement, Severity::Moderate, true)),
        Eligibility::Eligible
    );
}

#[test]
fn severity_fallback_for_unmapped_rules() {
    // A policy with an empty table classifies purely by severity.
    let policy = TierPolicy {
        assignments: indexmap::IndexMap::new(),
        fix_modes: indexmap::IndexMap::new(),
    };

    assert_eq!(
        policy.tier_of(RuleId::DebugStatement, Severity::Critical),
        Tier::Critical
    );
    assert_eq!(
        policy.tier_of(RuleId::DebugStatement, Severity::High),
        Tier::Critical
    );
    assert_eq!(
        policy.tier_of(RuleId::DebugStatement, Severity::Moderate),
        Tier::Important
    );
    assert_eq!(
        policy.tier_of(RuleId::DebugStatement, Severity::Low),
        Tier::Cleanup
    );
    assert_eq!(
        policy.tier_of(RuleId::DebugStatement, Severity::Info),
        Tier::Cleanup
    );
    assert_eq!(policy.fix_mode(Tier::Critical), FixMode::Never);
}
