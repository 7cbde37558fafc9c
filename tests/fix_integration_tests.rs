//! Integration tests for the `fix` command: end-to-end detect, rewrite,
//! and verify scenarios.

mod common;

use common::{CLEAN_CLASS, INJECTION_CLASS, NO_SHARING_CLASS, TestFixture, UNGUARDED_INSERT_CLASS};
use predicates::prelude::*;

#[test]
fn fix_inserts_crud_guard_above_insert() {
    let fixture = TestFixture::new();
    fixture.create_file("src/AccountService.cls", UNGUARDED_INSERT_CLASS);

    apex_guard!()
        .current_dir(fixture.path())
        .args(["fix", "--quiet"])
        .assert()
        .success();

    let fixed = fixture.read_file("src/AccountService.cls");
    let expected = "\
public with sharing class AccountService {
    public void save() {
        Account acc = new Account();
        if (!Schema.sObjectType.Account.isCreateable()) { throw new System.NoAccessException(); }
        insert acc;
    }
}
";
    assert_eq!(fixed, expected, "guard indented to match the insert line");
}

#[test]
fn fix_adds_sharing_modifier_preserving_declaration() {
    let fixture = TestFixture::new();
    fixture.create_file("src/OpenService.cls", NO_SHARING_CLASS);

    apex_guard!()
        .current_dir(fixture.path())
        .args(["fix"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FIXED"));

    let fixed = fixture.read_file("src/OpenService.cls");
    assert!(fixed.starts_with("public with sharing class OpenService {"));
}

#[test]
fn fix_strips_exact_trailing_whitespace() {
    let fixture = TestFixture::new();
    let content = "public with sharing class Pad {\n    Integer x = 1;     \n}\n";
    fixture.create_file("src/Pad.cls", content);

    apex_guard!()
        .current_dir(fixture.path())
        .args(["fix", "--quiet"])
        .assert()
        .success();

    assert_eq!(
        fixture.read_file("src/Pad.cls"),
        "public with sharing class Pad {\n    Integer x = 1;\n}\n"
    );
}

#[test]
fn fix_comments_out_debug_statement() {
    let fixture = TestFixture::new();
    let content = "\
public with sharing class Logger {
    public void log() {
        System.debug('trace');
    }
}
";
    fixture.create_file("src/Logger.cls", content);

    apex_guard!()
        .current_dir(fixture.path())
        .args(["fix", "--quiet"])
        .assert()
        .success();

    assert!(
        fixture
            .read_file("src/Logger.cls")
            .contains("// System.debug('trace');")
    );
}

#[test]
fn injection_findings_are_never_auto_fixed() {
    let fixture = TestFixture::new();
    fixture.create_file("src/QueryService.cls", INJECTION_CLASS);

    apex_guard!()
        .current_dir(fixture.path())
        .args(["fix", "--quiet"])
        .assert()
        .code(1);

    assert_eq!(fixture.read_file("src/QueryService.cls"), INJECTION_CLASS);
    assert!(
        !fixture.exists("src/QueryService.cls.backup"),
        "nothing eligible, so no backup is created"
    );
}

#[test]
fn test_code_is_reported_but_never_fixed() {
    let fixture = TestFixture::new();
    fixture.create_file("src/OpenServiceTest.cls", NO_SHARING_CLASS);

    apex_guard!()
        .current_dir(fixture.path())
        .args(["fix", "--quiet"])
        .assert()
        .code(1);

    assert_eq!(
        fixture.read_file("src/OpenServiceTest.cls"),
        NO_SHARING_CLASS
    );
}

#[test]
fn fix_leaves_backup_by_default() {
    let fixture = TestFixture::new();
    fixture.create_file("src/OpenService.cls", NO_SHARING_CLASS);

    apex_guard!()
        .current_dir(fixture.path())
        .args(["fix", "--quiet"])
        .assert()
        .success();

    assert!(fixture.exists("src/OpenService.cls.backup"));
    assert_eq!(
        fixture.read_file("src/OpenService.cls.backup"),
        NO_SHARING_CLASS,
        "backup holds pre-fix content"
    );
}

#[test]
fn clean_backups_flag_removes_backups_after_verification() {
    let fixture = TestFixture::new();
    fixture.create_file("src/OpenService.cls", NO_SHARING_CLASS);

    apex_guard!()
        .current_dir(fixture.path())
        .args(["fix", "--quiet", "--clean-backups"])
        .assert()
        .success();

    assert!(fixture.read_file("src/OpenService.cls").contains("with sharing"));
    assert!(!fixture.exists("src/OpenService.cls.backup"));
}

#[test]
fn fix_reports_verification_outcome() {
    let fixture = TestFixture::new();
    fixture.create_file("src/OpenService.cls", NO_SHARING_CLASS);

    apex_guard!()
        .current_dir(fixture.path())
        .args(["fix"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Verification ==="))
        .stdout(predicate::str::contains("Verified: 1"));
}

#[test]
fn fix_clean_directory_is_a_noop() {
    let fixture = TestFixture::new();
    fixture.create_file("src/CleanService.cls", CLEAN_CLASS);

    apex_guard!()
        .current_dir(fixture.path())
        .args(["fix", "--quiet"])
        .assert()
        .success();

    assert_eq!(fixture.read_file("src/CleanService.cls"), CLEAN_CLASS);
}

#[test]
fn fix_handles_multiple_files_independently() {
    let fixture = TestFixture::new();
    fixture.create_file("src/AccountService.cls", UNGUARDED_INSERT_CLASS);
    fixture.create_file("src/OpenService.cls", NO_SHARING_CLASS);
    fixture.create_file("src/QueryService.cls", INJECTION_CLASS);

    // Injection remains, so violations are still outstanding.
    apex_guard!()
        .current_dir(fixture.path())
        .args(["fix", "--quiet"])
        .assert()
        .code(1);

    assert!(
        fixture
            .read_file("src/AccountService.cls")
            .contains("isCreateable()")
    );
    assert!(
        fixture
            .read_file("src/OpenService.cls")
            .contains("with sharing")
    );
    assert_eq!(fixture.read_file("src/QueryService.cls"), INJECTION_CLASS);
}

#[test]
fn fix_json_report_includes_fix_and_verification_sections() {
    let fixture = TestFixture::new();
    fixture.create_file("src/OpenService.cls", NO_SHARING_CLASS);

    let output = apex_guard!()
        .current_dir(fixture.path())
        .args(["fix", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(value["fix"]["fixed"].as_array().map(Vec::len), Some(1));
    assert_eq!(value["verification"]["verified"], 1);
    assert_eq!(
        value["verification"]["rollbacks"].as_array().map(Vec::len),
        Some(0)
    );
}
