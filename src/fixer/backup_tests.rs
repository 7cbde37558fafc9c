use std::fs;

use tempfile::TempDir;

use super::*;

#[test]
fn backup_path_appends_suffix() {
    assert_eq!(
        backup_path(Path::new("src/Account.cls")),
        PathBuf::from("src/Account.cls.backup")
    );
}

#[test]
fn create_backup_copies_content() {
    let dir = TempDir::new().expect("temp dir");
    let file = dir.path().join("Account.cls");
    fs::write(&file, "public class Account {}\n").expect("write fixture");

    let backup = create_backup(&file).expect("backup succeeds");

    assert!(backup.exists());
    assert_eq!(
        fs::read_to_string(&backup).expect("read backup"),
        "public class Account {}\n"
    );
    assert!(has_backup(&file));
}

#[test]
fn create_backup_fails_for_missing_file() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("Missing.cls");
    assert!(create_backup(&missing).is_err());
}

#[test]
fn restore_backup_replaces_file_and_removes_backup() {
    let dir = TempDir::new().expect("temp dir");
    let file = dir.path().join("Account.cls");
    fs::write(&file, "original\n").expect("write fixture");
    create_backup(&file).expect("backup succeeds");
    fs::write(&file, "mutated\n").expect("mutate file");

    restore_backup(&file).expect("restore succeeds");

    assert_eq!(fs::read_to_string(&file).expect("read file"), "original\n");
    assert!(!has_backup(&file));
}

#[test]
fn restore_backup_fails_without_backup() {
    let dir = TempDir::new().expect("temp dir");
    let file = dir.path().join("Account.cls");
    fs::write(&file, "content\n").expect("write fixture");

    assert!(restore_backup(&file).is_err());
}

#[test]
fn remove_backup_is_a_noop_without_backup() {
    let dir = TempDir::new().expect("temp dir");
    let file = dir.path().join("Account.cls");
    fs::write(&file, "content\n").expect("write fixture");

    assert!(remove_backup(&file).is_ok());
}

#[test]
fn remove_backup_deletes_existing_backup() {
    let dir = TempDir::new().expect("temp dir");
    let file = dir.path().join("Account.cls");
    fs::write(&file, "content\n").expect("write fixture");
    create_backup(&file).expect("backup succeeds");

    remove_backup(&file).expect("remove succeeds");
    assert!(!has_backup(&file));
}

#[test]
fn content_hash_is_stable_and_content_sensitive() {
    let a = content_hash("insert acc;");
    let b = content_hash("insert acc;");
    let c = content_hash("insert acc; ");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.len(), 64, "hex-encoded SHA-256");
}

#[test]
fn backup_policy_default_retains() {
    assert_eq!(BackupPolicy::default(), BackupPolicy::Retain);
}
