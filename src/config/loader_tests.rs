use std::fs;

use tempfile::TempDir;

use super::*;

#[test]
fn load_from_path_reads_and_validates() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "[scan]\ncomplexity_threshold = 30\n").expect("write config");

    let config = FileConfigLoader::new()
        .load_from_path(&path)
        .expect("load succeeds");
    assert_eq!(config.scan.complexity_threshold, 30);
}

#[test]
fn load_from_missing_path_fails() {
    let dir = TempDir::new().expect("temp dir");
    let result = FileConfigLoader::new().load_from_path(&dir.path().join("missing.toml"));
    assert!(result.is_err());
}

#[test]
fn load_from_invalid_toml_fails() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "not [valid toml").expect("write config");

    assert!(FileConfigLoader::new().load_from_path(&path).is_err());
}

#[test]
fn load_rejects_semantically_invalid_config() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "[scan]\ncomplexity_threshold = 0\n").expect("write config");

    assert!(FileConfigLoader::new().load_from_path(&path).is_err());
}
