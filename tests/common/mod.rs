#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Creates an `assert_cmd` Command for the apex-guard binary.
#[macro_export]
macro_rules! apex_guard {
    () => {
        assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("apex-guard"))
    };
}

/// Temporary directory with Apex test fixtures for integration tests.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    /// Creates a new test fixture with an empty temp directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Creates a file with the given content in the temp directory.
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Returns the path to the temp directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Reads a file back from the temp directory.
    pub fn read_file(&self, relative_path: &str) -> String {
        fs::read_to_string(self.dir.path().join(relative_path)).expect("Failed to read file")
    }

    /// Whether a path exists relative to the temp directory.
    pub fn exists(&self, relative_path: &str) -> bool {
        self.dir.path().join(relative_path).exists()
    }

    /// Creates an apex-guard config file.
    pub fn create_config(&self, content: &str) {
        self.create_file(".apex-guard.toml", content);
    }
}

/// A class that passes every rule.
pub const CLEAN_CLASS: &str = "\
public with sharing class CleanService {
    private Integer counter = 0;

    public Integer bump() {
        counter++;
        return counter;
    }
}
";

/// A class with an unguarded insert whose sObject type is inferable.
pub const UNGUARDED_INSERT_CLASS: &str = "\
public with sharing class AccountService {
    public void save() {
        Account acc = new Account();
        insert acc;
    }
}
";

/// A public class with no sharing declaration.
pub const NO_SHARING_CLASS: &str = "\
public class OpenService {
    private Integer counter = 0;
}
";

/// A class with a dynamic query built by string concatenation.
pub const INJECTION_CLASS: &str = "\
public with sharing class QueryService {
    public List<SObject> find(String name) {
        return Database.query('SELECT Id FROM Account WHERE Name = ' + name);
    }
}
";
