mod loader;

pub use loader::{ConfigLoader, FileConfigLoader};

use serde::{Deserialize, Serialize};

use crate::error::{ApexGuardError, Result};
use crate::fixer::BackupPolicy;
use crate::priority::FixMode;
use crate::rules::DEFAULT_COMPLEXITY_THRESHOLD;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".apex-guard.toml";

fn default_extensions() -> Vec<String> {
    vec!["cls".to_string(), "trigger".to_string()]
}

const fn default_true() -> bool {
    true
}

const fn default_complexity_threshold() -> u32 {
    DEFAULT_COMPLEXITY_THRESHOLD
}

const fn default_critical_mode() -> FixMode {
    FixMode::Conditional
}

const fn default_important_mode() -> FixMode {
    FixMode::Never
}

const fn default_cleanup_mode() -> FixMode {
    FixMode::Always
}

/// Scan configuration: which files are read and how rules behave.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanConfig {
    /// File extensions treated as Apex source.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Scan files classified as test code. Their findings are reported
    /// but never auto-fixed either way.
    #[serde(default = "default_true")]
    pub include_test_code: bool,

    /// Respect .gitignore rules while walking.
    #[serde(default)]
    pub use_gitignore: bool,

    /// Cognitive complexity score above which methods are flagged.
    #[serde(default = "default_complexity_threshold")]
    pub complexity_threshold: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            include_test_code: true,
            use_gitignore: false,
            complexity_threshold: DEFAULT_COMPLEXITY_THRESHOLD,
        }
    }
}

/// Exclude patterns (glob syntax) applied during the walk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExcludeConfig {
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Auto-fix policy: per-tier fix modes and the backup lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixConfig {
    #[serde(default = "default_critical_mode")]
    pub critical: FixMode,

    #[serde(default = "default_important_mode")]
    pub important: FixMode,

    #[serde(default = "default_cleanup_mode")]
    pub cleanup: FixMode,

    #[serde(default)]
    pub backup_policy: BackupPolicy,
}

impl Default for FixConfig {
    fn default() -> Self {
        Self {
            critical: FixMode::Conditional,
            important: FixMode::Never,
            cleanup: FixMode::Always,
            backup_policy: BackupPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub exclude: ExcludeConfig,

    #[serde(default)]
    pub fix: FixConfig,
}

impl Config {
    /// Validate semantic correctness beyond what serde enforces.
    ///
    /// # Errors
    /// Returns a `Config` error describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.scan.complexity_threshold == 0 {
            return Err(ApexGuardError::Config(
                "scan.complexity_threshold must be at least 1".to_string(),
            ));
        }

        if self.scan.extensions.is_empty() {
            return Err(ApexGuardError::Config(
                "scan.extensions cannot be empty".to_string(),
            ));
        }

        for pattern in &self.exclude.patterns {
            globset::Glob::new(pattern).map_err(|e| ApexGuardError::InvalidPattern {
                pattern: pattern.clone(),
                source: e,
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
