use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{ApexGuardError, Result};

/// Suffix appended to a file's full name to form its backup sibling.
pub const BACKUP_SUFFIX: &str = ".backup";

/// What happens to a backup once its file passes verification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackupPolicy {
    /// Leave the backup on disk as an audit trail.
    #[default]
    Retain,
    /// Delete the backup once the file is verified regression-free.
    CleanOnSuccess,
}

/// Path of the backup sibling for `path`: `<path>.backup`.
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Copy `path` to its backup sibling.
///
/// The backup is the rollback capability: it must exist from the first
/// fix write until verification completes for the file.
///
/// # Errors
/// Returns an error if the copy fails.
pub fn create_backup(path: &Path) -> Result<PathBuf> {
    let backup = backup_path(path);
    fs::copy(path, &backup).map_err(|e| ApexGuardError::Backup {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(backup)
}

#[must_use]
pub fn has_backup(path: &Path) -> bool {
    backup_path(path).exists()
}

/// Restore `path` from its backup sibling and delete the backup.
///
/// # Errors
/// Returns an error if the backup is missing, the copy fails, or the
/// backup cannot be removed afterwards.
pub fn restore_backup(path: &Path) -> Result<()> {
    let backup = backup_path(path);
    fs::copy(&backup, path).map_err(|e| ApexGuardError::Restore {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::remove_file(&backup).map_err(|e| ApexGuardError::Restore {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

/// Delete the backup sibling of `path`, if present.
///
/// # Errors
/// Returns an error if the backup exists but cannot be removed.
pub fn remove_backup(path: &Path) -> Result<()> {
    let backup = backup_path(path);
    if backup.exists() {
        fs::remove_file(&backup)?;
    }
    Ok(())
}

/// SHA-256 hash of a string, hex encoded. Recorded at fix time so a
/// rollback can be checked byte-for-byte against the pre-fix content.
#[must_use]
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
#[path = "backup_tests.rs"]
mod tests;
