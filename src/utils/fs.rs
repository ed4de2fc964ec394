//! File system utilities.

use crate::Result;
use std::path::{Path, PathBuf};

/// Check if a path exists and is a directory.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(crate::Error::PathNotFound(path.display().to_string()));
    }
    if !path.is_dir() {
        return Err(crate::Error::NotADirectory(path.display().to_string()));
    }
    Ok(())
}

/// Get file extension in lowercase.
pub fn get_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Result of a best-effort recursive delete.
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Entries removed.
    pub removed: usize,
    /// Entries that could not be removed, with the reason.
    pub failed: Vec<(PathBuf, std::io::Error)>,
}

impl CleanupReport {
    /// True when everything (or nothing) was removable.
    pub fn fully_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Recursively delete a directory, tolerating undeletable entries.
///
/// Locked or permission-protected files are collected and logged as
/// warnings instead of aborting the walk; the directory itself is removed
/// only if it ends up empty.
pub fn remove_dir_best_effort(path: &Path) -> CleanupReport {
    let mut report = CleanupReport::default();
    remove_recursive(path, &mut report);
    report
}

fn remove_recursive(path: &Path, report: &mut CleanupReport) {
    let entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Cannot list {}: {}", path.display(), e);
            report.failed.push((path.to_path_buf(), e));
            return;
        }
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let entry_path = entry.path();
        if entry_path.is_dir() {
            remove_recursive(&entry_path, report);
        } else {
            match std::fs::remove_file(&entry_path) {
                Ok(()) => report.removed += 1,
                Err(e) => {
                    tracing::warn!("Cannot remove {}: {}", entry_path.display(), e);
                    report.failed.push((entry_path, e));
                }
            }
        }
    }

    match std::fs::remove_dir(path) {
        Ok(()) => report.removed += 1,
        Err(e) => {
            tracing::warn!("Cannot remove directory {}: {}", path.display(), e);
            report.failed.push((path.to_path_buf(), e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_get_extension() {
        assert_eq!(get_extension(&PathBuf::from("a.MKV")), Some("mkv".into()));
        assert_eq!(get_extension(&PathBuf::from("a.srt")), Some("srt".into()));
        assert_eq!(get_extension(&PathBuf::from("noext")), None);
    }
}
