//! Filesystem operations
//!
//! Handles file and directory operations.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::FilesystemError;

/// Remove a directory and all its contents
pub fn remove_dir_all(path: &Path) -> Result<(), FilesystemError> {
    if path.exists() {
        std::fs::remove_dir_all(path).map_err(|e| FilesystemError::RemoveDir {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
    }
    Ok(())
}

/// Write content to a file
pub fn write_file(path: &Path, content: &str) -> Result<(), FilesystemError> {
    std::fs::write(path, content).map_err(|e| FilesystemError::WriteFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Read content from a file
pub fn read_file(path: &Path) -> Result<String, FilesystemError> {
    std::fs::read_to_string(path).map_err(|e| FilesystemError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Modification time of a file, or the Unix epoch if it does not exist
pub fn modified_or_epoch(path: &Path) -> SystemTime {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Names of the immediate subdirectories of `dir`, without following symlinks
pub fn subdirectories(dir: &Path) -> Result<Vec<(String, PathBuf)>, FilesystemError> {
    let read_dir_error = |e: std::io::Error| FilesystemError::ReadDir {
        path: dir.to_path_buf(),
        error: e.to_string(),
    };

    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        let is_dir = entry.file_type().map_err(read_dir_error)?.is_dir();
        if is_dir {
            dirs.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
        }
    }
    dirs.sort();
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_epoch() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            modified_or_epoch(&dir.path().join("nope")),
            SystemTime::UNIX_EPOCH
        );
    }

    #[test]
    fn test_modified_time_is_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("file");
        write_file(&path, "x").unwrap();
        let when = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        std::fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(when)
            .unwrap();
        assert_eq!(modified_or_epoch(&path), when);
    }

    #[test]
    fn test_subdirectories_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("zeta")).unwrap();
        std::fs::create_dir(dir.path().join("alpha")).unwrap();
        write_file(&dir.path().join("file"), "").unwrap();

        let names: Vec<String> = subdirectories(dir.path())
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_remove_missing_dir_is_ok() {
        let dir = TempDir::new().unwrap();
        assert!(remove_dir_all(&dir.path().join("missing")).is_ok());
    }
}
