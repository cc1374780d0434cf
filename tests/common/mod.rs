//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use repobuild::core::repository::DbEntry;
use repobuild::core::tools::{BuildTool, RepoTool};
use repobuild::error::ToolError;
use tempfile::TempDir;

/// Test package root
///
/// Creates a temporary directory holding one directory per package base and
/// provides utilities for setting up test scenarios.
pub struct TestProject {
    /// Temporary directory for the package root
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new package root in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the package root
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the package root
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Check if a file exists in the package root
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the package root
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Set the modification time of a file, in seconds after the epoch
    pub fn set_mtime(&self, name: &str, secs: u64) {
        std::fs::File::options()
            .write(true)
            .open(self.dir.path().join(name))
            .expect("Failed to open file")
            .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .expect("Failed to set modification time");
    }

    /// Add a family whose cached metadata is newer than its recipe
    pub fn add_family(&self, pkgbase: &str, srcinfo: &str) {
        let recipe = format!("{pkgbase}/PKGBUILD");
        let cached = format!("{pkgbase}/.SRCINFO");
        self.create_file(&recipe, "# recipe\n");
        self.create_file(&cached, srcinfo);
        self.set_mtime(&recipe, 1_000);
        self.set_mtime(&cached, 2_000);
    }

    /// Add a family with a recipe but no cached metadata
    pub fn add_stale_family(&self, pkgbase: &str) {
        self.create_file(&format!("{pkgbase}/PKGBUILD"), "# recipe\n");
    }

    /// Write an executable script
    #[cfg(unix)]
    pub fn write_script(&self, name: &str, content: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        self.create_file(name, content);
        let path = self.dir.path().join(name);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make script executable");
        path
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Metadata for a single-package family
pub fn srcinfo(pkgbase: &str, pkgver: &str, extra: &str) -> String {
    format!(
        "pkgbase = {pkgbase}\n\tpkgver = {pkgver}\n\tpkgrel = 1\n\tarch = x86_64\n{extra}\npkgname = {pkgbase}\n"
    )
}

/// Build tool that generates metadata from a fixed table and records builds
#[derive(Default)]
pub struct FakeBuildTool {
    /// `pkgbase` to generated metadata
    pub metadata: Vec<(String, String)>,
    /// Families whose build fails
    pub failing: Vec<String>,
    /// Families refreshed, in call order
    pub refreshed: Mutex<Vec<String>>,
    /// Families built, in call order
    pub built: Mutex<Vec<String>>,
}

fn family_name(dir: &Path) -> String {
    dir.file_name()
        .expect("family dir has a name")
        .to_string_lossy()
        .into_owned()
}

fn failure(dir: &Path) -> ToolError {
    ToolError::Failed {
        program: "makepkg".to_string(),
        dir: dir.to_path_buf(),
        status: "exit status: 1".to_string(),
        stderr: String::new(),
    }
}

impl BuildTool for FakeBuildTool {
    fn print_srcinfo(&self, dir: &Path) -> Result<String, ToolError> {
        let name = family_name(dir);
        self.metadata
            .iter()
            .find(|(pkgbase, _)| *pkgbase == name)
            .map(|(_, text)| text.clone())
            .ok_or_else(|| failure(dir))
    }

    fn refresh_sources(&self, dir: &Path, _builddir: &Path) -> Result<(), ToolError> {
        self.refreshed.lock().unwrap().push(family_name(dir));
        Ok(())
    }

    fn build(&self, dir: &Path) -> Result<(), ToolError> {
        let name = family_name(dir);
        if self.failing.contains(&name) {
            return Err(failure(dir));
        }
        self.built.lock().unwrap().push(name);
        Ok(())
    }
}

/// Repository tool over in-memory databases
#[derive(Default)]
pub struct FakeRepoTool {
    /// Database path to its entries
    pub databases: Vec<(PathBuf, Vec<DbEntry>)>,
    /// Registration calls, in order
    pub added: Mutex<Vec<(PathBuf, Vec<PathBuf>)>>,
}

impl FakeRepoTool {
    /// A repository tool with one database holding `entries` (name, version)
    pub fn with_database(database: &Path, entries: &[(&str, &str)]) -> Self {
        Self {
            databases: vec![(
                database.to_path_buf(),
                entries
                    .iter()
                    .map(|(name, version)| DbEntry {
                        name: (*name).to_string(),
                        version: (*version).to_string(),
                    })
                    .collect(),
            )],
            added: Mutex::default(),
        }
    }
}

impl RepoTool for FakeRepoTool {
    fn list_packages(&self, database: &Path) -> Result<Vec<DbEntry>, ToolError> {
        Ok(self
            .databases
            .iter()
            .find(|(db, _)| db == database)
            .map(|(_, entries)| entries.clone())
            .unwrap_or_default())
    }

    fn add(&self, database: &Path, archives: &[PathBuf]) -> Result<(), ToolError> {
        self.added
            .lock()
            .unwrap()
            .push((database.to_path_buf(), archives.to_vec()));
        Ok(())
    }
}
