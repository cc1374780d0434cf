//! Repository database tools
//!
//! Real [`RepoTool`] that lists databases with `tar` and registers archives
//! with `repo-add`.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::repository::{parse_listing, DbEntry};
use crate::core::tools::RepoTool;
use crate::error::ToolError;
use crate::infra::process;

/// `tar` + `repo-add`
#[derive(Debug, Clone)]
pub struct RepoAdd {
    tar: PathBuf,
    repo_add: PathBuf,
}

impl Default for RepoAdd {
    fn default() -> Self {
        Self {
            tar: PathBuf::from("tar"),
            repo_add: PathBuf::from("repo-add"),
        }
    }
}

impl RepoAdd {
    /// Use specific executables
    pub fn new(tar: impl Into<PathBuf>, repo_add: impl Into<PathBuf>) -> Self {
        Self {
            tar: tar.into(),
            repo_add: repo_add.into(),
        }
    }
}

impl RepoTool for RepoAdd {
    fn list_packages(&self, database: &Path) -> Result<Vec<DbEntry>, ToolError> {
        let listing = process::capture(Command::new(&self.tar).arg("-t").arg("-f").arg(database))?;
        Ok(parse_listing(&listing))
    }

    fn add(&self, database: &Path, archives: &[PathBuf]) -> Result<(), ToolError> {
        tracing::info!(
            "Adding {} package(s) to {}",
            archives.len(),
            database.display()
        );
        process::run(Command::new(&self.repo_add).arg("-R").arg(database).args(archives))
    }
}
