//! External tool seams
//!
//! The build tool and the repository tools are only observed through their
//! exit status and output. These traits are what the pipeline and the build
//! driver talk to; [`crate::infra`] provides the real implementations.

use std::path::{Path, PathBuf};

use crate::core::repository::DbEntry;
use crate::error::ToolError;

/// The recipe build tool (makepkg)
pub trait BuildTool: Send + Sync {
    /// Print machine-readable metadata for the recipe in `dir`
    fn print_srcinfo(&self, dir: &Path) -> Result<String, ToolError>;

    /// Fetch sources and update the recipe version without building
    ///
    /// `builddir` is the scratch build directory to use for this run.
    fn refresh_sources(&self, dir: &Path, builddir: &Path) -> Result<(), ToolError>;

    /// Build and package the recipe in `dir`, forcing a rebuild
    fn build(&self, dir: &Path) -> Result<(), ToolError>;
}

/// The repository database tools (archive listing and repo-add)
pub trait RepoTool {
    /// List the packages recorded in a repository database
    fn list_packages(&self, database: &Path) -> Result<Vec<DbEntry>, ToolError>;

    /// Add archives to a repository database, removing stale entries
    fn add(&self, database: &Path, archives: &[PathBuf]) -> Result<(), ToolError>;
}
