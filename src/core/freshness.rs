//! Repository freshness filter
//!
//! Drops subpackages whose repository copy is already current and records
//! which repository holds the ones that need rebuilding.

use std::path::{Path, PathBuf};

use crate::core::context::ResolutionContext;
use crate::core::repository::DbEntry;
use crate::core::tools::RepoTool;
use crate::core::version::is_newer;
use crate::error::ToolError;

/// Apply the entries of one repository database to the context
///
/// An entry older than the family's version keeps the subpackage in scope
/// and assigns it to `database`; any other entry takes it out of scope.
/// Returns the number of subpackages removed.
pub fn filter_entries(
    context: &mut ResolutionContext,
    database: &Path,
    entries: &[DbEntry],
) -> usize {
    let mut removed = 0;
    for entry in entries {
        let Some(family) = context.family_of(&entry.name) else {
            continue;
        };
        let current = family.version();

        if is_newer(&current, &entry.version) {
            tracing::debug!(
                "{} {} in {} is older than {current}",
                entry.name,
                entry.version,
                database.display()
            );
            context.set_repository(&entry.name, database.to_path_buf());
        } else {
            tracing::info!("Skipping {}: up-to-date", entry.name);
            context.remove(&entry.name);
            removed += 1;
        }
    }
    removed
}

/// List every local repository database and filter the context against it
pub fn filter_up_to_date(
    context: &mut ResolutionContext,
    databases: &[PathBuf],
    repo: &dyn RepoTool,
) -> Result<usize, ToolError> {
    let mut removed = 0;
    for database in databases {
        let entries = repo.list_packages(database)?;
        removed += filter_entries(context, database, &entries);
    }
    Ok(removed)
}
