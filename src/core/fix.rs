//! Cached metadata repair
//!
//! Regenerates `.SRCINFO` for families whose recipe changed since it was
//! last written.

use std::path::Path;
use std::sync::Arc;

use crate::core::refresh::{is_stale, read_srcinfo, run_pool, select_families};
use crate::core::srcinfo::Srcinfo;
use crate::core::tools::BuildTool;
use crate::error::RefreshError;

/// Families among `requested` (or all discoverable ones) with stale metadata
///
/// VCS families are always considered.
pub fn stale_families(root: &Path, requested: &[String]) -> Result<Vec<String>, RefreshError> {
    let selection = select_families(root, requested, Some(true))?;
    Ok(selection
        .included
        .into_iter()
        .filter(|pkgbase| is_stale(&root.join(pkgbase)))
        .collect())
}

/// Regenerate stale metadata concurrently
///
/// Returns the regenerated families in request order; an empty result means
/// everything was already current.
pub async fn fix(
    tool: Arc<dyn BuildTool>,
    root: &Path,
    requested: &[String],
    jobs: usize,
) -> Result<Vec<(String, Result<Srcinfo, RefreshError>)>, RefreshError> {
    let stale = stale_families(root, requested)?;
    if stale.is_empty() {
        tracing::info!("All metadata is up to date");
        return Ok(Vec::new());
    }

    let root = root.to_path_buf();
    Ok(run_pool(stale, jobs, move |pkgbase| {
        read_srcinfo(tool.as_ref(), &root.join(pkgbase), pkgbase)
    })
    .await)
}
