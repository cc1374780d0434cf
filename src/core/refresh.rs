//! Metadata refresh pipeline
//!
//! Selects the families to work on, brings their cached `.SRCINFO` up to
//! date and parses it. Per-family work runs on a bounded pool; results come
//! back in request order whatever order the tasks finish in.

use std::path::Path;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::config::defaults::{RECIPE_FILE, SRCINFO_FILE, VCS_SUFFIXES};
use crate::core::srcinfo::Srcinfo;
use crate::core::tools::BuildTool;
use crate::error::RefreshError;
use crate::infra::filesystem;

/// Whether a family builds from a live version-control checkout
pub fn is_vcs(pkgbase: &str) -> bool {
    VCS_SUFFIXES.iter().any(|suffix| pkgbase.ends_with(suffix))
}

/// Families picked for a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Families to process, in order
    pub included: Vec<String>,
    /// VCS families left out by the inclusion policy
    pub skipped: Vec<String>,
}

/// Choose the families to process
///
/// With an empty `requested` list every directory of `root` holding a recipe
/// is discovered, in sorted order. `devel` forces VCS families in or out;
/// when unset they are included for explicit requests and excluded for
/// discovery.
pub fn select_families(
    root: &Path,
    requested: &[String],
    devel: Option<bool>,
) -> Result<Selection, RefreshError> {
    let candidates = if requested.is_empty() {
        discover(root)?
    } else {
        for pkgbase in requested {
            let dir = root.join(pkgbase);
            if !dir.is_dir() {
                return Err(RefreshError::FamilyMissing {
                    pkgbase: pkgbase.clone(),
                });
            }
            if !dir.join(RECIPE_FILE).exists() {
                return Err(RefreshError::RecipeMissing {
                    pkgbase: pkgbase.clone(),
                });
            }
        }
        requested.to_vec()
    };

    let include_vcs = devel.unwrap_or(!requested.is_empty());
    let mut selection = Selection::default();
    for pkgbase in candidates {
        if is_vcs(&pkgbase) && !include_vcs {
            tracing::warn!("Skipping {pkgbase}: VCS package");
            selection.skipped.push(pkgbase);
        } else {
            selection.included.push(pkgbase);
        }
    }
    Ok(selection)
}

fn discover(root: &Path) -> Result<Vec<String>, RefreshError> {
    let mut found = Vec::new();
    for (name, dir) in filesystem::subdirectories(root)? {
        let recipe = dir.join(RECIPE_FILE);
        if recipe.is_file() {
            found.push(name);
        } else if recipe.exists() {
            tracing::error!("{name}/{RECIPE_FILE} is not a regular file");
        }
    }
    Ok(found)
}

/// Whether the cached metadata of the family in `dir` is older than its recipe
///
/// A missing cache counts as infinitely old.
pub fn is_stale(dir: &Path) -> bool {
    filesystem::modified_or_epoch(&dir.join(SRCINFO_FILE))
        < filesystem::modified_or_epoch(&dir.join(RECIPE_FILE))
}

/// Parse the cached metadata of the family in `dir`, regenerating it if stale
pub fn read_srcinfo(
    tool: &dyn BuildTool,
    dir: &Path,
    pkgbase: &str,
) -> Result<Srcinfo, RefreshError> {
    let path = dir.join(SRCINFO_FILE);
    let text = if is_stale(dir) {
        tracing::info!("Regenerating {pkgbase}/{SRCINFO_FILE}");
        let text = tool
            .print_srcinfo(dir)
            .map_err(|source| RefreshError::Generate {
                pkgbase: pkgbase.to_string(),
                source,
            })?;
        filesystem::write_file(&path, &text)?;
        text
    } else {
        filesystem::read_file(&path)?
    };

    Srcinfo::parse(text.lines(), &path.display().to_string()).map_err(|source| {
        RefreshError::Parse {
            pkgbase: pkgbase.to_string(),
            source,
        }
    })
}

/// Load one family, refreshing VCS sources first
///
/// The scratch directory `builddir/<pkgbase>` left by the refresh is removed.
pub fn load_family(
    tool: &dyn BuildTool,
    root: &Path,
    pkgbase: &str,
    builddir: &Path,
) -> Result<Srcinfo, RefreshError> {
    let dir = root.join(pkgbase);
    if is_vcs(pkgbase) {
        tracing::info!("Updating {pkgbase} sources");
        tool.refresh_sources(&dir, builddir)
            .map_err(|source| RefreshError::VcsRefresh {
                pkgbase: pkgbase.to_string(),
                source,
            })?;
        filesystem::remove_dir_all(&builddir.join(pkgbase))?;
    }
    read_srcinfo(tool, &dir, pkgbase)
}

/// Run `work` for every family on a pool of `jobs` workers
///
/// Results are returned in the order of `names`. Failures are logged with
/// the family name and do not affect the other tasks.
pub async fn run_pool<T, F>(
    names: Vec<String>,
    jobs: usize,
    work: F,
) -> Vec<(String, Result<T, RefreshError>)>
where
    T: Send + 'static,
    F: Fn(&str) -> Result<T, RefreshError> + Send + Sync + 'static,
{
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let work = Arc::new(work);

    let handles: Vec<_> = names
        .iter()
        .map(|name| {
            let sem = semaphore.clone();
            let work = work.clone();
            let name = name.clone();

            tokio::spawn(async move {
                let _permit = match sem.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return Err(RefreshError::Task {
                            pkgbase: name,
                            error: e.to_string(),
                        })
                    }
                };
                let task_name = name.clone();
                match tokio::task::spawn_blocking(move || work(&task_name)).await {
                    Ok(result) => result,
                    Err(e) => Err(RefreshError::Task {
                        pkgbase: name,
                        error: e.to_string(),
                    }),
                }
            })
        })
        .collect();

    let joined = join_all(handles).await;
    let mut results = Vec::with_capacity(joined.len());
    for (name, joined) in names.into_iter().zip(joined) {
        let result = match joined {
            Ok(result) => result,
            Err(e) => Err(RefreshError::Task {
                pkgbase: name.clone(),
                error: e.to_string(),
            }),
        };
        if let Err(e) = &result {
            tracing::error!("{name}: {e}");
        }
        results.push((name, result));
    }

    results
}

/// Load the metadata of every named family concurrently
pub async fn refresh_all(
    tool: Arc<dyn BuildTool>,
    root: &Path,
    names: Vec<String>,
    jobs: usize,
    builddir: &Path,
) -> Vec<(String, Result<Srcinfo, RefreshError>)> {
    let root = root.to_path_buf();
    let builddir = builddir.to_path_buf();
    run_pool(names, jobs, move |pkgbase| {
        load_family(tool.as_ref(), &root, pkgbase, &builddir)
    })
    .await
}
