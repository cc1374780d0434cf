//! Upstream version checks
//!
//! A family may carry an executable `LATESTVER` script that prints candidate
//! upstream versions, one per line. Candidates newer than the packaged
//! version are reported.

use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use serde::Serialize;

use crate::config::defaults::LATESTVER_FILE;
use crate::core::refresh::{is_vcs, read_srcinfo, run_pool};
use crate::core::tools::BuildTool;
use crate::core::version::is_newer;
use crate::error::RefreshError;
use crate::infra::process;

/// Result of checking one family
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestVersions {
    /// Family name
    pub pkgbase: String,
    /// Packaged `pkgver-pkgrel`
    pub current: String,
    /// Reported candidates newer than `current`
    pub newer: Vec<String>,
}

impl LatestVersions {
    pub fn is_outdated(&self) -> bool {
        !self.newer.is_empty()
    }
}

/// Candidate versions from script output
///
/// Anything up to the first `:` on a line is a label and is dropped.
pub fn parse_candidates(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| line.split_once(':').map_or(line, |(_, version)| version).trim())
        .filter(|version| !version.is_empty())
        .map(str::to_string)
        .collect()
}

/// Check one family against its `LATESTVER` script
///
/// Returns `None` when the family has no script.
pub fn check_family(
    tool: &dyn BuildTool,
    root: &Path,
    pkgbase: &str,
    env: &[(&'static str, String)],
) -> Result<Option<LatestVersions>, RefreshError> {
    let dir = root.join(pkgbase);
    let script = dir.join(LATESTVER_FILE);
    if !script.is_file() {
        if is_vcs(pkgbase) {
            tracing::debug!("{pkgbase} has no {LATESTVER_FILE}");
        } else {
            tracing::warn!("{pkgbase} has no {LATESTVER_FILE}");
        }
        return Ok(None);
    }

    let srcinfo = read_srcinfo(tool, &dir, pkgbase)?;
    let current = format!("{}-{}", srcinfo.pkgver, srcinfo.pkgrel);

    let output = process::capture(
        Command::new(&script)
            .current_dir(&dir)
            .envs(env.iter().map(|(k, v)| (*k, v))),
    )
    .map_err(|source| RefreshError::LatestVersion {
        pkgbase: pkgbase.to_string(),
        source,
    })?;

    let newer = parse_candidates(&output)
        .into_iter()
        .filter(|candidate| is_newer(candidate, &current))
        .collect();

    Ok(Some(LatestVersions {
        pkgbase: pkgbase.to_string(),
        current,
        newer,
    }))
}

/// Check every named family concurrently, in request order
pub async fn check_all(
    tool: Arc<dyn BuildTool>,
    root: &Path,
    names: Vec<String>,
    jobs: usize,
    env: Vec<(&'static str, String)>,
) -> Vec<(String, Result<Option<LatestVersions>, RefreshError>)> {
    let root = root.to_path_buf();
    run_pool(names, jobs, move |pkgbase| {
        check_family(tool.as_ref(), &root, pkgbase, &env)
    })
    .await
}
