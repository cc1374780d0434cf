//! Build orchestration logic
//!
//! Builds scheduled families one at a time and registers the resulting
//! archives in their repositories. A family whose build dependency failed is
//! abandoned instead of built.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::context::ResolutionContext;
use crate::core::makepkg_conf::BuildConfig;
use crate::core::resolver::ScheduledFamily;
use crate::core::srcinfo::Srcinfo;
use crate::core::tools::{BuildTool, RepoTool};
use crate::error::BuildError;

/// Outcome of a build run, by `pkgbase`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    /// Built and registered
    pub built: Vec<String>,
    /// Build or registration failed
    pub failed: Vec<String>,
    /// Not attempted because a dependency failed
    pub abandoned: Vec<String>,
}

impl BuildSummary {
    /// Whether every scheduled family was built
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.abandoned.is_empty()
    }
}

/// Sequential build driver
pub struct BuildOrchestrator<'a> {
    build_tool: &'a dyn BuildTool,
    repo_tool: &'a dyn RepoTool,
    config: &'a BuildConfig,
    root: &'a Path,
    databases: &'a [PathBuf],
}

impl<'a> BuildOrchestrator<'a> {
    /// Create a driver for families under `root`
    ///
    /// Archives of subpackages with no known repository go to the first of
    /// `databases`.
    pub fn new(
        build_tool: &'a dyn BuildTool,
        repo_tool: &'a dyn RepoTool,
        config: &'a BuildConfig,
        root: &'a Path,
        databases: &'a [PathBuf],
    ) -> Self {
        Self {
            build_tool,
            repo_tool,
            config,
            root,
            databases,
        }
    }

    /// Build every scheduled family in order
    ///
    /// `unavailable` names families that could not be loaded; a family
    /// depending on one of them by name is abandoned. `on_built` is called
    /// with the `pkgbase` of each family once its archives are registered.
    pub fn run<F>(
        &self,
        context: &ResolutionContext,
        schedule: &[ScheduledFamily<'_>],
        unavailable: &[String],
        mut on_built: F,
    ) -> BuildSummary
    where
        F: FnMut(&str),
    {
        let mut summary = BuildSummary::default();
        let mut broken: HashSet<&str> = unavailable.iter().map(String::as_str).collect();

        for scheduled in schedule {
            let pkgbase = scheduled.srcinfo.pkgbase.as_str();

            let failed_dependency = scheduled
                .dependencies
                .iter()
                .chain(&scheduled.unresolved)
                .find(|d| broken.contains(*d));
            if let Some(dependency) = failed_dependency {
                let err = BuildError::DependencyFailed {
                    package: pkgbase.to_string(),
                    dependency: (*dependency).to_string(),
                };
                tracing::error!("{err}");
                broken.insert(pkgbase);
                summary.abandoned.push(pkgbase.to_string());
                continue;
            }

            match self.build_family(context, scheduled.srcinfo) {
                Ok(()) => {
                    summary.built.push(pkgbase.to_string());
                    on_built(pkgbase);
                }
                Err(e) => {
                    tracing::error!("{pkgbase}: {e}");
                    broken.insert(pkgbase);
                    summary.failed.push(pkgbase.to_string());
                }
            }
        }

        summary
    }

    /// Build one family and register its archives
    pub fn build_family(
        &self,
        context: &ResolutionContext,
        srcinfo: &Srcinfo,
    ) -> Result<(), BuildError> {
        tracing::info!("Building {} {}", srcinfo.pkgbase, srcinfo.version());
        self.build_tool
            .build(&self.root.join(&srcinfo.pkgbase))
            .map_err(|source| BuildError::BuildFailed {
                package: srcinfo.pkgbase.clone(),
                source,
            })?;

        for (database, archives) in self.archive_groups(context, srcinfo) {
            self.repo_tool
                .add(&database, &archives)
                .map_err(|source| BuildError::RegistrationFailed {
                    package: srcinfo.pkgbase.clone(),
                    database: database.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Expected archives of a family grouped by target repository
    ///
    /// Repositories appear in the order their first archive was seen.
    pub fn archive_groups(
        &self,
        context: &ResolutionContext,
        srcinfo: &Srcinfo,
    ) -> Vec<(PathBuf, Vec<PathBuf>)> {
        let mut groups: Vec<(PathBuf, Vec<PathBuf>)> = Vec::new();
        let archives = srcinfo.archives(&self.config.pkgdest, &self.config.pkgext, &self.config.carch);

        for (pkgname, archive) in archives {
            let Some(database) = context
                .repository(&pkgname)
                .or_else(|| self.databases.first().map(PathBuf::as_path))
            else {
                tracing::warn!("No repository for {pkgname}, not registering {}", archive.display());
                continue;
            };

            match groups.iter_mut().find(|(db, _)| db.as_path() == database) {
                Some((_, paths)) => paths.push(archive),
                None => groups.push((database.to_path_buf(), vec![archive])),
            }
        }
        groups
    }
}
