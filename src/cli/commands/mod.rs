//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod build;
pub mod fix;
pub mod outofdate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::config::defaults::CONF_EXPORTER;
use crate::core::makepkg_conf::{find_conf, BuildConfig, MakepkgConf};
use crate::core::repository::local_databases;
use crate::infra::makepkg::Makepkg;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build outdated packages and add them to their repositories
    Build {
        /// Package bases to consider (all packages if not specified)
        packages: Vec<String>,

        #[command(flatten)]
        devel: DevelFlags,
    },

    /// Regenerate stale .SRCINFO files
    Fix {
        /// Package bases to fix (all packages if not specified)
        packages: Vec<String>,
    },

    /// Report packages with a newer upstream version
    Outofdate {
        /// Package bases to check (all packages if not specified)
        packages: Vec<String>,

        #[command(flatten)]
        devel: DevelFlags,
    },
}

/// Explicit inclusion or exclusion of VCS packages
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct DevelFlags {
    /// Include VCS packages (-git, -svn, ...)
    #[arg(long, conflicts_with = "no_devel")]
    pub devel: bool,

    /// Exclude VCS packages
    #[arg(long)]
    pub no_devel: bool,
}

impl DevelFlags {
    /// `None` when neither flag was given
    pub fn resolve(self) -> Option<bool> {
        match (self.devel, self.no_devel) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Run-wide settings shared by every command
#[derive(Debug, Clone)]
pub struct Session {
    /// Package root
    pub root: PathBuf,
    /// pacman.conf to read local repositories from
    pub pacman_conf: PathBuf,
    /// Explicit makepkg.conf, if any
    pub makepkg_conf: Option<PathBuf>,
    /// Worker pool size
    pub jobs: usize,
    /// Print machine-readable results
    pub json: bool,
    /// Suppress progress output
    pub quiet: bool,
}

impl Session {
    /// Local repository databases from pacman.conf
    pub fn databases(&self) -> Result<Vec<PathBuf>> {
        local_databases(&self.pacman_conf).with_context(|| {
            format!(
                "Failed to read local repositories from {}",
                self.pacman_conf.display()
            )
        })
    }

    /// Resolve the build configuration for this run
    pub fn build_config(&self, databases: &[PathBuf]) -> Result<BuildConfig> {
        let conf = find_conf(&self.root, self.makepkg_conf.as_deref());
        tracing::debug!("Using makepkg configuration {}", conf.display());
        let exported = MakepkgConf::load(&self.root.join(CONF_EXPORTER), &conf)?;
        Ok(BuildConfig::from_env(&exported, &self.root, databases))
    }

    /// makepkg configured for this run
    pub fn makepkg(&self, config: &BuildConfig) -> Result<Makepkg> {
        Ok(Makepkg::locate()
            .context("makepkg is required")?
            .with_config(config))
    }
}

impl Commands {
    /// Execute the command
    pub async fn run(self, session: &Session) -> Result<()> {
        match self {
            Self::Build { packages, devel } => {
                build::execute(session, &packages, devel.resolve()).await
            }
            Self::Fix { packages } => fix::execute(session, &packages).await,
            Self::Outofdate { packages, devel } => {
                outofdate::execute(session, &packages, devel.resolve()).await
            }
        }
    }
}
