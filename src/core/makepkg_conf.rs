//! Build configuration
//!
//! Resolves the makepkg settings this tool depends on. Each value comes from
//! the process environment if set, then from the layered makepkg
//! configuration (exported as JSON by a helper script), then from a built-in
//! default. The result is exported to every external tool invocation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;

use crate::config::defaults::{DEFAULT_PKGEXT, DEFAULT_SRCEXT, SYSTEM_MAKEPKG_CONF};
use crate::error::ConfigError;
use crate::infra::process;

/// Values exported from a makepkg configuration file
#[derive(Debug, Clone, Default)]
pub struct MakepkgConf {
    values: HashMap<String, String>,
}

impl MakepkgConf {
    /// Parse the JSON object printed by the export helper
    ///
    /// Only string values are kept; arrays such as `BUILDENV` are ignored.
    pub fn from_json(json: &str, path: &Path) -> Result<Self, ConfigError> {
        let raw: HashMap<String, serde_json::Value> =
            serde_json::from_str(json).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                error: e.to_string(),
            })?;

        let values = raw
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::String(s) => Some((key, s)),
                _ => None,
            })
            .collect();
        Ok(Self { values })
    }

    /// Run the export helper on a configuration file
    ///
    /// The helper runs with an empty environment so that only the file's own
    /// settings are reported. A missing helper yields an empty configuration.
    pub fn load(exporter: &Path, conf: &Path) -> Result<Self, ConfigError> {
        if !exporter.is_file() {
            tracing::debug!(
                "No configuration exporter at {}, using environment and defaults",
                exporter.display()
            );
            return Ok(Self::default());
        }

        let json = process::capture(Command::new(exporter).env_clear().arg(conf)).map_err(
            |e| ConfigError::Export {
                path: conf.to_path_buf(),
                error: e.to_string(),
            },
        )?;
        Self::from_json(&json, conf)
    }

    /// Get an exported value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Pick the makepkg configuration file to export
///
/// An explicit path wins; otherwise the first existing file among
/// `<root>/makepkg.conf`, `~/.config/pacman/makepkg.conf` and
/// `~/.makepkg.conf`, falling back to the system-wide file.
pub fn find_conf(root: &Path, explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let mut candidates = vec![root.join("makepkg.conf")];
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".config/pacman/makepkg.conf"));
        candidates.push(home.join(".makepkg.conf"));
    }

    candidates
        .into_iter()
        .find(|p| p.exists())
        .unwrap_or_else(|| PathBuf::from(SYSTEM_MAKEPKG_CONF))
}

/// Resolved build settings for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfig {
    /// Target architecture (`CARCH`)
    pub carch: String,
    /// Source download cache (`SRCDEST`)
    pub srcdest: PathBuf,
    /// Binary package extension (`PKGEXT`)
    pub pkgext: String,
    /// Source package extension (`SRCEXT`)
    pub srcext: String,
    /// Source package output directory (`SRCPKGDEST`)
    pub srcpkgdest: PathBuf,
    /// Scratch build directory (`BUILDDIR`)
    pub builddir: PathBuf,
    /// Binary package output directory (`PKGDEST`)
    pub pkgdest: PathBuf,
}

impl BuildConfig {
    /// Resolve settings from the live process environment
    pub fn from_env(conf: &MakepkgConf, root: &Path, databases: &[PathBuf]) -> Self {
        Self::resolve(|key| std::env::var(key).ok(), conf, root, databases)
    }

    /// Resolve settings: `env` first, then `conf`, then defaults
    ///
    /// `PKGDEST` defaults to the directory of the first local repository, or
    /// to `root` when there is none.
    pub fn resolve<F>(env: F, conf: &MakepkgConf, root: &Path, databases: &[PathBuf]) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str, default: String| -> String {
            env(key)
                .filter(|v| !v.is_empty())
                .or_else(|| conf.get(key).filter(|v| !v.is_empty()).map(str::to_string))
                .unwrap_or(default)
        };

        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
        let pkgdest_default = databases
            .first()
            .and_then(|db| db.parent())
            .unwrap_or(root)
            .to_path_buf();

        Self {
            carch: lookup("CARCH", std::env::consts::ARCH.to_string()),
            srcdest: lookup("SRCDEST", path_string(&home.join(".cache/aur"))).into(),
            pkgext: lookup("PKGEXT", DEFAULT_PKGEXT.to_string()),
            srcext: lookup("SRCEXT", DEFAULT_SRCEXT.to_string()),
            srcpkgdest: lookup("SRCPKGDEST", path_string(root)).into(),
            builddir: lookup(
                "BUILDDIR",
                path_string(&std::env::temp_dir().join("makepkg")),
            )
            .into(),
            pkgdest: lookup("PKGDEST", path_string(&pkgdest_default)).into(),
        }
    }

    /// Variables exported to every external tool invocation
    pub fn env_vars(&self) -> Vec<(&'static str, String)> {
        vec![
            ("CARCH", self.carch.clone()),
            ("SRCDEST", path_string(&self.srcdest)),
            ("PKGEXT", self.pkgext.clone()),
            ("SRCEXT", self.srcext.clone()),
            ("SRCPKGDEST", path_string(&self.srcpkgdest)),
            ("BUILDDIR", path_string(&self.builddir)),
            ("PKGDEST", path_string(&self.pkgdest)),
        ]
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
