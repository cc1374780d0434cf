//! Local repository databases
//!
//! Finds the `file://` repositories configured in the package manager
//! configuration and reads package entries out of a database listing.

use std::path::{Path, PathBuf};

use crate::config::defaults::MIRRORLIST;
use crate::error::ConfigError;

/// A package recorded in a repository database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbEntry {
    /// Package name
    pub name: String,
    /// Full version (`[epoch:]pkgver-pkgrel`)
    pub version: String,
}

/// Parse an archive listing of a repository database
///
/// Each package is a directory member named `<name>-<pkgver>-<pkgrel>/`; the
/// name ends at the second-to-last `-`. Other members are ignored.
pub fn parse_listing(listing: &str) -> Vec<DbEntry> {
    listing
        .lines()
        .filter_map(|line| {
            let dir = line.strip_suffix('/')?;
            if dir.contains('/') {
                return None;
            }
            let Some(split) = dir.rfind('-').and_then(|last| dir[..last].rfind('-')) else {
                tracing::warn!("Ignoring malformed database entry '{line}'");
                return None;
            };
            Some(DbEntry {
                name: dir[..split].to_string(),
                version: dir[split + 1..].to_string(),
            })
        })
        .collect()
}

/// Find every local (`file://`) repository database in a pacman.conf
///
/// `Include` directives are followed (except the mirror list); each
/// `Server = file://<dir>` inside a `[section]` resolves to the canonical path
/// of `<dir>/<section>.db`.
pub fn local_databases(pacman_conf: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let mut databases = Vec::new();
    collect_databases(pacman_conf, None, &mut databases)?;
    Ok(databases)
}

fn collect_databases(
    path: &Path,
    mut section: Option<String>,
    databases: &mut Vec<PathBuf>,
) -> Result<(), ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    for line in content.lines() {
        let line = line.trim();
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = Some(name.to_string());
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "Include" if value != MIRRORLIST => {
                collect_databases(Path::new(value), section.clone(), databases)?;
            }
            "Server" => {
                let (Some(dir), Some(name)) = (value.strip_prefix("file://"), &section) else {
                    continue;
                };
                let db = Path::new(dir).join(format!("{name}.db"));
                let db = std::fs::canonicalize(&db).map_err(|e| ConfigError::Database {
                    path: db.clone(),
                    error: e.to_string(),
                })?;
                databases.push(db);
            }
            _ => {}
        }
    }

    Ok(())
}
