//! Resolution context
//!
//! The per-run view of which subpackages are still in scope for building,
//! which family owns each of them, and which repository currently holds it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::srcinfo::Srcinfo;

#[derive(Debug, Clone)]
struct PackageEntry {
    family: usize,
    repository: Option<PathBuf>,
}

/// Subpackage name to owning family and assigned repository
#[derive(Debug, Default)]
pub struct ResolutionContext {
    families: Vec<Srcinfo>,
    /// Subpackage names in insertion order
    order: Vec<String>,
    entries: HashMap<String, PackageEntry>,
}

impl ResolutionContext {
    /// Build a context holding every subpackage of the given families
    ///
    /// A subpackage name already claimed by an earlier family is ignored.
    pub fn new(families: Vec<Srcinfo>) -> Self {
        let mut order = Vec::new();
        let mut entries: HashMap<String, PackageEntry> = HashMap::new();

        for (idx, family) in families.iter().enumerate() {
            for pkg in &family.packages {
                if let Some(existing) = entries.get(&pkg.name) {
                    let owner: &str = &families[existing.family].pkgbase;
                    tracing::warn!(
                        "{} is produced by both {owner} and {}, using {owner}",
                        pkg.name,
                        family.pkgbase
                    );
                    continue;
                }
                order.push(pkg.name.clone());
                entries.insert(
                    pkg.name.clone(),
                    PackageEntry {
                        family: idx,
                        repository: None,
                    },
                );
            }
        }

        Self {
            families,
            order,
            entries,
        }
    }

    /// Whether no subpackage is left in scope
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of subpackages in scope
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether a subpackage is in scope
    pub fn contains(&self, pkgname: &str) -> bool {
        self.entries.contains_key(pkgname)
    }

    /// The family owning an in-scope subpackage
    pub fn family_of(&self, pkgname: &str) -> Option<&Srcinfo> {
        self.entries
            .get(pkgname)
            .map(|entry| &self.families[entry.family])
    }

    /// The repository currently holding an in-scope subpackage, if known
    pub fn repository(&self, pkgname: &str) -> Option<&Path> {
        self.entries
            .get(pkgname)
            .and_then(|entry| entry.repository.as_deref())
    }

    /// Record which repository holds a subpackage
    ///
    /// Returns `false` if the subpackage is not in scope.
    pub fn set_repository(&mut self, pkgname: &str, database: PathBuf) -> bool {
        match self.entries.get_mut(pkgname) {
            Some(entry) => {
                entry.repository = Some(database);
                true
            }
            None => false,
        }
    }

    /// Take a subpackage out of scope
    pub fn remove(&mut self, pkgname: &str) -> bool {
        if self.entries.remove(pkgname).is_none() {
            return false;
        }
        self.order.retain(|name| name != pkgname);
        true
    }

    /// In-scope subpackages with their families, in insertion order
    pub fn packages(&self) -> impl Iterator<Item = (&str, &Srcinfo)> {
        self.order.iter().filter_map(move |name| {
            self.entries
                .get(name)
                .map(|entry| (name.as_str(), &self.families[entry.family]))
        })
    }
}
