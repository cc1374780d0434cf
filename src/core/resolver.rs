//! Dependency resolution
//!
//! Computes the build order of the families left in a [`ResolutionContext`].
//! Dependencies are matched against in-scope subpackages first and then
//! against declared `provides`; anything else is assumed to be satisfied
//! from outside. Cycles are broken by marking a family visited before its
//! dependencies are walked, so a cyclic chain is truncated rather than
//! reported.

use std::collections::{HashMap, HashSet};

use crate::core::context::ResolutionContext;
use crate::core::srcinfo::Srcinfo;
use crate::core::version::Requirement;

/// Virtual package name to the families that provide it
#[derive(Debug, Default)]
pub struct ProvidesIndex<'a> {
    entries: HashMap<&'a str, Vec<(&'a Srcinfo, &'a str)>>,
}

impl<'a> ProvidesIndex<'a> {
    /// Index the `provides` (and `provides_<carch>`) of every in-scope subpackage
    ///
    /// A provide without `=version` is recorded at the family's `pkgver`.
    pub fn build(context: &'a ResolutionContext, carch: &str) -> Self {
        let mut entries: HashMap<&'a str, Vec<(&'a Srcinfo, &'a str)>> = HashMap::new();
        for (pkgname, family) in context.packages() {
            for provide in family.provides(pkgname, carch) {
                let (name, version) = provide
                    .split_once('=')
                    .unwrap_or((provide, family.pkgver.as_str()));
                entries.entry(name).or_default().push((family, version));
            }
        }
        Self { entries }
    }

    /// Families providing `name`, with the provided version
    pub fn lookup(&self, name: &str) -> &[(&'a Srcinfo, &'a str)] {
        self.entries.get(name).map_or(&[], Vec::as_slice)
    }
}

/// A family in build order, with the in-scope families it depends on
#[derive(Debug, Clone)]
pub struct ScheduledFamily<'a> {
    /// The family to build
    pub srcinfo: &'a Srcinfo,
    /// `pkgbase` of every in-scope family one of its dependencies resolved to
    pub dependencies: Vec<&'a str>,
    /// Dependency names no in-scope family satisfies
    pub unresolved: Vec<&'a str>,
}

/// Order the in-scope families so that dependencies are built first
///
/// Roots are visited in the context's insertion order, so the result is
/// deterministic for a given context.
pub fn schedule<'a>(context: &'a ResolutionContext, carch: &str) -> Vec<ScheduledFamily<'a>> {
    let mut scheduler = Scheduler {
        context,
        index: ProvidesIndex::build(context, carch),
        visited: HashSet::new(),
        order: Vec::new(),
    };

    for (_, family) in context.packages() {
        scheduler.visit(family);
    }

    scheduler.order
}

struct Scheduler<'a> {
    context: &'a ResolutionContext,
    index: ProvidesIndex<'a>,
    visited: HashSet<&'a str>,
    order: Vec<ScheduledFamily<'a>>,
}

impl<'a> Scheduler<'a> {
    fn visit(&mut self, family: &'a Srcinfo) {
        if !self.visited.insert(&family.pkgbase) {
            return;
        }

        let mut dependencies: Vec<&'a str> = Vec::new();
        let mut unresolved: Vec<&'a str> = Vec::new();
        for raw in family.build_depends() {
            let requirement = Requirement::parse(raw);
            let candidates = self.candidates(&requirement);
            if candidates.is_empty() {
                unresolved.push(&raw[..requirement.name.len()]);
            }
            for candidate in candidates {
                let pkgbase = candidate.pkgbase.as_str();
                if pkgbase != family.pkgbase && !dependencies.contains(&pkgbase) {
                    dependencies.push(pkgbase);
                }
                self.visit(candidate);
            }
        }

        tracing::debug!("Scheduled {} after {:?}", family.pkgbase, dependencies);
        self.order.push(ScheduledFamily {
            srcinfo: family,
            dependencies,
            unresolved,
        });
    }

    fn candidates(&self, requirement: &Requirement) -> Vec<&'a Srcinfo> {
        let found: Vec<(&'a Srcinfo, &'a str)> = match self.context.family_of(&requirement.name) {
            Some(family) => vec![(family, family.pkgver.as_str())],
            None => self.index.lookup(&requirement.name).to_vec(),
        };

        found
            .into_iter()
            .filter(|(_, version)| requirement.is_satisfied_by(version))
            .map(|(family, _)| family)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family(pkgbase: &str, pkgver: &str, extra: &str) -> Srcinfo {
        Srcinfo::parse_str(&format!(
            "pkgbase = {pkgbase}\npkgver = {pkgver}\npkgrel = 1\narch = x86_64\n{extra}\npkgname = {pkgbase}\n"
        ))
        .unwrap()
    }

    fn order(scheduled: &[ScheduledFamily<'_>]) -> Vec<String> {
        scheduled
            .iter()
            .map(|s| s.srcinfo.pkgbase.clone())
            .collect()
    }

    #[test]
    fn test_simple_dependency_order() {
        let context = ResolutionContext::new(vec![
            family("a", "1.0", "depends = b"),
            family("b", "1.0", "makedepends = c"),
            family("c", "1.0", ""),
        ]);

        let scheduled = schedule(&context, "x86_64");
        assert_eq!(order(&scheduled), vec!["c", "b", "a"]);
        assert_eq!(scheduled[2].dependencies, vec!["b"]);
        assert_eq!(scheduled[1].dependencies, vec!["c"]);
        assert!(scheduled[0].dependencies.is_empty());
    }

    #[test]
    fn test_cycle_is_truncated() {
        let context = ResolutionContext::new(vec![
            family("a", "1.0", "depends = b"),
            family("b", "1.0", "checkdepends = a"),
        ]);

        let scheduled = schedule(&context, "x86_64");
        assert_eq!(order(&scheduled), vec!["b", "a"]);
    }

    #[test]
    fn test_external_dependency_is_ignored() {
        let context = ResolutionContext::new(vec![family("a", "1.0", "depends = glibc>=2.38")]);
        let scheduled = schedule(&context, "x86_64");
        assert_eq!(order(&scheduled), vec!["a"]);
        assert!(scheduled[0].dependencies.is_empty());
        assert_eq!(scheduled[0].unresolved, vec!["glibc"]);
    }

    #[test]
    fn test_unsatisfied_version_is_unresolved() {
        let context = ResolutionContext::new(vec![
            family("app", "1.0", "depends = lib>=2\nmakedepends = lib"),
            family("lib", "1.5", ""),
        ]);
        let scheduled = schedule(&context, "x86_64");
        assert_eq!(order(&scheduled), vec!["lib", "app"]);
        assert_eq!(scheduled[1].dependencies, vec!["lib"]);
        assert_eq!(scheduled[1].unresolved, vec!["lib"]);
    }

    #[test]
    fn test_versioned_provides() {
        let context = ResolutionContext::new(vec![
            family("app", "1.0", "depends = foo>=2.0"),
            family("bar", "3.0", "provides = foo=2.5"),
        ]);
        let scheduled = schedule(&context, "x86_64");
        assert_eq!(order(&scheduled), vec!["bar", "app"]);
        assert_eq!(scheduled[1].dependencies, vec!["bar"]);

        let context = ResolutionContext::new(vec![
            family("app", "1.0", "depends = foo>=2.0"),
            family("bar", "3.0", "provides = foo=1.0"),
        ]);
        let scheduled = schedule(&context, "x86_64");
        assert_eq!(order(&scheduled), vec!["app", "bar"]);
        assert!(scheduled[0].dependencies.is_empty());
    }

    #[test]
    fn test_unversioned_provide_uses_pkgver() {
        let context = ResolutionContext::new(vec![
            family("app", "1.0", "depends = foo>=2.0"),
            family("bar", "2.1", "provides = foo"),
        ]);
        let index = ProvidesIndex::build(&context, "x86_64");
        let found: Vec<&str> = index.lookup("foo").iter().map(|(_, v)| *v).collect();
        assert_eq!(found, vec!["2.1"]);

        assert_eq!(order(&schedule(&context, "x86_64")), vec!["bar", "app"]);
    }

    #[test]
    fn test_arch_specific_provides() {
        let context = ResolutionContext::new(vec![
            family("app", "1.0", "depends = libfoo"),
            family("foo", "1.0", "provides_x86_64 = libfoo"),
        ]);
        assert_eq!(order(&schedule(&context, "x86_64")), vec!["foo", "app"]);
        assert_eq!(order(&schedule(&context, "aarch64")), vec!["app", "foo"]);
    }

    #[test]
    fn test_real_package_beats_provider() {
        let context = ResolutionContext::new(vec![
            family("app", "1.0", "depends = foo>=2.0"),
            family("foo", "1.0", ""),
            family("foo-ng", "3.0", "provides = foo=3.0"),
        ]);
        let scheduled = schedule(&context, "x86_64");
        assert_eq!(order(&scheduled), vec!["app", "foo", "foo-ng"]);
        assert!(scheduled[0].dependencies.is_empty());
    }

    #[test]
    fn test_removed_package_is_not_a_candidate() {
        let mut context = ResolutionContext::new(vec![
            family("a", "1.0", "depends = b"),
            family("b", "1.0", ""),
        ]);
        context.remove("b");
        let scheduled = schedule(&context, "x86_64");
        assert_eq!(order(&scheduled), vec!["a"]);
    }

    #[test]
    fn test_each_family_appears_once() {
        let context = ResolutionContext::new(vec![
            family("a", "1.0", "depends = c\ndepends = b"),
            family("b", "1.0", "depends = c"),
            family("c", "1.0", ""),
        ]);
        let scheduled = schedule(&context, "x86_64");
        assert_eq!(order(&scheduled), vec!["c", "b", "a"]);
        assert_eq!(scheduled[2].dependencies, vec!["c", "b"]);
    }
}
