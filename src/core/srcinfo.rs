//! Package family metadata (.SRCINFO)
//!
//! Parses the line-oriented `key = value` export of a build recipe into a
//! [`Srcinfo`] record: shared base attributes plus one [`Subpackage`] per
//! `pkgname`, with overridable fields inherited from the base.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::defaults::CHECKSUM_ALGOS;
use crate::error::{SrcinfoError, SrcinfoErrorKind};

/// How repeated declarations of a field behave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// A second declaration in the same scope is an error
    Scalar,
    /// Declarations accumulate in order
    Array,
}

/// Where a field may be declared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Only before the first `pkgname`
    BaseOnly,
    /// At base level, and again inside a `pkgname` section to override it
    Overridable,
}

/// Array fields without an architecture suffix
const ARRAY_FIELDS: &[&str] = &[
    "pkgname", "arch", "groups", "license", "noextract", "options", "backup",
    "validpgpkeys", "source", "conflicts", "provides", "replaces", "depends",
    "makedepends", "checkdepends", "optdepends", "md5sums", "sha1sums",
    "sha224sums", "sha256sums", "sha384sums", "sha512sums", "b2sums",
];

/// Array fields that may also carry an `_<arch>` suffix
const ARCH_ARRAY_PREFIXES: &[&str] = &["source", "conflicts", "provides", "replaces"];

/// Fields a `pkgname` section may override
const OVERRIDABLE_FIELDS: &[&str] = &[
    "pkgdesc", "url", "install", "changelog", "arch", "groups", "license",
    "noextract", "options", "backup", "depends", "optdepends", "conflicts",
    "provides", "replaces",
];

/// Overridable fields that may also carry an `_<arch>` suffix
const ARCH_OVERRIDABLE_PREFIXES: &[&str] =
    &["depends", "optdepends", "conflicts", "provides", "replaces"];

/// Arity of a field name
pub fn arity(key: &str) -> Arity {
    let suffixed = key.contains('_')
        && (key.contains("sums")
            || key.contains("depends")
            || ARCH_ARRAY_PREFIXES.iter().any(|p| key.starts_with(p)));
    if suffixed || ARRAY_FIELDS.contains(&key) {
        Arity::Array
    } else {
        Arity::Scalar
    }
}

/// Scope of a field name
pub fn scope(key: &str) -> Scope {
    let suffixed =
        key.contains('_') && ARCH_OVERRIDABLE_PREFIXES.iter().any(|p| key.starts_with(p));
    if suffixed || OVERRIDABLE_FIELDS.contains(&key) {
        Scope::Overridable
    } else {
        Scope::BaseOnly
    }
}

/// Field storage for one scope (base or a single subpackage)
///
/// Architecture-specific variants are stored under their suffixed name, e.g.
/// `depends_x86_64`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    scalars: BTreeMap<String, String>,
    arrays: BTreeMap<String, Vec<String>>,
}

impl Fields {
    /// Scalar value of a field
    pub fn get(&self, key: &str) -> Option<&str> {
        self.scalars.get(key).map(String::as_str)
    }

    /// Values of an array field; empty when undeclared
    pub fn array(&self, key: &str) -> &[String] {
        self.arrays.get(key).map_or(&[], Vec::as_slice)
    }

    /// Whether the field was declared in this scope (possibly as empty)
    pub fn contains(&self, key: &str) -> bool {
        self.scalars.contains_key(key) || self.arrays.contains_key(key)
    }

    fn insert_scalar(&mut self, key: &str, value: &str) -> Result<(), SrcinfoErrorKind> {
        if self.scalars.contains_key(key) {
            return Err(SrcinfoErrorKind::DeclaredTwice(key.to_string()));
        }
        self.scalars.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn push(&mut self, key: &str, value: &str) {
        let values = self.arrays.entry(key.to_string()).or_default();
        // `key = ` declares the field empty, which still blocks inheritance
        if !value.is_empty() {
            values.push(value.to_string());
        }
    }

    fn inherit(&mut self, base: &Fields) {
        for (key, value) in &base.scalars {
            if scope(key) == Scope::Overridable && !self.contains(key) {
                self.scalars.insert(key.clone(), value.clone());
            }
        }
        for (key, values) in &base.arrays {
            if scope(key) == Scope::Overridable && !self.contains(key) {
                self.arrays.insert(key.clone(), values.clone());
            }
        }
    }

    fn write_to(&self, f: &mut fmt::Formatter<'_>, indent: &str) -> fmt::Result {
        for (key, value) in &self.scalars {
            writeln!(f, "{indent}{key} = {value}")?;
        }
        for (key, values) in &self.arrays {
            if values.is_empty() {
                writeln!(f, "{indent}{key} = ")?;
            }
            for value in values {
                writeln!(f, "{indent}{key} = {value}")?;
            }
        }
        Ok(())
    }
}

/// One named output of a package family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subpackage {
    /// Subpackage name (`pkgname`)
    pub name: String,
    /// Target architectures, inherited from the base unless overridden
    pub arch: Vec<String>,
    /// Overridden and inherited fields
    pub fields: Fields,
}

impl Subpackage {
    /// Whether this subpackage is architecture-independent
    pub fn is_any_arch(&self) -> bool {
        self.arch.iter().any(|a| a == "any")
    }
}

/// A parsed source declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Local file name of the downloaded source
    pub filename: String,
    /// `local`, or the URL scheme (`https`, `git`, ...)
    pub protocol: String,
    /// URL with any `proto+` prefix removed
    pub url: String,
}

/// Metadata of one package family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Srcinfo {
    /// Family name (`pkgbase`)
    pub pkgbase: String,
    /// Upstream version (`pkgver`)
    pub pkgver: String,
    /// Release number (`pkgrel`)
    pub pkgrel: String,
    /// Optional version-ordering override
    pub epoch: Option<String>,
    /// Declared architectures
    pub arch: Vec<String>,
    /// Every other base-level field
    pub fields: Fields,
    /// Subpackages in declaration order
    pub packages: Vec<Subpackage>,
}

fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*([^=\s]+?)\s*=\s*(.*?)\s*$").expect("srcinfo line pattern is valid")
    })
}

/// Parser state for the scope currently being filled
enum Section {
    Base,
    Package(usize),
}

struct RawPackage {
    name: String,
    arch: Option<Vec<String>>,
    fields: Fields,
}

impl Srcinfo {
    /// Parse metadata from lines of text
    ///
    /// `origin` is only used in error messages.
    pub fn parse<I, S>(lines: I, origin: &str) -> Result<Self, SrcinfoError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fail = |line: usize, kind: SrcinfoErrorKind| SrcinfoError {
            origin: origin.to_string(),
            line,
            kind,
        };

        let mut pkgbase: Option<String> = None;
        let mut arch: Option<Vec<String>> = None;
        let mut base = Fields::default();
        let mut packages: Vec<RawPackage> = Vec::new();
        let mut section = Section::Base;
        let mut lineno = 0;

        for (i, line) in lines.into_iter().enumerate() {
            lineno = i + 1;
            let line = line.as_ref();
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let captures = line_pattern()
                .captures(line)
                .ok_or_else(|| fail(lineno, SrcinfoErrorKind::InvalidLine(line.to_string())))?;
            let key = &captures[1];
            let value = &captures[2];

            match key {
                "pkgbase" => {
                    if pkgbase.is_some() {
                        return Err(fail(lineno, SrcinfoErrorKind::DuplicatePkgbase));
                    }
                    if matches!(section, Section::Package(_)) {
                        return Err(fail(lineno, SrcinfoErrorKind::PkgbaseAfterPkgname));
                    }
                    pkgbase = Some(value.to_string());
                }
                "pkgname" => {
                    if packages.iter().any(|p| p.name == value) {
                        return Err(fail(
                            lineno,
                            SrcinfoErrorKind::DuplicatePkgname(value.to_string()),
                        ));
                    }
                    packages.push(RawPackage {
                        name: value.to_string(),
                        arch: None,
                        fields: Fields::default(),
                    });
                    section = Section::Package(packages.len() - 1);
                }
                _ => {
                    let (target_arch, fields) = match section {
                        Section::Base => (&mut arch, &mut base),
                        Section::Package(idx) => {
                            if scope(key) == Scope::BaseOnly {
                                return Err(fail(
                                    lineno,
                                    SrcinfoErrorKind::BaseOnlyField(key.to_string()),
                                ));
                            }
                            let pkg = &mut packages[idx];
                            (&mut pkg.arch, &mut pkg.fields)
                        }
                    };

                    if key == "arch" {
                        let values = target_arch.get_or_insert_with(Vec::new);
                        if !value.is_empty() {
                            values.push(value.to_string());
                        }
                    } else if arity(key) == Arity::Array {
                        fields.push(key, value);
                    } else {
                        fields
                            .insert_scalar(key, value)
                            .map_err(|kind| fail(lineno, kind))?;
                    }
                }
            }
        }

        let arch = arch.ok_or_else(|| fail(lineno, SrcinfoErrorKind::ArchMissing))?;
        if arch.len() >= 2 && arch.iter().any(|a| a == "any") {
            return Err(fail(lineno, SrcinfoErrorKind::ArchConflict));
        }
        let pkgbase =
            pkgbase.ok_or_else(|| fail(lineno, SrcinfoErrorKind::MissingField("pkgbase".into())))?;

        let mut required = |key: &str| {
            base.scalars
                .remove(key)
                .ok_or_else(|| fail(lineno, SrcinfoErrorKind::MissingField(key.to_string())))
        };
        let pkgver = required("pkgver")?;
        let pkgrel = required("pkgrel")?;
        let epoch = base.scalars.remove("epoch");

        let mut srcinfo = Self {
            pkgbase,
            pkgver,
            pkgrel,
            epoch,
            arch,
            fields: base,
            packages: Vec::new(),
        };

        srcinfo
            .check_checksum_lengths()
            .map_err(|kind| fail(lineno, kind))?;

        srcinfo.packages = packages
            .into_iter()
            .map(|raw| {
                let mut fields = raw.fields;
                fields.inherit(&srcinfo.fields);
                Subpackage {
                    name: raw.name,
                    arch: raw.arch.unwrap_or_else(|| srcinfo.arch.clone()),
                    fields,
                }
            })
            .collect();

        Ok(srcinfo)
    }

    /// Parse metadata from a string
    pub fn parse_str(content: &str) -> Result<Self, SrcinfoError> {
        Self::parse(content.lines(), "<string>")
    }

    fn check_checksum_lengths(&self) -> Result<(), SrcinfoErrorKind> {
        for suffix in self.archsuffixes() {
            let sources = format!("source{suffix}");
            if !self.fields.contains(&sources) {
                continue;
            }
            for algo in CHECKSUM_ALGOS {
                let checksums = format!("{algo}sums{suffix}");
                if self.fields.contains(&checksums)
                    && self.fields.array(&sources).len() != self.fields.array(&checksums).len()
                {
                    return Err(SrcinfoErrorKind::ChecksumLength { sources, checksums });
                }
            }
        }
        Ok(())
    }

    /// Field-name suffixes for every architecture variant
    ///
    /// Always starts with `""`; adds `_<arch>` per declared architecture
    /// unless the family is architecture-independent.
    pub fn archsuffixes(&self) -> Vec<String> {
        let mut suffixes = vec![String::new()];
        if self.arch.first().map(String::as_str) != Some("any") {
            suffixes.extend(self.arch.iter().map(|a| format!("_{a}")));
        }
        suffixes
    }

    /// Full version: `[epoch:]pkgver-pkgrel`
    pub fn version(&self) -> String {
        match &self.epoch {
            Some(epoch) => format!("{epoch}:{}-{}", self.pkgver, self.pkgrel),
            None => format!("{}-{}", self.pkgver, self.pkgrel),
        }
    }

    /// Look up a subpackage by name
    pub fn package(&self, name: &str) -> Option<&Subpackage> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// Base-level build dependencies (`depends`, `makedepends`, `checkdepends`)
    ///
    /// Split-package specific dependencies are not included.
    pub fn build_depends(&self) -> impl Iterator<Item = &str> {
        ["depends", "makedepends", "checkdepends"]
            .into_iter()
            .flat_map(|key| self.fields.array(key))
            .map(String::as_str)
    }

    /// Virtual packages a subpackage provides, including `provides_<carch>`
    pub fn provides<'a>(&'a self, pkgname: &str, carch: &str) -> Vec<&'a str> {
        let Some(pkg) = self.package(pkgname) else {
            return Vec::new();
        };
        let arch_key = format!("provides_{carch}");
        pkg.fields
            .array("provides")
            .iter()
            .chain(pkg.fields.array(&arch_key))
            .map(String::as_str)
            .collect()
    }

    /// Parsed source list for an architecture suffix (`""` for the generic list)
    pub fn sources(&self, suffix: &str) -> Vec<SourceEntry> {
        self.fields
            .array(&format!("source{suffix}"))
            .iter()
            .map(|s| split_source(s))
            .collect()
    }

    /// Expected archive path of every subpackage after a build
    ///
    /// `{pkgdest}/{pkgname}-{version}-{arch}{pkgext}`, where arch is `any` for
    /// architecture-independent subpackages and `carch` otherwise.
    pub fn archives(&self, pkgdest: &Path, pkgext: &str, carch: &str) -> Vec<(String, PathBuf)> {
        let version = self.version();
        self.packages
            .iter()
            .map(|pkg| {
                let arch = if pkg.is_any_arch() { "any" } else { carch };
                let file = format!("{}-{version}-{arch}{pkgext}", pkg.name);
                (pkg.name.clone(), pkgdest.join(file))
            })
            .collect()
    }
}

impl FromStr for Srcinfo {
    type Err = SrcinfoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl fmt::Display for Srcinfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "pkgbase = {}", self.pkgbase)?;
        writeln!(f, "\tpkgver = {}", self.pkgver)?;
        writeln!(f, "\tpkgrel = {}", self.pkgrel)?;
        if let Some(epoch) = &self.epoch {
            writeln!(f, "\tepoch = {epoch}")?;
        }
        write_arch(f, &self.arch)?;
        self.fields.write_to(f, "\t")?;

        for pkg in &self.packages {
            writeln!(f)?;
            writeln!(f, "pkgname = {}", pkg.name)?;
            write_arch(f, &pkg.arch)?;
            pkg.fields.write_to(f, "\t")?;
        }
        Ok(())
    }
}

// An empty list is written as a bare declaration so it is not inherited back.
fn write_arch(f: &mut fmt::Formatter<'_>, arch: &[String]) -> fmt::Result {
    if arch.is_empty() {
        return writeln!(f, "\tarch = ");
    }
    for value in arch {
        writeln!(f, "\tarch = {value}")?;
    }
    Ok(())
}

/// Split a `[filename::]url` source declaration
///
/// The protocol is `local` when the URL has no `://`, otherwise its scheme
/// with any `proto+` prefix taking precedence (`git+https` is `git`). Without
/// an explicit filename it is derived from the last path segment of the URL.
pub fn split_source(source: &str) -> SourceEntry {
    let (filename, url) = match source.rsplit_once("::") {
        Some((filename, url)) => (filename, url),
        None => ("", source),
    };

    let (protocol, url) = match url.find("://") {
        Some(i) => match url[..i].find('+') {
            Some(j) => (&url[..j], &url[j + 1..]),
            None => (&url[..i], url),
        },
        None => ("local", url),
    };

    let filename = if filename.is_empty() {
        let path = if protocol == "local" {
            url
        } else {
            let without_fragment = url.split('#').next().unwrap_or(url);
            without_fragment.split('?').next().unwrap_or(without_fragment)
        };
        let name = path.trim_end_matches('/').rsplit('/').next().unwrap_or("");
        if protocol == "git" {
            name.strip_suffix(".git").unwrap_or(name).to_string()
        } else {
            name.to_string()
        }
    } else {
        filename.to_string()
    };

    SourceEntry {
        filename,
        protocol: protocol.to_string(),
        url: url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPLIT: &str = "\
pkgbase = foo
\tpkgdesc = The foo suite
\tpkgver = 1.2
\tpkgrel = 3
\tarch = x86_64
\tarch = aarch64
\tlicense = MIT
\tmakedepends = cmake
\tdepends = glibc
\tsource = foo-1.2.tar.gz::https://example.com/foo/archive/1.2.tar.gz
\tsource_x86_64 = https://example.com/blob-x86_64.bin
\tsha256sums = SKIP
\tsha256sums_x86_64 = SKIP

pkgname = foo
\tprovides = libfoo.so=1-64

pkgname = foo-docs
\tpkgdesc = Documentation for foo
\tarch = any
\tdepends =
";

    #[test]
    fn test_parse_split_package() {
        let info: Srcinfo = SPLIT.parse().unwrap();

        assert_eq!(info.pkgbase, "foo");
        assert_eq!(info.version(), "1.2-3");
        assert_eq!(info.arch, vec!["x86_64", "aarch64"]);
        assert_eq!(info.packages.len(), 2);

        let foo = info.package("foo").unwrap();
        assert_eq!(foo.fields.get("pkgdesc"), Some("The foo suite"));
        assert_eq!(foo.fields.array("depends"), ["glibc"]);
        assert_eq!(foo.arch, vec!["x86_64", "aarch64"]);

        let docs = info.package("foo-docs").unwrap();
        assert_eq!(docs.fields.get("pkgdesc"), Some("Documentation for foo"));
        assert!(docs.fields.contains("depends"));
        assert!(docs.fields.array("depends").is_empty());
        assert!(docs.is_any_arch());
        assert!(!docs.fields.contains("makedepends"));
    }

    #[test]
    fn test_comments_and_blank_lines_ignored() {
        let info = Srcinfo::parse_str(
            "# generated\n\npkgbase = a\n  # indented comment\n\tpkgver = 1\n\tpkgrel = 1\n\tarch = any\npkgname = a\n",
        )
        .unwrap();
        assert_eq!(info.pkgbase, "a");
    }

    #[test]
    fn test_invalid_line_reports_line() {
        let err = Srcinfo::parse_str("pkgbase = a\nthis is not valid\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(
            err.kind,
            SrcinfoErrorKind::InvalidLine("this is not valid".to_string())
        );
        assert!(err.to_string().starts_with("<string>:2:"));
    }

    #[test]
    fn test_pkgbase_errors() {
        let err = Srcinfo::parse_str("pkgbase = a\npkgbase = b\n").unwrap_err();
        assert_eq!(err.kind, SrcinfoErrorKind::DuplicatePkgbase);

        let err = Srcinfo::parse_str("pkgname = a\npkgbase = b\n").unwrap_err();
        assert_eq!(err.kind, SrcinfoErrorKind::PkgbaseAfterPkgname);
    }

    #[test]
    fn test_scalar_declared_twice() {
        let err = Srcinfo::parse_str("pkgbase = a\npkgver = 1\npkgver = 2\n").unwrap_err();
        assert_eq!(err.kind, SrcinfoErrorKind::DeclaredTwice("pkgver".to_string()));
    }

    #[test]
    fn test_base_only_field_in_subpackage() {
        for key in ["makedepends", "pkgver", "source", "sha256sums", "checkdepends"] {
            let text = format!("pkgbase = a\npkgver = 1\npkgrel = 1\narch = any\npkgname = a\n{key} = x\n");
            let err = Srcinfo::parse_str(&text).unwrap_err();
            assert_eq!(err.kind, SrcinfoErrorKind::BaseOnlyField(key.to_string()));
        }
    }

    #[test]
    fn test_arch_rules() {
        let err = Srcinfo::parse_str("pkgbase = a\npkgver = 1\npkgrel = 1\npkgname = a\n").unwrap_err();
        assert_eq!(err.kind, SrcinfoErrorKind::ArchMissing);

        let err = Srcinfo::parse_str(
            "pkgbase = a\npkgver = 1\npkgrel = 1\narch = any\narch = x86_64\npkgname = a\n",
        )
        .unwrap_err();
        assert_eq!(err.kind, SrcinfoErrorKind::ArchConflict);
    }

    #[test]
    fn test_checksum_length_mismatch() {
        let err = Srcinfo::parse_str(
            "pkgbase = a\npkgver = 1\npkgrel = 1\narch = x86_64\nsource = a.tar\nsource = b.tar\nmd5sums = SKIP\npkgname = a\n",
        )
        .unwrap_err();
        assert_eq!(
            err.kind,
            SrcinfoErrorKind::ChecksumLength {
                sources: "source".to_string(),
                checksums: "md5sums".to_string(),
            }
        );

        let err = Srcinfo::parse_str(
            "pkgbase = a\npkgver = 1\npkgrel = 1\narch = x86_64\nsource_x86_64 = a.tar\nb2sums_x86_64 = SKIP\nb2sums_x86_64 = SKIP\npkgname = a\n",
        )
        .unwrap_err();
        assert!(matches!(err.kind, SrcinfoErrorKind::ChecksumLength { .. }));
    }

    #[test]
    fn test_duplicate_checksums_are_kept() {
        let info = Srcinfo::parse_str(
            "pkgbase = a\npkgver = 1\npkgrel = 1\narch = any\nsource = a.tar\nsource = b.tar\nsha256sums = SKIP\nsha256sums = SKIP\npkgname = a\n",
        )
        .unwrap();
        assert_eq!(info.fields.array("sha256sums").len(), 2);
    }

    #[test]
    fn test_field_classification() {
        assert_eq!(arity("depends"), Arity::Array);
        assert_eq!(arity("depends_x86_64"), Arity::Array);
        assert_eq!(arity("makedepends_i686"), Arity::Array);
        assert_eq!(arity("sha512sums_aarch64"), Arity::Array);
        assert_eq!(arity("source_armv7h"), Arity::Array);
        assert_eq!(arity("pkgdesc"), Arity::Scalar);
        assert_eq!(arity("install"), Arity::Scalar);

        assert_eq!(scope("pkgdesc"), Scope::Overridable);
        assert_eq!(scope("provides_x86_64"), Scope::Overridable);
        assert_eq!(scope("makedepends"), Scope::BaseOnly);
        assert_eq!(scope("makedepends_x86_64"), Scope::BaseOnly);
        assert_eq!(scope("pkgver"), Scope::BaseOnly);
    }

    #[test]
    fn test_archsuffixes() {
        let info: Srcinfo = SPLIT.parse().unwrap();
        assert_eq!(info.archsuffixes(), vec!["", "_x86_64", "_aarch64"]);

        let any = Srcinfo::parse_str("pkgbase = a\npkgver = 1\npkgrel = 1\narch = any\npkgname = a\n")
            .unwrap();
        assert_eq!(any.archsuffixes(), vec![String::new()]);
    }

    #[test]
    fn test_version_with_epoch() {
        let info = Srcinfo::parse_str(
            "pkgbase = a\npkgver = 1.0\npkgrel = 2\nepoch = 3\narch = any\npkgname = a\n",
        )
        .unwrap();
        assert_eq!(info.version(), "3:1.0-2");
    }

    #[test]
    fn test_provides_includes_arch_variant() {
        let info = Srcinfo::parse_str(
            "pkgbase = a\npkgver = 1\npkgrel = 1\narch = x86_64\npkgname = a\nprovides = foo=2\nprovides_x86_64 = bar\n",
        )
        .unwrap();
        assert_eq!(info.provides("a", "x86_64"), vec!["foo=2", "bar"]);
        assert_eq!(info.provides("a", "aarch64"), vec!["foo=2"]);
        assert!(info.provides("missing", "x86_64").is_empty());
    }

    #[test]
    fn test_archives() {
        let info: Srcinfo = SPLIT.parse().unwrap();
        let archives = info.archives(Path::new("/repo"), ".pkg.tar.zst", "x86_64");
        assert_eq!(
            archives,
            vec![
                (
                    "foo".to_string(),
                    PathBuf::from("/repo/foo-1.2-3-x86_64.pkg.tar.zst")
                ),
                (
                    "foo-docs".to_string(),
                    PathBuf::from("/repo/foo-docs-1.2-3-any.pkg.tar.zst")
                ),
            ]
        );
    }

    #[test]
    fn test_display_reparses_to_same_record() {
        let info: Srcinfo = SPLIT.parse().unwrap();
        let reparsed: Srcinfo = info.to_string().parse().unwrap();
        assert_eq!(info, reparsed);
    }

    #[test]
    fn test_display_keeps_empty_subpackage_arch() {
        let info = Srcinfo::parse_str(
            "pkgbase = foo\npkgver = 1\npkgrel = 1\narch = x86_64\n\npkgname = foo\narch =\n",
        )
        .unwrap();
        assert!(info.packages[0].arch.is_empty());

        let text = info.to_string();
        assert!(text.contains("pkgname = foo\n\tarch = \n"));
        assert_eq!(Srcinfo::parse_str(&text).unwrap(), info);
    }

    #[test]
    fn test_split_source() {
        let cases = [
            ("foo.patch", "foo.patch", "local", "foo.patch"),
            (
                "https://example.com/foo-1.0.tar.gz",
                "foo-1.0.tar.gz",
                "https",
                "https://example.com/foo-1.0.tar.gz",
            ),
            (
                "git+https://github.com/user/repo.git#tag=v1",
                "repo",
                "git",
                "https://github.com/user/repo.git#tag=v1",
            ),
            (
                "src.tgz::https://example.com/download?id=3",
                "src.tgz",
                "https",
                "https://example.com/download?id=3",
            ),
            (
                "https://example.com/dir/?x=1",
                "dir",
                "https",
                "https://example.com/dir/?x=1",
            ),
        ];

        for (raw, filename, protocol, url) in cases {
            let entry = split_source(raw);
            assert_eq!(entry.filename, filename, "{raw}");
            assert_eq!(entry.protocol, protocol, "{raw}");
            assert_eq!(entry.url, url, "{raw}");
        }
    }

    #[test]
    fn test_sources_for_suffix() {
        let info: Srcinfo = SPLIT.parse().unwrap();
        let generic = info.sources("");
        assert_eq!(generic[0].filename, "foo-1.2.tar.gz");
        let x86 = info.sources("_x86_64");
        assert_eq!(x86[0].filename, "blob-x86_64.bin");
    }
}
