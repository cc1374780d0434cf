//! Default configuration values

/// Build recipe file name inside each family directory
pub const RECIPE_FILE: &str = "PKGBUILD";

/// Cached metadata file name inside each family directory
pub const SRCINFO_FILE: &str = ".SRCINFO";

/// Upstream version probe script inside each family directory
pub const LATESTVER_FILE: &str = "LATESTVER";

/// Helper that prints the layered makepkg configuration as JSON
pub const CONF_EXPORTER: &str = "print-makepkgconf";

/// Default package manager configuration
pub const PACMAN_CONF: &str = "/etc/pacman.conf";

/// Mirror list include that never holds local repositories
pub const MIRRORLIST: &str = "/etc/pacman.d/mirrorlist";

/// System-wide makepkg configuration, used when no other candidate exists
pub const SYSTEM_MAKEPKG_CONF: &str = "/etc/makepkg.conf";

/// Default binary package extension
pub const DEFAULT_PKGEXT: &str = ".pkg.tar.zst";

/// Default source package extension
pub const DEFAULT_SRCEXT: &str = ".src.tar.gz";

/// Name suffixes of families built from a live VCS checkout
pub const VCS_SUFFIXES: &[&str] = &["-git", "-svn", "-bzr", "-hg", "-cvs", "-nightly"];

/// Checksum algorithms that may accompany a source list
pub const CHECKSUM_ALGOS: &[&str] = &["md5", "sha1", "sha224", "sha256", "sha384", "sha512", "b2"];

/// Width of the separator printed after each successful build
pub const SEPARATOR_WIDTH: usize = 80;
