//! Error types for repobuild
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Metadata (.SRCINFO) parse error
///
/// Always fatal to the single family being parsed.
#[derive(Error, Debug)]
#[error("{origin}:{line}: {kind}")]
pub struct SrcinfoError {
    /// Where the text came from (file path or `<string>`)
    pub origin: String,
    /// 1-based line number the error was detected at
    pub line: usize,
    /// What went wrong
    pub kind: SrcinfoErrorKind,
}

/// The structural problem behind a [`SrcinfoError`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SrcinfoErrorKind {
    /// Line is neither blank, a comment, nor `key = value`
    #[error("invalid srcinfo line '{0}'")]
    InvalidLine(String),

    /// `pkgbase` appeared twice
    #[error("pkgbase declared more than once")]
    DuplicatePkgbase,

    /// `pkgbase` appeared inside a `pkgname` section
    #[error("pkgbase declared after pkgname")]
    PkgbaseAfterPkgname,

    /// The same `pkgname` section was opened twice
    #[error("pkgname {0} declared more than once")]
    DuplicatePkgname(String),

    /// A base-only field was declared inside a `pkgname` section
    #[error("{0} can only be in pkgbase")]
    BaseOnlyField(String),

    /// A scalar field was declared twice in the same scope
    #[error("{0} declared more than once")]
    DeclaredTwice(String),

    /// No `arch` declaration at all
    #[error("arch not specified")]
    ArchMissing,

    /// `arch` lists both `any` and concrete architectures
    #[error("package cannot be arch-specific and arch-independent simultaneously")]
    ArchConflict,

    /// A checksum list does not line up with its source list
    #[error("{sources} and {checksums} have different lengths")]
    ChecksumLength { sources: String, checksums: String },

    /// A field required to identify the family is absent
    #[error("{0} not specified")]
    MissingField(String),
}

/// External tool invocation errors
#[derive(Error, Debug)]
pub enum ToolError {
    /// The program could not be started
    #[error("Failed to run '{program}': {error}")]
    Spawn { program: String, error: String },

    /// The program exited unsuccessfully
    #[error("'{program}' failed in '{dir}' ({status}){stderr}")]
    Failed {
        program: String,
        dir: PathBuf,
        status: String,
        stderr: String,
    },

    /// The program printed something that is not UTF-8
    #[error("'{program}' produced invalid output: {error}")]
    InvalidOutput { program: String, error: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Failed to list a directory
    #[error("Failed to read directory '{path}': {error}")]
    ReadDir { path: PathBuf, error: String },
}

/// Metadata refresh pipeline errors
#[derive(Error, Debug)]
pub enum RefreshError {
    /// A requested family has no build recipe
    #[error("{pkgbase}/PKGBUILD does not exist")]
    RecipeMissing { pkgbase: String },

    /// A requested family has no directory under the package root
    #[error("package {pkgbase} does not exist")]
    FamilyMissing { pkgbase: String },

    /// Refreshing VCS sources failed
    #[error("could not update {pkgbase}/PKGBUILD: {source}")]
    VcsRefresh { pkgbase: String, source: ToolError },

    /// Generating metadata failed
    #[error("could not generate {pkgbase}/.SRCINFO: {source}")]
    Generate { pkgbase: String, source: ToolError },

    /// Cached metadata could not be parsed
    #[error("invalid metadata for {pkgbase}: {source}")]
    Parse {
        pkgbase: String,
        source: SrcinfoError,
    },

    /// The latest-version script failed
    #[error("could not check latest version of {pkgbase}: {source}")]
    LatestVersion { pkgbase: String, source: ToolError },

    /// A pooled task died before reporting a result
    #[error("metadata task for {pkgbase} did not complete: {error}")]
    Task { pkgbase: String, error: String },

    /// Filesystem error
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// Run-level configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file
    #[error("Failed to read config file '{path}': {error}")]
    ReadError { path: PathBuf, error: String },

    /// Failed to resolve a local repository path
    #[error("Failed to resolve repository database '{path}': {error}")]
    Database { path: PathBuf, error: String },

    /// The configuration export helper failed
    #[error("could not load {path}: {error}")]
    Export { path: PathBuf, error: String },

    /// The configuration export helper printed something unusable
    #[error("Failed to parse exported configuration for '{path}': {error}")]
    ParseError { path: PathBuf, error: String },

    /// No `file://` repository is configured
    #[error("no local repository found in '{path}'")]
    NoLocalRepository { path: PathBuf },
}

/// Build errors
#[derive(Error, Debug)]
pub enum BuildError {
    /// Build failed
    #[error("Build failed for package '{package}': {source}")]
    BuildFailed { package: String, source: ToolError },

    /// Registering archives into a repository failed
    #[error("Failed to add archives of '{package}' to '{database}': {source}")]
    RegistrationFailed {
        package: String,
        database: PathBuf,
        source: ToolError,
    },

    /// A build dependency could not be built
    #[error("Skipping '{package}': its dependency '{dependency}' was not built")]
    DependencyFailed { package: String, dependency: String },
}
