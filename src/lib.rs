//! Repobuild - build pacman packages into local repositories
//!
//! This library provides the core functionality for keeping a tree of
//! PKGBUILD directories in sync with local pacman repositories: parsing
//! `.SRCINFO` metadata, comparing versions, ordering builds by dependency and
//! registering the results.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Business logic (external tools behind traits)
//! - [`infra`] - Infrastructure layer (filesystem, processes)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;
