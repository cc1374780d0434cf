//! Core business logic module
//!
//! External programs are only reached through the traits in [`tools`]; the
//! real implementations live in [`crate::infra`].
//!
//! # Submodules
//!
//! - [`version`] - Version comparison and dependency requirements
//! - [`srcinfo`] - `.SRCINFO` metadata model and parser
//! - [`context`] - Per-run resolution context
//! - [`resolver`] - Provides index and build scheduling
//! - [`refresh`] - Family selection and concurrent metadata refresh
//! - [`repository`] - Local repository discovery and database listings
//! - [`freshness`] - Dropping packages that are already current
//! - [`makepkg_conf`] - Build configuration resolution
//! - [`builder`] - Sequential build and archive registration
//! - [`fix`] - Regenerating stale metadata
//! - [`outofdate`] - Upstream version checks
//! - [`tools`] - Seams for the external build and repository tools

pub mod builder;
pub mod context;
pub mod fix;
pub mod freshness;
pub mod makepkg_conf;
pub mod outofdate;
pub mod refresh;
pub mod repository;
pub mod resolver;
pub mod srcinfo;
pub mod tools;
pub mod version;
