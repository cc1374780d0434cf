//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::defaults::PACMAN_CONF;
use commands::{Commands, Session};

/// Repobuild - build pacman packages into local repositories
///
/// Keeps a tree of PKGBUILD directories in sync with the local repositories
/// configured in pacman.conf.
#[derive(Parser, Debug)]
#[command(name = "repobuild")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output in JSON format for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Package root holding one directory per package base
    #[arg(long, global = true, env = "REPOBUILD_ROOT")]
    pub root: Option<PathBuf>,

    /// Package manager configuration used to find local repositories
    #[arg(long, global = true, default_value = PACMAN_CONF)]
    pub pacman_conf: PathBuf,

    /// makepkg configuration to export instead of the searched one
    #[arg(long, global = true)]
    pub makepkg_conf: Option<PathBuf>,

    /// Number of metadata jobs (defaults to the number of CPUs)
    #[arg(short, long, global = true)]
    pub jobs: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log level implied by `--quiet` and `--verbose`
    pub fn log_level(&self) -> tracing::Level {
        match (self.quiet, self.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::WARN,
            (false, 1) => tracing::Level::INFO,
            (false, _) => tracing::Level::DEBUG,
        }
    }

    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let root = match self.root {
            Some(root) => root,
            None => std::env::current_dir()?,
        };
        let session = Session {
            root,
            pacman_conf: self.pacman_conf,
            makepkg_conf: self.makepkg_conf,
            jobs: self.jobs.unwrap_or_else(num_cpus::get),
            json: self.json,
            quiet: self.quiet,
        };
        self.command.run(&session).await
    }
}
