//! Output formatting and progress indicators
//!
//! This module provides utilities for displaying spinners, status lines and
//! the separator printed between builds.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::config::defaults::SEPARATOR_WIDTH;

/// Create a spinner for operations with unknown duration
///
/// The spinner is hidden when `quiet` is set.
pub fn create_spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.blue} {msg}")
            .expect("Invalid spinner template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Line printed after each successful build
pub fn separator() -> String {
    "#".repeat(SEPARATOR_WIDTH)
}

/// Print the build separator
pub fn print_separator() {
    println!("{}", separator());
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Report a run-level error with its full cause chain
pub fn display_error(err: &anyhow::Error) {
    tracing::error!("{err:#}");
}

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";
}
