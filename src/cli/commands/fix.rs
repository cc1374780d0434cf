//! Fix command implementation

use std::sync::Arc;

use anyhow::{bail, Result};
use serde::Serialize;

use crate::cli::commands::Session;
use crate::cli::output::{self, status};
use crate::core::fix;
use crate::core::tools::BuildTool;

#[derive(Debug, Default, Serialize)]
struct FixReport {
    regenerated: Vec<String>,
    failed: Vec<String>,
}

/// Execute the fix command
pub async fn execute(session: &Session, packages: &[String]) -> Result<()> {
    let databases = session.databases().unwrap_or_else(|e| {
        tracing::debug!("No local repositories: {e:#}");
        Vec::new()
    });
    let config = session.build_config(&databases)?;
    let tool: Arc<dyn BuildTool> = Arc::new(session.makepkg(&config)?);

    let spinner = output::create_spinner("Regenerating metadata", session.quiet || session.json);
    let results = fix::fix(tool, &session.root, packages, session.jobs).await?;
    spinner.finish_and_clear();

    let mut report = FixReport::default();
    for (pkgbase, result) in results {
        match result {
            Ok(_) => report.regenerated.push(pkgbase),
            Err(_) => report.failed.push(pkgbase),
        }
    }

    if session.json {
        output::print_json(&report)?;
    } else if !session.quiet {
        for pkgbase in &report.regenerated {
            println!("{} {pkgbase}", status::SUCCESS);
        }
        for pkgbase in &report.failed {
            println!("{} {pkgbase}", status::ERROR);
        }
    }

    if !report.failed.is_empty() {
        bail!("{} package base(s) could not be fixed", report.failed.len());
    }
    Ok(())
}
