//! Outofdate command implementation

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::cli::commands::Session;
use crate::cli::output::{self, status};
use crate::core::outofdate::{check_all, LatestVersions};
use crate::core::refresh::select_families;
use crate::core::tools::BuildTool;

/// Execute the outofdate command
pub async fn execute(session: &Session, packages: &[String], devel: Option<bool>) -> Result<()> {
    let databases = session.databases().unwrap_or_else(|e| {
        tracing::debug!("No local repositories: {e:#}");
        Vec::new()
    });
    let config = session.build_config(&databases)?;
    let tool: Arc<dyn BuildTool> = Arc::new(session.makepkg(&config)?);

    let selection = select_families(&session.root, packages, devel)?;
    let spinner = output::create_spinner(
        &format!("Checking {} package(s)", selection.included.len()),
        session.quiet || session.json,
    );
    let results = check_all(
        tool,
        &session.root,
        selection.included,
        session.jobs,
        config.env_vars(),
    )
    .await;
    spinner.finish_and_clear();

    let mut outdated: Vec<LatestVersions> = Vec::new();
    let mut failed = 0;
    for (_, result) in results {
        match result {
            Ok(Some(found)) if found.is_outdated() => outdated.push(found),
            Ok(_) => {}
            Err(_) => failed += 1,
        }
    }

    if session.json {
        output::print_json(&outdated)?;
    } else {
        for found in &outdated {
            println!(
                "{} {} {} -> {}",
                status::WARNING,
                found.pkgbase,
                found.current,
                found.newer.join(", ")
            );
        }
    }

    if failed > 0 {
        bail!("{failed} package base(s) could not be checked");
    }
    Ok(())
}
