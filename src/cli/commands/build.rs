//! Build command implementation
//!
//! Loads metadata for the selected families, drops what the local
//! repositories already hold, and builds the rest in dependency order.

use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::cli::commands::Session;
use crate::cli::output::{self, status};
use crate::core::builder::{BuildOrchestrator, BuildSummary};
use crate::core::context::ResolutionContext;
use crate::core::freshness::filter_up_to_date;
use crate::core::refresh::{refresh_all, select_families};
use crate::core::resolver::schedule;
use crate::core::tools::BuildTool;
use crate::error::ConfigError;
use crate::infra::repo::RepoAdd;

/// Execute the build command
pub async fn execute(session: &Session, packages: &[String], devel: Option<bool>) -> Result<()> {
    let databases = session.databases()?;
    if databases.is_empty() {
        return Err(ConfigError::NoLocalRepository {
            path: session.pacman_conf.clone(),
        }
        .into());
    }

    let config = session.build_config(&databases)?;
    tracing::debug!("Build configuration: {config:?}");
    let makepkg = Arc::new(session.makepkg(&config)?);

    let selection = select_families(&session.root, packages, devel)?;
    let spinner = output::create_spinner(
        &format!("Loading metadata for {} package(s)", selection.included.len()),
        session.quiet || session.json,
    );
    let tool: Arc<dyn BuildTool> = makepkg.clone();
    let results = refresh_all(
        tool,
        &session.root,
        selection.included,
        session.jobs,
        &config.builddir,
    )
    .await;
    spinner.finish_and_clear();

    let mut load_failures = Vec::new();
    let mut families = Vec::new();
    for (pkgbase, result) in results {
        match result {
            Ok(srcinfo) => families.push(srcinfo),
            Err(_) => load_failures.push(pkgbase),
        }
    }

    let mut context = ResolutionContext::new(families);
    let repo = RepoAdd::default();
    filter_up_to_date(&mut context, &databases, &repo)
        .context("Failed to list local repository contents")?;

    let order = schedule(&context, &config.carch);
    tracing::info!("Building {} package base(s)", order.len());

    let driver = BuildOrchestrator::new(
        makepkg.as_ref(),
        &repo,
        &config,
        &session.root,
        &databases,
    );
    let mut summary = driver.run(&context, &order, &load_failures, |_| {
        if !session.json {
            output::print_separator();
        }
    });
    load_failures.append(&mut summary.failed);
    summary.failed = load_failures;

    report(session, &summary)?;
    if !summary.is_success() {
        bail!(
            "{} package base(s) failed, {} abandoned",
            summary.failed.len(),
            summary.abandoned.len()
        );
    }
    Ok(())
}

fn report(session: &Session, summary: &BuildSummary) -> Result<()> {
    if session.json {
        return output::print_json(summary);
    }
    if session.quiet {
        return Ok(());
    }

    if summary.built.is_empty() && summary.failed.is_empty() && summary.abandoned.is_empty() {
        println!("{} Everything is up to date", status::SUCCESS);
        return Ok(());
    }
    for pkgbase in &summary.built {
        println!("{} {pkgbase}", status::SUCCESS);
    }
    for pkgbase in &summary.failed {
        println!("{} {pkgbase}", status::ERROR);
    }
    for pkgbase in &summary.abandoned {
        println!("{} {pkgbase} (dependency failed)", status::WARNING);
    }
    Ok(())
}
