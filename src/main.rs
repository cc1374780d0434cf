//! Repobuild CLI - build pacman packages into local repositories
//!
//! Entry point for the repobuild command-line application.

use clap::Parser;

use repobuild::cli::output::display_error;
use repobuild::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(cli.log_level().into()),
        )
        .init();

    if let Err(e) = cli.run().await {
        display_error(&e);
        std::process::exit(1);
    }
}
