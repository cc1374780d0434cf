//! makepkg invocation
//!
//! Real [`BuildTool`] backed by the `makepkg` executable. Every invocation
//! runs in the family's directory with the resolved build configuration in
//! its environment.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::makepkg_conf::BuildConfig;
use crate::core::tools::BuildTool;
use crate::error::ToolError;
use crate::infra::process;

/// The makepkg build tool
#[derive(Debug, Clone)]
pub struct Makepkg {
    program: PathBuf,
    env: Vec<(&'static str, String)>,
}

impl Makepkg {
    /// Use a specific makepkg executable
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            env: Vec::new(),
        }
    }

    /// Find `makepkg` on `PATH`
    pub fn locate() -> Result<Self, ToolError> {
        which::which("makepkg")
            .map(Self::new)
            .map_err(|e| ToolError::Spawn {
                program: "makepkg".to_string(),
                error: e.to_string(),
            })
    }

    /// Export the build configuration to every invocation
    #[must_use]
    pub fn with_config(mut self, config: &BuildConfig) -> Self {
        self.env = config.env_vars();
        self
    }

    fn command(&self, dir: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.current_dir(dir).envs(self.env.iter().map(|(k, v)| (*k, v)));
        cmd
    }
}

impl BuildTool for Makepkg {
    fn print_srcinfo(&self, dir: &Path) -> Result<String, ToolError> {
        process::capture(self.command(dir).arg("--printsrcinfo"))
    }

    fn refresh_sources(&self, dir: &Path, builddir: &Path) -> Result<(), ToolError> {
        process::run_quiet(
            self.command(dir)
                .env("BUILDDIR", builddir)
                .args(["--nodeps", "--skipinteg", "--noprepare", "--nobuild"]),
        )
    }

    fn build(&self, dir: &Path) -> Result<(), ToolError> {
        process::run(
            self.command(dir)
                .args(["--syncdeps", "--rmdeps", "--clean", "--force"]),
        )
    }
}
