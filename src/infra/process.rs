//! External process execution
//!
//! Thin wrappers around [`std::process::Command`] that turn spawn failures and
//! unsuccessful exits into [`ToolError`]s.

use std::process::{Command, Output, Stdio};

use crate::error::ToolError;

fn program_name(cmd: &Command) -> String {
    cmd.get_program().to_string_lossy().into_owned()
}

fn spawn_error(cmd: &Command, e: &std::io::Error) -> ToolError {
    ToolError::Spawn {
        program: program_name(cmd),
        error: e.to_string(),
    }
}

fn check(cmd: &Command, output: &Output) -> Result<(), ToolError> {
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    Err(ToolError::Failed {
        program: program_name(cmd),
        dir: cmd
            .get_current_dir()
            .map(std::path::Path::to_path_buf)
            .unwrap_or_default(),
        status: output.status.to_string(),
        stderr: if stderr.is_empty() {
            String::new()
        } else {
            format!("\n{stderr}")
        },
    })
}

/// Run a command with inherited stdio and wait for it
pub fn run(cmd: &mut Command) -> Result<(), ToolError> {
    tracing::debug!("Running {:?}", cmd);
    let status = cmd.status().map_err(|e| spawn_error(cmd, &e))?;
    check(
        cmd,
        &Output {
            status,
            stdout: Vec::new(),
            stderr: Vec::new(),
        },
    )
}

/// Run a command discarding stdout; stderr is kept for the error message
pub fn run_quiet(cmd: &mut Command) -> Result<(), ToolError> {
    tracing::debug!("Running {:?}", cmd);
    let output = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| spawn_error(cmd, &e))?;
    check(cmd, &output)
}

/// Run a command and return its standard output
pub fn capture(cmd: &mut Command) -> Result<String, ToolError> {
    tracing::debug!("Running {:?}", cmd);
    let output = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| spawn_error(cmd, &e))?;
    check(cmd, &output)?;

    String::from_utf8(output.stdout).map_err(|e| ToolError::InvalidOutput {
        program: program_name(cmd),
        error: e.to_string(),
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_capture_stdout() {
        let out = capture(Command::new("sh").args(["-c", "echo hello"])).unwrap();
        assert_eq!(out, "hello\n");
    }

    #[test]
    fn test_failure_carries_stderr() {
        let err = run_quiet(Command::new("sh").args(["-c", "echo broken >&2; exit 3"]))
            .unwrap_err();
        match err {
            ToolError::Failed { program, stderr, .. } => {
                assert_eq!(program, "sh");
                assert!(stderr.contains("broken"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_program() {
        let err = run(&mut Command::new("/nonexistent/program-for-tests")).unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }
}
