//! toolchain::process
//!
//! Running external programs and classifying their failures.

use std::process::{Command, Output, Stdio};

use super::ToolError;

/// Run `cmd` to completion, capturing its output.
///
/// Standard input is closed so a tool can never block waiting for it.
/// A non-zero exit becomes [`ToolError::Failed`] carrying the captured
/// standard error.
pub(crate) fn run_captured(cmd: &mut Command, program: &str) -> Result<Output, ToolError> {
    log::debug!("running {:?}", cmd);

    let output = cmd
        .stdin(Stdio::null())
        .output()
        .map_err(|e| ToolError::Spawn {
            program: program.to_string(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(ToolError::Failed {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_a_spawn_error() {
        let mut cmd = Command::new("revsize-definitely-not-a-program");
        let err = run_captured(&mut cmd, "revsize-definitely-not-a-program").unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_keeps_stderr() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo boom >&2; exit 3"]);

        let err = run_captured(&mut cmd, "sh").unwrap_err();
        assert!(matches!(err, ToolError::Failed { .. }));
        assert_eq!(err.diagnostics().map(str::trim), Some("boom"));
    }

    #[cfg(unix)]
    #[test]
    fn success_returns_stdout() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo hello"]);

        let output = run_captured(&mut cmd, "sh").unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hello");
    }
}
