//! Process execution helpers.
//!
//! External commands are considered "world-touching" and must go through the HAL so we can
//! test distro operations without spawning real processes.

use crate::HalResult;
use std::process::Output;
use std::time::Duration;

/// Process execution trait (external command runner).
pub trait ProcessOps {
    /// Run a command with stdout/stderr captured.
    fn command_output(&self, program: &str, args: &[&str], timeout: Duration) -> HalResult<Output>;

    /// Run a command with output streamed to the controlling terminal/log.
    ///
    /// A non-zero exit is reported as [`crate::HalError::CommandFailed`].
    fn command_status(&self, program: &str, args: &[&str], timeout: Duration) -> HalResult<()>;

    /// Run a full argument vector (`argv[0]` is the program).
    fn run_argv(&self, argv: &[String], capture: bool, timeout: Duration) -> HalResult<()> {
        let Some((program, rest)) = argv.split_first() else {
            return Err(crate::HalError::Other("empty command".to_string()));
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        if capture {
            let output = self.command_output(program, &args, timeout)?;
            if !output.status.success() {
                return Err(crate::HalError::CommandFailed {
                    program: program.clone(),
                    code: output.status.code(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }
            Ok(())
        } else {
            self.command_status(program, &args, timeout)
        }
    }
}
