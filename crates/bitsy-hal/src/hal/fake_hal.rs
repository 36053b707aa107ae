//! Fake HAL implementation for testing.
//!
//! This implementation records all operations without executing them,
//! allowing for CI-safe testing without root privileges or a real `/etc`.

use super::{FileOps, HostInfoOps, ProcessOps, WriteMode};
use crate::{HalError, HalResult};
use std::collections::{HashMap, HashSet};
#[cfg(unix)]
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Operation records for testing and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    ReadFile {
        path: PathBuf,
    },
    WriteFile {
        path: PathBuf,
        content: String,
        mode: u32,
        write_mode: WriteMode,
    },
    Command {
        program: String,
        args: Vec<String>,
        captured: bool,
        timeout_secs: u64,
    },
}

/// Shared state for FakeHal operations.
#[derive(Debug, Clone, Default)]
struct FakeHalState {
    /// All operations that were recorded
    operations: Vec<Operation>,
    /// In-memory filesystem
    files: HashMap<PathBuf, String>,
    /// Paths whose reads fail with `PermissionDenied`
    unreadable: HashSet<PathBuf>,
    /// When set, every write fails with `PermissionDenied`
    fail_writes: bool,
    /// Programs that exit non-zero
    failing_programs: HashSet<String>,
    hostname: Option<String>,
}

/// Fake HAL implementation that records operations without executing them.
///
/// This is designed for testing and CI environments where real system
/// operations would fail or be dangerous.
#[derive(Debug, Clone, Default)]
pub struct FakeHal {
    state: Arc<Mutex<FakeHalState>>,
}

impl FakeHal {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeHalState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, FakeHalState> {
        match self.state.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Seed a file in the in-memory filesystem.
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.state().files.insert(path.into(), content.into());
        self
    }

    /// Current content of a file, if any.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.state().files.get(path.as_ref()).cloned()
    }

    /// Make reads of `path` fail as if permissions were missing.
    pub fn deny_read(&self, path: impl Into<PathBuf>) {
        self.state().unreadable.insert(path.into());
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.state().fail_writes = fail;
    }

    /// Make every subsequent invocation of `program` exit non-zero.
    pub fn fail_program(&self, program: impl Into<String>) {
        self.state().failing_programs.insert(program.into());
    }

    pub fn set_hostname(&self, hostname: Option<&str>) {
        self.state().hostname = hostname.map(String::from);
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<Operation> {
        self.state().operations.clone()
    }

    /// Get the number of operations recorded.
    pub fn operation_count(&self) -> usize {
        self.state().operations.len()
    }

    /// Check if a specific operation was recorded.
    pub fn has_operation(&self, check: impl Fn(&Operation) -> bool) -> bool {
        self.state().operations.iter().any(check)
    }

    /// Every recorded command as a full argument vector.
    pub fn commands(&self) -> Vec<Vec<String>> {
        self.state()
            .operations
            .iter()
            .filter_map(|op| match op {
                Operation::Command { program, args, .. } => {
                    let mut argv = vec![program.clone()];
                    argv.extend(args.iter().cloned());
                    Some(argv)
                }
                _ => None,
            })
            .collect()
    }

    /// Clear all recorded operations (files are kept).
    pub fn clear(&self) {
        self.state().operations.clear();
    }

    fn record_operation(&self, op: Operation) {
        self.state().operations.push(op);
    }

    fn record_command(&self, program: &str, args: &[&str], captured: bool, timeout: Duration) {
        self.record_operation(Operation::Command {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            captured,
            timeout_secs: timeout.as_secs(),
        });
    }

    fn exit_code_for(&self, program: &str) -> i32 {
        if self.state().failing_programs.contains(program) {
            1
        } else {
            0
        }
    }
}

impl FileOps for FakeHal {
    fn read_file(&self, path: &Path) -> HalResult<String> {
        self.record_operation(Operation::ReadFile {
            path: path.to_path_buf(),
        });
        let state = self.state();
        if state.unreadable.contains(path) {
            return Err(HalError::PermissionDenied(path.to_path_buf()));
        }
        state
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| HalError::NotFound(path.to_path_buf()))
    }

    fn write_file(
        &self,
        path: &Path,
        content: &str,
        mode: u32,
        write_mode: WriteMode,
    ) -> HalResult<()> {
        self.record_operation(Operation::WriteFile {
            path: path.to_path_buf(),
            content: content.to_string(),
            mode,
            write_mode,
        });

        let mut state = self.state();
        if state.fail_writes {
            return Err(HalError::PermissionDenied(path.to_path_buf()));
        }

        log::info!("FAKE HAL: write {} ({:o})", path.display(), mode);
        match write_mode {
            WriteMode::Overwrite => {
                state.files.insert(path.to_path_buf(), content.to_string());
            }
            WriteMode::Append => {
                state
                    .files
                    .entry(path.to_path_buf())
                    .or_default()
                    .push_str(content);
            }
        }
        Ok(())
    }
}

impl ProcessOps for FakeHal {
    fn command_output(&self, program: &str, args: &[&str], timeout: Duration) -> HalResult<Output> {
        self.record_command(program, args, true, timeout);
        let code = self.exit_code_for(program);

        #[cfg(unix)]
        let status = std::process::ExitStatus::from_raw(code << 8);
        #[cfg(not(unix))]
        let status = std::process::Command::new(if code == 0 { "true" } else { "false" })
            .status()
            .map_err(HalError::Io)?;

        Ok(Output {
            status,
            stdout: Vec::new(),
            stderr: Vec::new(),
        })
    }

    fn command_status(&self, program: &str, args: &[&str], timeout: Duration) -> HalResult<()> {
        self.record_command(program, args, false, timeout);
        log::info!("FAKE HAL: {} {}", program, args.join(" "));

        let code = self.exit_code_for(program);
        if code != 0 {
            return Err(HalError::CommandFailed {
                program: program.to_string(),
                code: Some(code),
                stderr: String::new(),
            });
        }
        Ok(())
    }
}

impl HostInfoOps for FakeHal {
    fn hostname(&self) -> HalResult<Option<String>> {
        Ok(self.state().hostname.clone())
    }

    fn os_release_text(&self) -> HalResult<String> {
        self.read_file(Path::new("/etc/os-release"))
    }
}
