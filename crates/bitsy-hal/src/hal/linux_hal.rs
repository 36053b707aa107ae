//! Linux HAL implementation using real system calls.

use super::{FileOps, HostInfoOps, ProcessOps, WriteMode};
use crate::{HalError, HalResult};
use std::fs;
use std::io::{self, Read, Write};
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Real HAL implementation for Linux systems.
#[derive(Debug, Clone, Default)]
pub struct LinuxHal;

impl LinuxHal {
    pub fn new() -> Self {
        Self
    }
}

const OS_RELEASE_PATH: &str = "/etc/os-release";
const KERNEL_HOSTNAME_PATH: &str = "/proc/sys/kernel/hostname";

fn map_command_err(program: &str, err: io::Error) -> HalError {
    if err.kind() == io::ErrorKind::NotFound {
        return HalError::CommandNotFound(program.to_string());
    }
    HalError::Io(err)
}

fn map_file_err(path: &Path, err: io::Error) -> HalError {
    match err.kind() {
        io::ErrorKind::NotFound => HalError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => HalError::PermissionDenied(path.to_path_buf()),
        _ => HalError::Io(err),
    }
}

fn output_with_timeout(program: &str, cmd: &mut Command, timeout: Duration) -> HalResult<Output> {
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    let mut child = cmd.spawn().map_err(|e| map_command_err(program, e))?;

    let mut stdout = child.stdout.take();
    let mut stderr = child.stderr.take();

    // Drain pipes concurrently to avoid deadlocks on large output.
    let stdout_handle = std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout.take() {
            let _ = out.read_to_end(&mut buf);
        }
        buf
    });
    let stderr_handle = std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr.take() {
            let _ = err.read_to_end(&mut buf);
        }
        buf
    });

    let status = match child.wait_timeout(timeout).map_err(HalError::Io)? {
        Some(status) => status,
        None => {
            let _ = child.kill();
            let _ = child.wait();
            let _ = stdout_handle.join();
            let _ = stderr_handle.join();
            return Err(HalError::CommandTimeout {
                program: program.to_string(),
                timeout_secs: timeout.as_secs(),
            });
        }
    };

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();
    Ok(Output {
        status,
        stdout,
        stderr,
    })
}

fn streamed_with_timeout(program: &str, cmd: &mut Command, timeout: Duration) -> HalResult<()> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    let mut child = cmd.spawn().map_err(|e| map_command_err(program, e))?;

    let status = match child.wait_timeout(timeout).map_err(HalError::Io)? {
        Some(status) => status,
        None => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(HalError::CommandTimeout {
                program: program.to_string(),
                timeout_secs: timeout.as_secs(),
            });
        }
    };

    if !status.success() {
        return Err(HalError::CommandFailed {
            program: program.to_string(),
            code: status.code(),
            stderr: String::new(),
        });
    }
    Ok(())
}

impl FileOps for LinuxHal {
    fn read_file(&self, path: &Path) -> HalResult<String> {
        let bytes = fs::read(path).map_err(|e| map_file_err(path, e))?;
        String::from_utf8(bytes)
            .map_err(|e| HalError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    fn write_file(
        &self,
        path: &Path,
        content: &str,
        mode: u32,
        write_mode: WriteMode,
    ) -> HalResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| map_file_err(parent, e))?;
        }

        let mut opts = fs::OpenOptions::new();
        opts.create(true);
        match write_mode {
            WriteMode::Overwrite => opts.write(true).truncate(true),
            WriteMode::Append => opts.append(true),
        };
        #[cfg(unix)]
        opts.mode(mode);

        let mut file = opts.open(path).map_err(|e| map_file_err(path, e))?;
        // `mode` on open only applies to newly created files.
        #[cfg(unix)]
        file.set_permissions(fs::Permissions::from_mode(mode))
            .map_err(|e| map_file_err(path, e))?;
        file.write_all(content.as_bytes())?;
        file.flush()?;

        log::debug!(
            "Wrote {} bytes to {} (mode {:o}, {:?})",
            content.len(),
            path.display(),
            mode,
            write_mode
        );
        Ok(())
    }
}

impl ProcessOps for LinuxHal {
    fn command_output(&self, program: &str, args: &[&str], timeout: Duration) -> HalResult<Output> {
        log::debug!("exec (captured): {} {}", program, args.join(" "));
        let mut cmd = Command::new(program);
        cmd.args(args);
        output_with_timeout(program, &mut cmd, timeout)
    }

    fn command_status(&self, program: &str, args: &[&str], timeout: Duration) -> HalResult<()> {
        log::debug!("exec: {} {}", program, args.join(" "));
        let mut cmd = Command::new(program);
        cmd.args(args);
        streamed_with_timeout(program, &mut cmd, timeout)
    }
}

impl HostInfoOps for LinuxHal {
    fn hostname(&self) -> HalResult<Option<String>> {
        match fs::read_to_string(KERNEL_HOSTNAME_PATH) {
            Ok(raw) => {
                let name = raw.trim();
                Ok((!name.is_empty()).then(|| name.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(HalError::Io(e)),
        }
    }

    fn os_release_text(&self) -> HalResult<String> {
        self.read_file(Path::new(OS_RELEASE_PATH))
    }
}
