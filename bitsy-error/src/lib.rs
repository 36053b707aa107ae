use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type HalResult<T> = Result<T, HalError>;
pub type DistroResult<T> = Result<T, DistroError>;

/// Failures raised by the host abstraction (file and process collaborators).
#[derive(Error, Debug)]
pub enum HalError {
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Command failed: {program} (exit={code:?}): {stderr}")]
    CommandFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Command timed out: {program} after {timeout_secs}s")]
    CommandTimeout { program: String, timeout_secs: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Other(String),
}

/// A hostname file could not be loaded. Always recovered by the caller.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Error opening file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: HalError,
    },

    #[error("Malformed file {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// Failures surfaced to callers of the distro operations.
#[derive(Error, Debug)]
pub enum DistroError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: HalError,
    },

    #[error("Command failed: {command}: {source}")]
    Execution {
        command: String,
        #[source]
        source: HalError,
    },

    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("Unknown distro: {0}")]
    UnknownDistro(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Semaphore error for {name}: {source}")]
    Runner {
        name: String,
        #[source]
        source: HalError,
    },
}
