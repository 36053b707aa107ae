//! Run-once bookkeeping for distro actions.
//!
//! A completed action leaves a semaphore file `<sem_dir>/<name>.<freq>`, with
//! `-` in the name written as `_` (`update_sources.once-per-instance`); while it
//! exists the action is skipped.

use crate::errors::{DistroError, DistroResult, HalError};
use bitsy_hal::{FileOps, WriteMode};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const SEM_FILE_MODE: u32 = 0o644;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Always,
    PerInstance,
    Once,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Always => "always",
            Frequency::PerInstance => "once-per-instance",
            Frequency::Once => "once",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Ran,
    Skipped,
}

pub struct Runner {
    instance_sem_dir: PathBuf,
    global_sem_dir: PathBuf,
}

impl Runner {
    pub fn new(instance_sem_dir: PathBuf, global_sem_dir: PathBuf) -> Self {
        Self {
            instance_sem_dir,
            global_sem_dir,
        }
    }

    fn sem_path(&self, name: &str, freq: Frequency) -> PathBuf {
        let dir = match freq {
            Frequency::Once => &self.global_sem_dir,
            _ => &self.instance_sem_dir,
        };
        dir.join(format!("{}.{}", name.replace('-', "_"), freq))
    }

    pub fn has_run(
        &self,
        files: &(impl FileOps + ?Sized),
        name: &str,
        freq: Frequency,
    ) -> DistroResult<bool> {
        if freq == Frequency::Always {
            return Ok(false);
        }
        sem_exists(files, &self.sem_path(name, freq)).map_err(|source| DistroError::Runner {
            name: name.to_string(),
            source,
        })
    }

    pub fn run<F>(
        &self,
        files: &(impl FileOps + ?Sized),
        name: &str,
        freq: Frequency,
        action: F,
    ) -> DistroResult<RunOutcome>
    where
        F: FnOnce() -> DistroResult<()>,
    {
        if self.has_run(files, name, freq)? {
            log::debug!("{} already ran ({}), skipping", name, freq);
            return Ok(RunOutcome::Skipped);
        }

        log::debug!("Running {} with frequency {}", name, freq);
        action()?;

        if freq != Frequency::Always {
            let path = self.sem_path(name, freq);
            files
                .write_file(&path, &sem_contents(), SEM_FILE_MODE, WriteMode::Overwrite)
                .map_err(|source| DistroError::Runner {
                    name: name.to_string(),
                    source,
                })?;
        }
        Ok(RunOutcome::Ran)
    }
}

fn sem_exists(files: &(impl FileOps + ?Sized), path: &Path) -> Result<bool, HalError> {
    match files.read_file(path) {
        Ok(_) => Ok(true),
        Err(HalError::NotFound(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

fn sem_contents() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default();
    format!("{}: {}\n", std::process::id(), secs)
}
