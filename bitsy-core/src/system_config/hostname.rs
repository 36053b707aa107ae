//! Hostname file read/merge/write.
//!
//! Reads are tolerant: a missing, unreadable or corrupt file is logged and
//! treated as empty. Writes are not: a failed write is returned to the caller.

use super::hostname_conf::HostnameConf;
use crate::errors::{DistroError, DistroResult, ReadError};
use bitsy_hal::{FileOps, WriteMode};
use std::path::Path;

/// Permission bits for a freshly written hostname file.
pub const HOSTNAME_FILE_MODE: u32 = 0o644;

pub struct HostnameUpdater<'a, F: FileOps + ?Sized> {
    files: &'a F,
    dry_run: bool,
}

impl<'a, F: FileOps + ?Sized> HostnameUpdater<'a, F> {
    pub fn new(files: &'a F) -> Self {
        Self {
            files,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn read_hostname_conf(&self, path: &Path) -> Result<HostnameConf, ReadError> {
        let text = self.files.read_file(path).map_err(|source| ReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        HostnameConf::parse(&text).map_err(|e| ReadError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn read_or_empty(&self, path: &Path) -> HostnameConf {
        match self.read_hostname_conf(path) {
            Ok(conf) => conf,
            Err(e) => {
                log::error!("{}", e);
                HostnameConf::default()
            }
        }
    }

    /// Merge `hostname` into the file at `path`, keeping its comments.
    pub fn write_hostname(&self, hostname: &str, path: &Path) -> DistroResult<()> {
        let mut conf = self.read_or_empty(path);
        conf.set_hostname(hostname);
        let content = conf.to_string();

        if self.dry_run {
            log::info!(
                "(dry-run) would write to {}: {}",
                path.display(),
                content.trim_end()
            );
            return Ok(());
        }

        self.files
            .write_file(path, &content, HOSTNAME_FILE_MODE, WriteMode::Overwrite)
            .map_err(|source| DistroError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("Wrote hostname {} to {}", hostname.trim(), path.display());
        Ok(())
    }

    /// Hostname stored in `path`, or `default` when there is none to read.
    pub fn read_hostname(&self, path: &Path, default: Option<&str>) -> Option<String> {
        let conf = self.read_or_empty(path);
        conf.hostname()
            .filter(|name| !name.is_empty())
            .or(default)
            .map(String::from)
    }
}
