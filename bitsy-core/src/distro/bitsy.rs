//! Bitsy Linux: an OpenEmbedded distribution built with the Yocto Project.
//!
//! Packages are managed with `dnf`, locale and timezone through the systemd
//! `localectl` / `timedatectl` tools.

use super::DistroOps;
use crate::config::{DistroConfig, LOCALE_CONF_FN};
use crate::errors::{DistroError, DistroResult};
use crate::runner::{Frequency, RunOutcome, Runner};
use crate::system_config::hostname::HostnameUpdater;
use crate::system_config::packages::{package_command_spec, CommandSpec, ExtraArgs};
use crate::system_config::pkglist::PackageSpec;
use bitsy_hal::{ProcessOps, SystemHal};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const PACKAGE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);
const SYSTEMD_TOOL_TIMEOUT: Duration = Duration::from_secs(2 * 60);

pub struct BitsyDistro {
    cfg: DistroConfig,
    hal: Arc<dyn SystemHal>,
    runner: Runner,
}

impl BitsyDistro {
    pub const NAME: &'static str = "bitsy";
    pub const OSFAMILY: &'static str = "bitsy";

    pub fn new(cfg: DistroConfig, hal: Arc<dyn SystemHal>) -> Self {
        let runner = Runner::new(cfg.instance_sem_dir(), cfg.global_sem_dir());
        Self { cfg, hal, runner }
    }

    fn hostname_updater(&self) -> HostnameUpdater<'_, dyn SystemHal> {
        HostnameUpdater::new(self.hal.as_ref()).with_dry_run(self.cfg.dry_run())
    }

    /// Run a command with its output streamed; failures are always returned.
    fn exec(&self, spec: &CommandSpec, timeout: Duration) -> DistroResult<()> {
        if self.cfg.dry_run() {
            log::info!("DRY RUN: {}", spec);
            return Ok(());
        }

        log::info!("Running: {}", spec);
        self.hal
            .run_argv(&spec.argv(), false, timeout)
            .map_err(|source| DistroError::Execution {
                command: spec.to_string(),
                source,
            })
    }
}

impl DistroOps for BitsyDistro {
    fn config(&self) -> &DistroConfig {
        &self.cfg
    }

    fn osfamily(&self) -> &str {
        Self::OSFAMILY
    }

    fn apply_locale(&self, locale: &str, out_fn: Option<&Path>) -> DistroResult<()> {
        if let Some(out_fn) = out_fn.filter(|p| *p != Path::new(LOCALE_CONF_FN)) {
            log::warn!(
                "Invalid locale_configfile {}, only supported value is {}",
                out_fn.display(),
                LOCALE_CONF_FN
            );
        }
        let spec = CommandSpec::new("localectl", &["set-locale", locale]);
        self.exec(&spec, SYSTEMD_TOOL_TIMEOUT)
    }

    fn package_command(
        &self,
        command: &str,
        args: Option<&ExtraArgs>,
        pkgs: &[PackageSpec],
    ) -> DistroResult<()> {
        let spec = package_command_spec(self.cfg.package_tool(), command, args, pkgs);
        self.exec(&spec, PACKAGE_TIMEOUT)
    }

    fn set_timezone(&self, tz: &str) -> DistroResult<()> {
        let spec = CommandSpec::new("timedatectl", &["set-timezone", tz]);
        self.exec(&spec, SYSTEMD_TOOL_TIMEOUT)
    }

    fn update_package_sources(&self) -> DistroResult<RunOutcome> {
        const NAME: &str = "update-sources";
        if self.cfg.dry_run() {
            // Report what a real run would do, but leave no semaphore behind.
            if self
                .runner
                .has_run(self.hal.as_ref(), NAME, Frequency::PerInstance)?
            {
                return Ok(RunOutcome::Skipped);
            }
            self.package_command("makecache", None, &[])?;
            return Ok(RunOutcome::Ran);
        }
        self.runner
            .run(self.hal.as_ref(), NAME, Frequency::PerInstance, || {
                self.package_command("makecache", None, &[])
            })
    }

    fn read_hostname(&self, path: &Path, default: Option<&str>) -> Option<String> {
        self.hostname_updater().read_hostname(path, default)
    }

    fn write_hostname(&self, hostname: &str, path: &Path) -> DistroResult<()> {
        self.hostname_updater().write_hostname(hostname, path)
    }
}
