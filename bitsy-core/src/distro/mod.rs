//! Distro capability set.
//!
//! Each supported distribution implements [`DistroOps`]; callers look one up
//! through [`registry::DistroRegistry`] instead of depending on a concrete type.

pub mod bitsy;
pub mod registry;

pub use bitsy::BitsyDistro;
pub use registry::DistroRegistry;

use crate::config::DistroConfig;
use crate::errors::DistroResult;
use crate::runner::RunOutcome;
use crate::system_config::packages::ExtraArgs;
use crate::system_config::pkglist::PackageSpec;
use std::path::{Path, PathBuf};

pub trait DistroOps: Send + Sync {
    fn config(&self) -> &DistroConfig;

    fn name(&self) -> &str {
        self.config().name()
    }

    fn osfamily(&self) -> &str;

    fn default_locale(&self) -> &str {
        &self.config().system().default_locale
    }

    /// Set the system locale. `out_fn` is the locale file the caller expects to be written.
    fn apply_locale(&self, locale: &str, out_fn: Option<&Path>) -> DistroResult<()>;

    fn install_packages(&self, pkgs: &[PackageSpec]) -> DistroResult<()> {
        self.package_command("install", None, pkgs)
    }

    /// Build and run `<tool> -y [args...] <command> <pkgs...>`.
    fn package_command(
        &self,
        command: &str,
        args: Option<&ExtraArgs>,
        pkgs: &[PackageSpec],
    ) -> DistroResult<()>;

    fn set_timezone(&self, tz: &str) -> DistroResult<()>;

    /// Refresh package metadata, at most once per instance.
    fn update_package_sources(&self) -> DistroResult<RunOutcome>;

    fn read_hostname(&self, path: &Path, default: Option<&str>) -> Option<String>;

    fn write_hostname(&self, hostname: &str, path: &Path) -> DistroResult<()>;

    /// `(hostname file, hostname stored in it)`
    fn read_system_hostname(&self) -> (PathBuf, Option<String>) {
        let path = self.config().hostname_conf_fn().to_path_buf();
        let hostname = self.read_hostname(&path, None);
        (path, hostname)
    }

    /// Write `hostname` to the configured hostname file.
    fn set_hostname(&self, hostname: &str) -> DistroResult<()> {
        let path = self.config().hostname_conf_fn().to_path_buf();
        self.write_hostname(hostname, &path)
    }
}
