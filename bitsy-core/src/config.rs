//! Distro configuration.
//!
//! [`SystemConfig`] is the user-facing TOML file; [`DistroConfig`] is the
//! resolved, read-only value a distro implementation is built from.

use crate::errors::{DistroError, DistroResult, HalError};
use crate::system_config::pkglist::PackageSpec;
use bitsy_hal::FileOps;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/bitsy/distro.toml";
pub const DEFAULT_CLOUD_DIR: &str = "/var/lib/cloud";
pub const DEFAULT_HOSTNAME_CONF_FN: &str = "/etc/hostname";
pub const DEFAULT_LOCALE: &str = "en_US.UTF-8";
pub const DEFAULT_PACKAGE_TOOL: &str = "dnf";
pub const LOCALE_CONF_FN: &str = "/etc/locale.conf";

pub const NETWORK_FILE_HEADER: &str = "\
# This file is generated from information provided by the datasource.  Changes
# to it will not persist across an instance reboot.  To disable cloud-init's
# network configuration capabilities, write a file
# /etc/cloud/cloud.cfg.d/99-disable-network-config.cfg with the following:
# network: {config: disabled}
";

/// Settings read from [`DEFAULT_CONFIG_PATH`]. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
    pub cloud_dir: PathBuf,
    pub instance_id: Option<String>,
    pub hostname_conf_fn: PathBuf,
    pub default_locale: String,
    pub package_tool: String,
    pub dry_run: bool,
    /// Packages installed by `install` when none are given explicitly.
    pub packages: Vec<PackageSpec>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            cloud_dir: PathBuf::from(DEFAULT_CLOUD_DIR),
            instance_id: None,
            hostname_conf_fn: PathBuf::from(DEFAULT_HOSTNAME_CONF_FN),
            default_locale: DEFAULT_LOCALE.to_string(),
            package_tool: DEFAULT_PACKAGE_TOOL.to_string(),
            dry_run: false,
            packages: Vec::new(),
        }
    }
}

impl SystemConfig {
    pub fn parse(toml_text: &str) -> DistroResult<Self> {
        toml::from_str(toml_text).map_err(|e| DistroError::Config(e.to_string()))
    }

    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load(files: &(impl FileOps + ?Sized), path: &Path) -> DistroResult<Self> {
        match files.read_file(path) {
            Ok(text) => {
                let cfg = Self::parse(&text)
                    .map_err(|e| DistroError::Config(format!("{}: {}", path.display(), e)))?;
                log::debug!("Loaded configuration from {}", path.display());
                Ok(cfg)
            }
            Err(HalError::NotFound(_)) => {
                log::debug!("No configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(DistroError::Config(format!("{}: {}", path.display(), e))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkdRendererConfig {
    pub resolv_conf_fn: PathBuf,
    pub network_conf_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetplanRendererConfig {
    pub netplan_path: PathBuf,
    pub netplan_header: &'static str,
    pub postcmds: bool,
}

/// Settings handed to the network renderers; the plugin renders nothing itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfigs {
    pub networkd: NetworkdRendererConfig,
    pub netplan: NetplanRendererConfig,
    pub eni_path: PathBuf,
}

/// Resolved configuration for one distro instance. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct DistroConfig {
    name: String,
    system: SystemConfig,
    ssh_svcname: String,
    init_cmd: Vec<String>,
    renderers: RendererConfigs,
}

impl DistroConfig {
    pub fn new(name: impl Into<String>, system: SystemConfig) -> Self {
        let network_conf_dir = PathBuf::from("/etc/systemd/network/");
        Self {
            name: name.into(),
            system,
            ssh_svcname: "sshd.socket".to_string(),
            init_cmd: vec!["systemctl".to_string()],
            renderers: RendererConfigs {
                networkd: NetworkdRendererConfig {
                    resolv_conf_fn: PathBuf::from("/etc/systemd/resolved.conf"),
                    network_conf_dir,
                },
                netplan: NetplanRendererConfig {
                    netplan_path: PathBuf::from("/etc/netplan/50-cloud-init.yaml"),
                    netplan_header: NETWORK_FILE_HEADER,
                    postcmds: true,
                },
                eni_path: PathBuf::from("/etc/network/interfaces.d/50-cloud-init.cfg"),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn system(&self) -> &SystemConfig {
        &self.system
    }

    pub fn ssh_svcname(&self) -> &str {
        &self.ssh_svcname
    }

    pub fn init_cmd(&self) -> &[String] {
        &self.init_cmd
    }

    pub fn renderers(&self) -> &RendererConfigs {
        &self.renderers
    }

    pub fn hostname_conf_fn(&self) -> &Path {
        &self.system.hostname_conf_fn
    }

    pub fn package_tool(&self) -> &str {
        &self.system.package_tool
    }

    pub fn dry_run(&self) -> bool {
        self.system.dry_run
    }

    /// `<cloud_dir>/instances/<instance_id>/sem`
    pub fn instance_sem_dir(&self) -> PathBuf {
        let iid = self.system.instance_id.as_deref().unwrap_or("iid-unknown");
        self.system.cloud_dir.join("instances").join(iid).join("sem")
    }

    /// `<cloud_dir>/sem`
    pub fn global_sem_dir(&self) -> PathBuf {
        self.system.cloud_dir.join("sem")
    }
}
