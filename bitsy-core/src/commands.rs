//! `bitsy` command dispatch.

use crate::cli::{Cli, Command};
use crate::config::SystemConfig;
use crate::distro::{BitsyDistro, DistroOps, DistroRegistry};
use crate::errors::Result;
use crate::runner::RunOutcome;
use crate::system_config::packages::ExtraArgs;
use anyhow::{bail, Context};
use bitsy_hal::os_release::parse_os_release_info;
use bitsy_hal::{HostInfoOps, LinuxHal, SystemHal};
use clap::Parser;
use std::io::{self, Write};
use std::sync::Arc;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::logging::init_with(cli.log_file.clone());

    let hal: Arc<dyn SystemHal> = Arc::new(LinuxHal::new());
    let stdout = io::stdout();
    execute(cli, hal, DistroRegistry::builtin(), &mut stdout.lock())
}

/// Run one parsed command against `hal`, printing results to `out`.
pub fn execute(
    cli: Cli,
    hal: Arc<dyn SystemHal>,
    registry: &DistroRegistry,
    out: &mut impl Write,
) -> Result<()> {
    if let Command::Detect = cli.command {
        let text = hal
            .os_release_text()
            .context("Failed to read /etc/os-release")?;
        let Some(name) = registry.detect(&text) else {
            bail!("No registered distro matches this host");
        };
        match parse_os_release_info(&text).version_id {
            Some(version) => writeln!(out, "{} {}", name, version)?,
            None => writeln!(out, "{}", name)?,
        }
        return Ok(());
    }

    let mut system = SystemConfig::load(hal.as_ref(), &cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    system.dry_run |= cli.dry_run;
    if system.dry_run {
        log::info!("🧪 Dry-run mode: no changes will be made");
    }

    let name = resolve_distro_name(cli.distro.as_deref(), hal.as_ref(), registry);
    let distro = registry.create(&name, system, hal.clone())?;
    log::info!("🐧 Using distro {}", distro.name());

    match cli.command {
        Command::SetHostname { hostname, file } => {
            log::info!("🏷️ Setting hostname to {}", hostname);
            let written = match file {
                Some(path) => distro.write_hostname(&hostname, &path),
                None => distro.set_hostname(&hostname),
            };
            written.context("Failed to set hostname")?;
        }
        Command::GetHostname { file, default } => {
            let path = file.unwrap_or_else(|| distro.config().hostname_conf_fn().to_path_buf());
            let default = match default {
                Some(default) => Some(default),
                None => hal.hostname().unwrap_or_else(|e| {
                    log::warn!("Could not read kernel hostname: {}", e);
                    None
                }),
            };
            match distro.read_hostname(&path, default.as_deref()) {
                Some(hostname) => writeln!(out, "{}", hostname)?,
                None => bail!("No hostname found in {}", path.display()),
            }
        }
        Command::Install { packages } => {
            let packages = if packages.is_empty() {
                distro.config().system().packages.clone()
            } else {
                packages
            };
            if packages.is_empty() {
                log::info!("📦 Nothing to install");
                return Ok(());
            }
            log::info!("📦 Installing {} package(s)", packages.len());
            distro
                .install_packages(&packages)
                .context("Package installation failed")?;
        }
        Command::Package {
            subcommand,
            args,
            args_json,
            packages,
        } => {
            let extra = match args_json {
                Some(json) => {
                    let value: serde_json::Value =
                        serde_json::from_str(&json).context("Invalid --args-json")?;
                    ExtraArgs::from_value(&value)?
                }
                None if args.is_empty() => None,
                None => Some(ExtraArgs::Many(args)),
            };
            distro
                .package_command(&subcommand, extra.as_ref(), &packages)
                .with_context(|| format!("Package command '{}' failed", subcommand))?;
        }
        Command::SetLocale { locale, out_fn } => {
            let locale = locale.unwrap_or_else(|| distro.default_locale().to_string());
            log::info!("🌐 Setting locale to {}", locale);
            distro
                .apply_locale(&locale, out_fn.as_deref())
                .context("Failed to set locale")?;
        }
        Command::SetTimezone { timezone } => {
            log::info!("🕒 Setting timezone to {}", timezone);
            distro
                .set_timezone(&timezone)
                .context("Failed to set timezone")?;
        }
        Command::UpdateSources => {
            let outcome = distro
                .update_package_sources()
                .context("Failed to update package sources")?;
            match outcome {
                RunOutcome::Ran => writeln!(out, "updated")?,
                RunOutcome::Skipped => writeln!(out, "skipped (already ran for this instance)")?,
            }
        }
        // Answered before a distro is built.
        Command::Detect => {}
    }
    Ok(())
}

/// Explicit `--distro`, else the host's os-release `ID`, else bitsy.
fn resolve_distro_name(
    explicit: Option<&str>,
    host: &(impl HostInfoOps + ?Sized),
    registry: &DistroRegistry,
) -> String {
    if let Some(name) = explicit {
        return name.to_string();
    }
    match host.os_release_text() {
        Ok(text) => {
            if let Some(name) = registry.detect(&text) {
                return name.to_string();
            }
            log::warn!(
                "Host is not a registered distro, assuming {}",
                BitsyDistro::NAME
            );
        }
        Err(e) => log::warn!(
            "Could not read os-release ({}), assuming {}",
            e,
            BitsyDistro::NAME
        ),
    }
    BitsyDistro::NAME.to_string()
}
