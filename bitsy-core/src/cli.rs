//! CLI argument parsing for bitsy

use crate::config::DEFAULT_CONFIG_PATH;
use crate::system_config::pkglist::PackageSpec;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Parser)]
#[command(name = "bitsy")]
#[command(about = "🐧 Bitsy Linux distro operations: hostname, packages, locale, timezone")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (TOML)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    /// Distro implementation to use (detected from /etc/os-release when omitted)
    #[arg(long, global = true)]
    pub distro: Option<String>,

    /// Log commands and writes instead of performing them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Log file (defaults to /var/log/bitsy/distro.log)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 🏷️ Write a hostname, keeping comments in the hostname file
    SetHostname {
        hostname: String,

        /// Hostname file (defaults to the configured one)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// 🔎 Print the hostname stored in the hostname file
    GetHostname {
        #[arg(long)]
        file: Option<PathBuf>,

        /// Printed when the file holds no hostname
        #[arg(long)]
        default: Option<String>,
    },

    /// 📦 Install packages (`name` or `name=version`); uses the configured list when empty
    Install {
        #[arg(value_parser = PackageSpec::from_str)]
        packages: Vec<PackageSpec>,
    },

    /// 🧰 Run an arbitrary package tool subcommand
    Package {
        subcommand: String,

        /// Extra argument placed before the subcommand (repeatable)
        #[arg(long = "arg", allow_hyphen_values = true)]
        args: Vec<String>,

        /// Extra arguments as JSON: a string or a list of strings
        #[arg(long, conflicts_with = "args")]
        args_json: Option<String>,

        #[arg(value_parser = PackageSpec::from_str)]
        packages: Vec<PackageSpec>,
    },

    /// 🌐 Set the system locale (defaults to the configured locale)
    SetLocale {
        locale: Option<String>,

        /// Locale file the caller expects to be written
        #[arg(long)]
        out_fn: Option<PathBuf>,
    },

    /// 🕒 Set the system timezone
    SetTimezone { timezone: String },

    /// 🔄 Refresh package metadata (once per instance)
    UpdateSources,

    /// 🧭 Print the distro (and VERSION_ID) detected from /etc/os-release
    Detect,
}
