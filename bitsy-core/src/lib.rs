//! 🐧 Bitsy distro plugin core library.
//!
//! `bitsy-core` holds the distro capability set ([`distro::DistroOps`]), the
//! hostname file handling, package command construction and the run-once
//! bookkeeping used by the `bitsy` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod distro;
pub mod errors;
pub mod logging;
pub mod runner;
pub mod system_config;

pub use commands::run;
