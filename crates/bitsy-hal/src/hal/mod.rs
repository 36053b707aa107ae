//! HAL trait definitions and implementations.
//!
//! This module defines the core traits for system operations and provides
//! both real (LinuxHal) and fake (FakeHal) implementations.

pub mod fake_hal;
pub mod file_ops;
pub mod host_info_ops;
pub mod linux_hal;
pub mod process_ops;

pub use fake_hal::{FakeHal, Operation};
pub use file_ops::{FileOps, WriteMode};
pub use host_info_ops::{HostInfoOps, OsReleaseInfo};
pub use linux_hal::LinuxHal;
pub use process_ops::ProcessOps;

/// Complete HAL combining all system operation traits.
pub trait SystemHal: FileOps + ProcessOps + HostInfoOps + Send + Sync {}

/// Automatically implement SystemHal for any type implementing all required traits.
impl<T> SystemHal for T where T: FileOps + ProcessOps + HostInfoOps + Send + Sync {}
