//! Bitsy host abstraction layer (HAL).
//!
//! Everything that touches the running system (files, subprocesses, `/etc`)
//! goes through these traits so distro operations can be exercised against
//! [`FakeHal`] in tests.

pub mod hal;
pub mod os_release;

pub use bitsy_error::{HalError, HalResult};
pub use hal::{
    FakeHal, FileOps, HostInfoOps, LinuxHal, Operation, OsReleaseInfo, ProcessOps, SystemHal,
    WriteMode,
};
