//! Host information (read-only).
//!
//! This is "world-touching" (reads `/proc`, `/etc`) and belongs in the HAL.

use crate::HalResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsReleaseInfo {
    pub id: Option<String>,
    pub version_id: Option<String>,
}

pub trait HostInfoOps {
    /// Running kernel hostname, if available.
    fn hostname(&self) -> HalResult<Option<String>>;
    /// Raw `/etc/os-release` content.
    fn os_release_text(&self) -> HalResult<String>;
}
