//! File read/write primitives.

use crate::HalResult;
use std::path::Path;

/// How [`FileOps::write_file`] treats existing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Create or truncate.
    Overwrite,
    /// Create or append.
    Append,
}

pub trait FileOps {
    /// Read a whole file as UTF-8 text.
    fn read_file(&self, path: &Path) -> HalResult<String>;

    /// Write `content` to `path`, creating parent directories as needed.
    ///
    /// `mode` is applied to the file whether or not it already existed.
    fn write_file(
        &self,
        path: &Path,
        content: &str,
        mode: u32,
        write_mode: WriteMode,
    ) -> HalResult<()>;
}
