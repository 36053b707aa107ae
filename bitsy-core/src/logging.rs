use env_logger::Target;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_LOG_FILE: &str = "/var/log/bitsy/distro.log";

/// Log to `log_file`, or to [`DEFAULT_LOG_FILE`] when none is given.
///
/// If the file cannot be opened (permissions, read-only FS, etc.) logs go to
/// stderr instead. `RUST_LOG` overrides the default `info` level.
pub fn init_with(log_file: Option<PathBuf>) {
    let path = log_file.unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    let target = open_target(&path).unwrap_or(Target::Stderr);

    let mut builder = env_logger::Builder::new();
    builder.filter_level(log::LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    // A second init (tests, embedding) keeps the first logger.
    let _ = builder.target(target).try_init();
}

fn open_target(path: &Path) -> io::Result<Target> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Target::Pipe(Box::new(file)))
}
