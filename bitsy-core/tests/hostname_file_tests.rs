use bitsy_core::config::{DistroConfig, SystemConfig};
use bitsy_core::distro::{BitsyDistro, DistroOps};
use bitsy_core::errors::DistroError;
use bitsy_hal::LinuxHal;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn distro_for(hostname_file: &Path) -> BitsyDistro {
    let system = SystemConfig {
        hostname_conf_fn: hostname_file.to_path_buf(),
        ..SystemConfig::default()
    };
    BitsyDistro::new(
        DistroConfig::new(BitsyDistro::NAME, system),
        Arc::new(LinuxHal::new()),
    )
}

#[test]
fn set_hostname_keeps_comments_on_disk() {
    let temp_dir = TempDir::new().expect("temp dir");
    let path = temp_dir.path().join("hostname");
    fs::write(&path, "# Set by the image builder\n  old-host  # was here\n").expect("seed file");

    let distro = distro_for(&path);
    distro.set_hostname("bitsy-01").expect("set hostname");

    let content = fs::read_to_string(&path).expect("read back");
    assert_eq!(content, "# Set by the image builder\n  bitsy-01  # was here\n");
    assert_eq!(
        distro.read_system_hostname(),
        (path.clone(), Some("bitsy-01".to_string()))
    );
}

#[test]
fn set_hostname_twice_is_idempotent() {
    let temp_dir = TempDir::new().expect("temp dir");
    let path = temp_dir.path().join("hostname");
    fs::write(&path, "# comment\nold\n").expect("seed file");

    let distro = distro_for(&path);
    distro.set_hostname("bitsy-01").expect("first set");
    let once = fs::read_to_string(&path).expect("read once");
    distro.set_hostname("bitsy-01").expect("second set");
    let twice = fs::read_to_string(&path).expect("read twice");

    assert_eq!(once, twice);
}

#[test]
fn new_hostname_file_gets_0644() {
    let temp_dir = TempDir::new().expect("temp dir");
    let path = temp_dir.path().join("etc").join("hostname");

    distro_for(&path).set_hostname("fresh").expect("set hostname");

    assert_eq!(fs::read_to_string(&path).expect("read back"), "fresh\n");
    let mode = fs::metadata(&path).expect("metadata").permissions().mode();
    assert_eq!(mode & 0o777, 0o644);
}

#[test]
fn missing_file_reads_as_default() {
    let temp_dir = TempDir::new().expect("temp dir");
    let path = temp_dir.path().join("absent");

    let distro = distro_for(&path);
    assert_eq!(
        distro.read_hostname(&path, Some("default")).as_deref(),
        Some("default")
    );
    assert_eq!(distro.read_hostname(&path, None), None);
}

#[test]
fn unwritable_location_is_a_write_error() {
    let temp_dir = TempDir::new().expect("temp dir");
    let blocker = temp_dir.path().join("not-a-dir");
    fs::write(&blocker, "").expect("create blocker");
    let path = blocker.join("hostname");

    let err = distro_for(&path)
        .write_hostname("bitsy-01", &path)
        .expect_err("write should fail");
    assert!(matches!(err, DistroError::Write { path: ref p, .. } if p == &path));
}
