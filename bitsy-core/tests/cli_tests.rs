use bitsy_core::cli::Cli;
use bitsy_core::commands::execute;
use bitsy_core::distro::DistroRegistry;
use bitsy_core::errors::DistroError;
use bitsy_hal::{FakeHal, SystemHal};
use clap::Parser;
use std::sync::Arc;

const CONFIG: &str = "/etc/bitsy/distro.toml";
const OS_RELEASE: &str = "NAME=\"Bitsy Linux\"\nID=bitsy\nVERSION_ID=4.0\n";

fn run(hal: &FakeHal, args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("bitsy").chain(args.iter().copied()))?;
    let hal: Arc<dyn SystemHal> = Arc::new(hal.clone());
    let mut out = Vec::new();
    execute(cli, hal, DistroRegistry::builtin(), &mut out)?;
    Ok(String::from_utf8(out)?)
}

fn bitsy_host() -> FakeHal {
    FakeHal::new().with_file("/etc/os-release", OS_RELEASE)
}

#[test]
fn detect_prints_registered_name() {
    let hal = bitsy_host();
    assert_eq!(run(&hal, &["detect"]).unwrap(), "bitsy 4.0\n");

    let unversioned = FakeHal::new().with_file("/etc/os-release", "ID=bitsy\n");
    assert_eq!(run(&unversioned, &["detect"]).unwrap(), "bitsy\n");
}

#[test]
fn detect_fails_on_foreign_host() {
    let hal = FakeHal::new().with_file("/etc/os-release", "ID=fedora\n");
    assert!(run(&hal, &["detect"]).is_err());
}

#[test]
fn set_and_get_hostname() {
    let hal = bitsy_host().with_file("/etc/hostname", "# image default\nlocalhost\n");

    run(&hal, &["set-hostname", "bitsy-01"]).unwrap();
    assert_eq!(
        hal.file("/etc/hostname").as_deref(),
        Some("# image default\nbitsy-01\n")
    );
    assert_eq!(run(&hal, &["get-hostname"]).unwrap(), "bitsy-01\n");
}

#[test]
fn get_hostname_falls_back_to_kernel_name() {
    let hal = bitsy_host();
    hal.set_hostname(Some("kernel-name"));

    assert_eq!(run(&hal, &["get-hostname"]).unwrap(), "kernel-name\n");
    assert_eq!(
        run(&hal, &["get-hostname", "--default", "explicit"]).unwrap(),
        "explicit\n"
    );
}

#[test]
fn get_hostname_without_any_source_fails() {
    let hal = bitsy_host();
    assert!(run(&hal, &["get-hostname", "--file", "/tmp/none"]).is_err());
}

#[test]
fn install_uses_configured_packages() {
    let hal = bitsy_host().with_file(CONFIG, "packages = [\"htop\", [\"git\", \"2.40\"]]\n");

    run(&hal, &["install"]).unwrap();
    assert_eq!(
        hal.commands(),
        vec![vec!["dnf", "-y", "install", "htop", "git-2.40"]]
    );
}

#[test]
fn install_pins_versions_given_on_command_line() {
    let hal = bitsy_host();

    run(&hal, &["install", "vim", "git=2.40"]).unwrap();
    assert_eq!(
        hal.commands(),
        vec![vec!["dnf", "-y", "install", "vim", "git-2.40"]]
    );
}

#[test]
fn install_rejects_package_without_name() {
    let hal = bitsy_host();
    assert!(run(&hal, &["install", "=1.0"]).is_err());
    assert!(hal.commands().is_empty());
}

#[test]
fn install_with_nothing_to_do_runs_nothing() {
    let hal = bitsy_host();
    run(&hal, &["install"]).unwrap();
    assert!(hal.commands().is_empty());
}

#[test]
fn package_args_json_shapes() {
    let hal = bitsy_host();

    run(&hal, &["package", "install", "--args-json", "\"--refresh\"", "foo"]).unwrap();
    run(
        &hal,
        &["package", "makecache", "--args-json", "[\"--option\", \"x\"]"],
    )
    .unwrap();

    assert_eq!(
        hal.commands(),
        vec![
            vec!["dnf", "-y", "--refresh", "install", "foo"],
            vec!["dnf", "-y", "--option", "x", "makecache"],
        ]
    );
}

#[test]
fn package_args_json_rejects_other_shapes() {
    let hal = bitsy_host();
    let err = run(&hal, &["package", "install", "--args-json", "{\"a\": 1}"]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DistroError>(),
        Some(DistroError::ContractViolation(_))
    ));
    assert!(hal.commands().is_empty());
}

#[test]
fn set_locale_defaults_to_configured_locale() {
    let hal = bitsy_host().with_file(CONFIG, "default_locale = \"en_GB.UTF-8\"\n");
    run(&hal, &["set-locale"]).unwrap();
    assert_eq!(
        hal.commands(),
        vec![vec!["localectl", "set-locale", "en_GB.UTF-8"]]
    );
}

#[test]
fn update_sources_reports_skip() {
    let hal = bitsy_host().with_file(CONFIG, "instance_id = \"iid-cli\"\n");
    assert_eq!(run(&hal, &["update-sources"]).unwrap(), "updated\n");
    assert_eq!(
        run(&hal, &["update-sources"]).unwrap(),
        "skipped (already ran for this instance)\n"
    );
    assert_eq!(hal.commands().len(), 1);
}

#[test]
fn dry_run_update_sources_honours_semaphore() {
    let hal = bitsy_host().with_file(CONFIG, "instance_id = \"iid-cli\"\n");
    assert_eq!(
        run(&hal, &["--dry-run", "update-sources"]).unwrap(),
        "updated\n"
    );

    run(&hal, &["update-sources"]).unwrap();
    assert_eq!(
        run(&hal, &["--dry-run", "update-sources"]).unwrap(),
        "skipped (already ran for this instance)\n"
    );
    assert_eq!(hal.commands().len(), 1);
}

#[test]
fn dry_run_flag_overrides_config() {
    let hal = bitsy_host().with_file("/etc/hostname", "old\n");

    run(&hal, &["--dry-run", "set-timezone", "UTC"]).unwrap();
    run(&hal, &["set-hostname", "new", "--dry-run"]).unwrap();

    assert!(hal.commands().is_empty());
    assert_eq!(hal.file("/etc/hostname").as_deref(), Some("old\n"));
}

#[test]
fn unknown_distro_is_rejected() {
    let hal = bitsy_host();
    let err = run(&hal, &["--distro", "gentoo", "set-timezone", "UTC"]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DistroError>(),
        Some(DistroError::UnknownDistro(_))
    ));
}

#[test]
fn foreign_host_falls_back_to_bitsy() {
    let hal = FakeHal::new();
    run(&hal, &["set-timezone", "Europe/London"]).unwrap();
    assert_eq!(
        hal.commands(),
        vec![vec!["timedatectl", "set-timezone", "Europe/London"]]
    );
}
