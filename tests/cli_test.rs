// file: tests/cli_test.rs
// version: 1.0.0
// guid: f8a9b0c1-d2e3-4456-7890-457890123461

//! Binary-level checks for the command line surface
//!
//! Only the flag surface is exercised here; an actual run mutates the
//! host and needs root, so it is covered by the step-level tests with a
//! fake system manager instead.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_describes_the_flag_surface() {
    Command::cargo_bin("postinstall-agent")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("provisioning"))
        .stdout(predicate::str::contains("--non-interactive"))
        .stdout(predicate::str::contains("--ssh-key"))
        .stdout(predicate::str::contains("--package-list"));
}

#[test]
fn version_flag_reports_the_crate_version() {
    Command::cargo_bin("postinstall-agent")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_flags_are_rejected() {
    Command::cargo_bin("postinstall-agent")
        .unwrap()
        .arg("--no-such-flag")
        .assert()
        .failure();
}

#[test]
fn refuses_to_run_without_superuser_privileges() {
    // The guard cannot fire when the test suite itself runs as root.
    if unsafe { libc::geteuid() } == 0 {
        return;
    }

    let temp = tempfile::TempDir::new().unwrap();

    Command::cargo_bin("postinstall-agent")
        .unwrap()
        .current_dir(temp.path())
        .arg("--non-interactive")
        .assert()
        .failure()
        .stderr(predicate::str::contains("superuser"));

    // The guard fired before any side effect: the working directory
    // holds the log directory and nothing else.
    let entries: Vec<_> = std::fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("logs")]);
}
