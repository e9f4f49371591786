//! recalld lifecycle specs
//!
//! Verify the daemon shim takes the lock, refuses a second instance and
//! releases the lock on SIGTERM.

use crate::prelude::*;
use serial_test::serial;
use std::process::Stdio;

fn spawn_recalld(install: &Install) -> std::process::Child {
    let mut cmd = install.recalld().command();
    cmd.stdout(Stdio::null()).stderr(Stdio::null());
    cmd.spawn().unwrap()
}

#[test]
#[serial]
fn recalld_version() {
    let run = recalld().args(&["--version"]).passes();
    assert!(run.stdout().starts_with("recalld "), "{}", run.stdout());
}

#[test]
#[serial]
fn recalld_requires_install_dir() {
    recalld().fails().stderr_has("Usage: recalld");
}

#[test]
#[serial]
fn recalld_holds_lock_and_records_pid() {
    let install = Install::new();
    let mut child = spawn_recalld(&install);

    assert!(install.wait_for_daemon(), "log: {}", install.daemon_log());
    assert_eq!(install.daemon_pid(), Some(child.id()));

    assert!(install.stop_daemon());
    assert!(child.wait().unwrap().success());
    assert!(install.lock_path().exists(), "lock file stays behind");
}

#[test]
#[serial]
fn second_recalld_exits() {
    let install = Install::new();
    let mut child = spawn_recalld(&install);
    assert!(install.wait_for_daemon(), "log: {}", install.daemon_log());

    install
        .recalld()
        .fails()
        .stderr_has("recalld is already running")
        .stderr_has(&format!("pid: {}", child.id()));

    assert_eq!(install.daemon_pid(), Some(child.id()));
    assert!(install.stop_daemon());
    child.wait().unwrap();
}

#[test]
#[serial]
fn recalld_writes_startup_marker() {
    let install = Install::new();
    let mut child = spawn_recalld(&install);
    assert!(install.wait_for_daemon(), "log: {}", install.daemon_log());

    assert!(install
        .daemon_log()
        .contains(&format!("--- recalld: starting (pid: {})", child.id())));

    assert!(install.stop_daemon());
    child.wait().unwrap();
}
