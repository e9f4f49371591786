//! Daemon launch specs
//!
//! Verify that recall starts the daemon through the launcher script when
//! nothing holds the lock, and reuses it afterwards.

use crate::prelude::*;
use serial_test::serial;
use std::os::unix::fs::PermissionsExt;

#[test]
#[serial]
fn first_run_starts_daemon_and_waits() {
    let install = Install::new();

    install
        .recall()
        .passes()
        .stderr_has("starting daemon")
        .stderr_has("daemon started, please wait...")
        .stderr_lacks("daemon already started");

    assert!(
        install.wait_for_daemon(),
        "daemon should hold the lock\nlog: {}",
        install.daemon_log()
    );
    assert_eq!(install.launches(), 1);
}

#[test]
#[serial]
fn data_dir_is_created_owner_only() {
    let install = Install::new();
    install.recall().passes();

    let mode = std::fs::metadata(install.data_dir())
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o700, "unexpected mode {mode:o}");
    assert!(install.lock_path().is_file());
}

#[test]
#[serial]
fn second_run_reuses_running_daemon() {
    let install = Install::new();

    install.recall().passes();
    assert!(install.wait_for_daemon(), "log: {}", install.daemon_log());

    install
        .recall()
        .passes()
        .stderr_has("daemon already started")
        .stderr_lacks("starting daemon");

    assert_eq!(install.launches(), 1);
}

#[test]
#[serial]
fn sequential_runs_launch_once() {
    let install = Install::new();

    install.recall().passes();
    assert!(install.wait_for_daemon(), "log: {}", install.daemon_log());
    for _ in 0..4 {
        install.recall().passes();
    }

    assert_eq!(install.launches(), 1);
}

#[test]
#[serial]
fn stopped_daemon_is_started_again() {
    let install = Install::new();

    install.recall().passes();
    assert!(install.wait_for_daemon(), "log: {}", install.daemon_log());
    let first = install.daemon_pid();

    assert!(install.stop_daemon(), "daemon should release the lock");

    install.recall().passes().stderr_has("starting daemon");
    assert!(install.wait_for_daemon(), "log: {}", install.daemon_log());

    assert_eq!(install.launches(), 2);
    assert_ne!(install.daemon_pid(), first);
}

#[test]
#[serial]
fn launcher_receives_install_dir_with_spaces() {
    let install = Install::new();
    install.launcher_script("#!/bin/sh\nprintf '%s|%s' \"$#\" \"$1\" > \"$1/args\"\n");

    install.recall().passes();

    let args_path = install.root().join("args");
    assert!(wait_for(SPEC_WAIT_MAX_MS, || args_path.exists()));
    assert!(wait_for(SPEC_WAIT_MAX_MS, || {
        std::fs::read_to_string(&args_path).unwrap_or_default()
            == format!("1|{}", install.root_str())
    }));
}

#[test]
#[serial]
fn custom_launcher_name_from_environment() {
    let install = Install::without_launcher();
    let script = install.bin().join("start-daemon");
    std::fs::write(&script, "#!/bin/sh\ntouch \"$1/custom\"\n").unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    install
        .recall()
        .env("RECALL_LAUNCHER", "start-daemon")
        .passes();

    let marker = install.root().join("custom");
    assert!(wait_for(SPEC_WAIT_MAX_MS, || marker.exists()));
}

#[test]
#[serial]
fn wait_mode_runs_self_daemonizing_launcher() {
    let install = Install::new();
    install.launcher_script(&format!(
        "#!/bin/sh\necho launched >> \"$1/launches\"\n\"{}\" \"$1\" &\n",
        recalld_binary().display()
    ));

    install
        .recall()
        .env("RECALL_LAUNCH_MODE", "wait")
        .passes()
        .stderr_has("daemon started, please wait...");

    assert!(install.wait_for_daemon(), "log: {}", install.daemon_log());
    assert_eq!(install.launches(), 1);
}
