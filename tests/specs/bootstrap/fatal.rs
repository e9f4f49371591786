//! Fatal bootstrap error specs
//!
//! Failures before the handoff end the process with a diagnostic on stderr
//! and a non-zero exit status.

use crate::prelude::*;
use serial_test::serial;

#[test]
#[serial]
fn uncreatable_data_dir_is_fatal() {
    let install = Install::new();

    install
        .recall()
        .arg0("/nonexistent/recall-root/bin/recall")
        .fails()
        .stderr_has("Error: Failed to create dir '/nonexistent/recall-root/db'")
        .stderr_lacks("starting daemon");

    assert_eq!(install.launches(), 0);
}

#[test]
#[serial]
fn missing_launcher_script_is_fatal() {
    let install = Install::without_launcher();

    install
        .recall()
        .fails()
        .stderr_has("Error: Failed to start daemon with")
        .stderr_has("recalld.sh");
}

#[test]
#[serial]
fn failing_launcher_is_fatal_in_wait_mode() {
    let install = Install::new();
    install.launcher_script("#!/bin/sh\nexit 3\n");

    install
        .recall()
        .env("RECALL_LAUNCH_MODE", "wait")
        .fails()
        .stderr_has("Error: Daemon launcher")
        .stderr_has("failed");
}

#[test]
#[serial]
fn failing_launcher_is_ignored_when_detached() {
    let install = Install::new();
    install.launcher_script("#!/bin/sh\nexit 3\n");

    install.recall().passes();
}

#[test]
#[serial]
fn invalid_launch_mode_is_fatal() {
    let install = Install::new();

    install
        .recall()
        .env("RECALL_LAUNCH_MODE", "forked")
        .fails()
        .stderr_has("invalid launch mode 'forked'");

    assert_eq!(install.launches(), 0);
}

#[test]
#[serial]
fn unknown_argument_is_rejected() {
    let install = Install::new();

    install.recall().args(&["--bogus"]).fails();
    assert!(!install.data_dir().exists());
}
