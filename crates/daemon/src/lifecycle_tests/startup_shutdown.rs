// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn config_paths_follow_install_layout() {
    let config = Config::new(InstallDir::new("/opt/recall"));
    assert_eq!(config.data_dir, PathBuf::from("/opt/recall/db"));
    assert_eq!(config.lock_path, PathBuf::from("/opt/recall/db/daemon.lock"));
    assert_eq!(config.log_path, PathBuf::from("/opt/recall/db/daemon.log"));
}

#[test]
fn startup_creates_data_dir_and_holds_lock() {
    let (_dir, config) = test_config();

    let daemon = startup(&config).unwrap();

    assert!(config.data_dir.is_dir());
    assert_eq!(probe(&config.lock_path).unwrap(), LockState::HeldByOther);
    assert_eq!(read_holder_pid(&config.lock_path), Some(std::process::id()));
    drop(daemon);
}

#[cfg(unix)]
#[test]
fn startup_creates_owner_only_data_dir() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, config) = test_config();

    let _daemon = startup(&config).unwrap();

    let mode = std::fs::metadata(&config.data_dir).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o700);
}

#[test]
fn startup_does_not_create_missing_install_dir() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("not-installed");
    let config = Config::new(InstallDir::new(missing.to_str().unwrap()));

    match startup(&config) {
        Err(LifecycleError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        Err(e) => panic!("expected NotFound, got: {e}"),
        Ok(_) => panic!("startup should fail without an install dir"),
    }
    assert!(!missing.exists());
}

#[test]
fn second_startup_fails_with_lock_failed() {
    let (_dir, config) = test_config();
    let _running = startup(&config).unwrap();

    match startup(&config) {
        Err(LifecycleError::LockFailed(_)) => {} // expected
        Err(e) => panic!("expected LockFailed, got: {e}"),
        Ok(_) => panic!("expected LockFailed, but startup succeeded"),
    }

    // The running daemon's PID must survive the failed attempt
    assert_eq!(read_holder_pid(&config.lock_path), Some(std::process::id()));
}

#[test]
fn shutdown_releases_lock_but_keeps_file() {
    let (_dir, config) = test_config();
    let daemon = startup(&config).unwrap();

    daemon.shutdown();

    assert_eq!(probe(&config.lock_path).unwrap(), LockState::Free);
    assert!(config.lock_path.exists(), "lock file must not be removed");
}

#[test]
fn restart_after_shutdown() {
    let (_dir, config) = test_config();
    startup(&config).unwrap().shutdown();
    let daemon = startup(&config).unwrap();
    assert_eq!(daemon.config.lock_path, config.lock_path);
}

#[test]
fn unopenable_lock_is_not_reported_as_running() {
    let (_dir, config) = test_config();
    std::fs::create_dir_all(&config.lock_path).unwrap();

    match startup(&config) {
        Err(LifecycleError::Lock(LockError::Open { .. })) => {}
        Err(e) => panic!("expected Lock(Open), got: {e}"),
        Ok(_) => panic!("expected failure"),
    }
}

#[test]
fn startup_marker_is_appended() {
    let (_dir, config) = test_config();

    write_startup_marker(&config).unwrap();
    write_startup_marker(&config).unwrap();

    let log = std::fs::read_to_string(&config.log_path).unwrap();
    let expected = format!("{}{})", STARTUP_MARKER_PREFIX, std::process::id());
    assert_eq!(log.lines().filter(|l| *l == expected).count(), 2);
}

#[test]
fn startup_error_is_written_to_log() {
    let (_dir, config) = test_config();
    write_startup_marker(&config).unwrap();

    let err = LifecycleError::Io(std::io::Error::other("disk on fire"));
    write_startup_error(&config, &err);

    let log = std::fs::read_to_string(&config.log_path).unwrap();
    assert!(
        log.contains("ERROR Failed to start daemon: IO error: disk on fire"),
        "{log}"
    );
}
