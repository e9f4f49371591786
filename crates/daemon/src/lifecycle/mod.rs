// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup and shutdown around the daemon lock.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use recall_core::{duration_ms, ensure_data_dir, DaemonLock, InstallDir, LockError};
use thiserror::Error;
use tracing::info;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Installation directory passed by the launcher script
    pub install_dir: InstallDir,
    /// Data directory (`<install>/db`)
    pub data_dir: PathBuf,
    /// Path to the daemon lock file
    pub lock_path: PathBuf,
    /// Path to the daemon log file
    pub log_path: PathBuf,
}

impl Config {
    pub fn new(install_dir: InstallDir) -> Self {
        Self {
            data_dir: install_dir.data_dir(),
            lock_path: install_dir.lock_path(),
            log_path: install_dir.log_path(),
            install_dir,
        }
    }
}

/// Daemon state during operation.
pub struct DaemonState {
    /// Configuration
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    lock: DaemonLock,
    /// When daemon started
    pub start_time: Instant,
}

impl DaemonState {
    /// Shutdown the daemon, releasing the lock.
    ///
    /// The lock file stays in place: launchers and daemons must keep locking
    /// the same inode.
    pub fn shutdown(self) {
        info!(
            uptime_ms = duration_ms(self.start_time.elapsed()),
            "Shutting down daemon..."
        );
        let lock_path = self.lock.path().to_path_buf();
        drop(self.lock);
        info!(path = %lock_path.display(), "Daemon shutdown complete");
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] LockError),

    #[error(transparent)]
    Lock(LockError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the daemon: create the data directory and take the lock.
pub fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    ensure_data_dir(&config.data_dir)?;

    let lock = DaemonLock::acquire(&config.lock_path).map_err(|e| match e {
        LockError::AlreadyHeld { .. } => LifecycleError::LockFailed(e),
        e => LifecycleError::Lock(e),
    })?;

    info!(
        path = %config.lock_path.display(),
        pid = std::process::id(),
        "acquired daemon lock"
    );

    Ok(DaemonState {
        config: config.clone(),
        lock,
        start_time: Instant::now(),
    })
}

/// Startup marker prefix written to log before anything else.
/// Full format: "--- recalld: starting (pid: 12345)"
pub const STARTUP_MARKER_PREFIX: &str = "--- recalld: starting (pid: ";

/// Write startup marker to log file (appends to existing log)
pub fn write_startup_marker(config: &Config) -> Result<(), LifecycleError> {
    ensure_data_dir(&config.data_dir)?;

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    writeln!(file, "{}{})", STARTUP_MARKER_PREFIX, std::process::id())?;

    Ok(())
}

/// Write startup error synchronously to log file.
/// The non-blocking log writer may not flush before the process exits.
pub fn write_startup_error(config: &Config, error: &LifecycleError) {
    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
    else {
        return;
    };
    let _ = writeln!(file, "ERROR Failed to start daemon: {}", error);
}

#[cfg(test)]
#[path = "../lifecycle_tests/mod.rs"]
mod tests;
