// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-instance guard for the recall daemon.
//!
//! `ensure data dir → probe lock → { held: return | free: launch, grace wait }`
//!
//! The lock probe is the only serialization point. Two launchers that both
//! probe before the first daemon takes the lock will both launch; the losing
//! daemon finds the lock held and exits. That window is not closed here.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Duration;

use recall_core::{
    duration_ms, probe, read_holder_pid, InstallDir, LockError, LockState, DEFAULT_LAUNCHER,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::launcher::{DaemonLauncher, LaunchMode, LaunchSpec, ProcessLauncher};

/// Time given to a freshly launched daemon before the caller carries on.
pub const DEFAULT_GRACE: Duration = Duration::from_secs(5);

/// Guard configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Launcher script file name under `<install>/bin`
    pub launcher: String,
    /// Grace wait after launching
    pub grace: Duration,
    /// How the launcher script is run
    pub mode: LaunchMode,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            launcher: DEFAULT_LAUNCHER.to_string(),
            grace: DEFAULT_GRACE,
            mode: LaunchMode::default(),
        }
    }
}

/// What the guard found or did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The lock was held; nothing was launched.
    AlreadyRunning { holder_pid: Option<u32> },
    /// The lock was free; the daemon was launched and the grace wait elapsed.
    Launched { pid: u32 },
}

/// Guard errors. All of them are fatal for the bootstrap.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("Failed to create dir '{}': {source}", path.display())]
    CreateDataDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error("Failed to start daemon with '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Daemon launcher '{command}' failed: {status}")]
    LauncherFailed { command: String, status: ExitStatus },
}

/// Create the data directory (owner-only on unix). An existing one is fine.
pub fn ensure_data_dir(path: &Path) -> Result<(), GuardError> {
    recall_core::ensure_data_dir(path).map_err(|source| GuardError::CreateDataDir {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "data directory ready");
    Ok(())
}

/// Tests the daemon lock and launches the daemon through `L` when it is free.
pub struct InstanceGuard<L> {
    launcher: L,
    config: GuardConfig,
}

impl<L: DaemonLauncher> InstanceGuard<L> {
    pub fn new(launcher: L, config: GuardConfig) -> Self {
        Self { launcher, config }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Make sure a daemon is running for `install_dir`.
    ///
    /// Blocks for the grace period after a launch. Returns without
    /// launching when another process holds the lock.
    pub fn ensure(&self, install_dir: &InstallDir) -> Result<Outcome, GuardError> {
        ensure_data_dir(&install_dir.data_dir())?;

        let lock_path = install_dir.lock_path();
        if probe(&lock_path)? == LockState::HeldByOther {
            let holder_pid = read_holder_pid(&lock_path);
            info!(path = %lock_path.display(), ?holder_pid, "daemon already started");
            return Ok(Outcome::AlreadyRunning { holder_pid });
        }

        let spec = LaunchSpec::new(install_dir, &self.config.launcher);
        info!(command = %spec.command_line(), "starting daemon");
        let pid = self.launcher.launch(&spec)?;

        info!(
            pid,
            grace_ms = duration_ms(self.config.grace),
            "daemon started, please wait..."
        );
        std::thread::sleep(self.config.grace);

        Ok(Outcome::Launched { pid })
    }
}

/// Make sure a daemon is running, launching `<install>/bin/<launcher>` if needed.
pub fn ensure_unique_and_running(
    install_dir: &InstallDir,
    config: &GuardConfig,
) -> Result<Outcome, GuardError> {
    InstanceGuard::new(ProcessLauncher::new(config.mode), config.clone()).ensure(install_dir)
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
