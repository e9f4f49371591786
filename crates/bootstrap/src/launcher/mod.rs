// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon launchers

mod process;

pub use process::ProcessLauncher;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLauncher, LaunchCall};

use std::path::PathBuf;
use std::str::FromStr;

use recall_core::InstallDir;
use thiserror::Error;

use crate::guard::GuardError;

/// How the launcher script is run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LaunchMode {
    /// Spawn and return at once; the script is reaped in the background.
    #[default]
    Detached,
    /// Wait for the script to exit. The script daemonizes itself; a
    /// non-zero exit status is an error.
    Wait,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid launch mode '{0}': expected 'detached' or 'wait'")]
pub struct ParseLaunchModeError(pub String);

impl FromStr for LaunchMode {
    type Err = ParseLaunchModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detached" => Ok(LaunchMode::Detached),
            "wait" => Ok(LaunchMode::Wait),
            _ => Err(ParseLaunchModeError(s.to_string())),
        }
    }
}

/// What to launch: `<install>/bin/<launcher> <install>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    /// Launcher script path
    pub program: PathBuf,
    /// Passed to the script as its only argument
    pub install_dir: InstallDir,
}

impl LaunchSpec {
    pub fn new(install_dir: &InstallDir, launcher: &str) -> Self {
        Self {
            program: install_dir.launcher_path(launcher),
            install_dir: install_dir.clone(),
        }
    }

    /// Shell-style rendering for diagnostics, with the argument quoted.
    pub fn command_line(&self) -> String {
        format!("{} \"{}\"", self.program.display(), self.install_dir)
    }
}

/// Starts the daemon out of process.
pub trait DaemonLauncher {
    /// Launch the daemon described by `spec`, returning the launched process id.
    fn launch(&self, spec: &LaunchSpec) -> Result<u32, GuardError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
