// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake daemon launcher for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use recall_core::DaemonLock;

use super::{DaemonLauncher, LaunchSpec};
use crate::guard::GuardError;

/// Recorded launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCall {
    pub spec: LaunchSpec,
    pub pid: u32,
}

struct FakeLauncherState {
    calls: Vec<LaunchCall>,
    held: Vec<DaemonLock>,
    next_pid: u32,
}

/// Fake launcher for testing
///
/// Records every launch. With [`FakeLauncher::holding_lock`] it also takes
/// the daemon lock on launch, like a real daemon would, until
/// [`FakeLauncher::stop_daemons`] is called.
#[derive(Clone)]
pub struct FakeLauncher {
    inner: Arc<Mutex<FakeLauncherState>>,
    take_lock: bool,
    fail: bool,
}

impl Default for FakeLauncher {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeLauncherState {
                calls: Vec::new(),
                held: Vec::new(),
                next_pid: 10_000,
            })),
            take_lock: false,
            fail: false,
        }
    }
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launched "daemons" hold the lock until stopped.
    pub fn holding_lock() -> Self {
        Self {
            take_lock: true,
            ..Self::default()
        }
    }

    /// Every launch fails as if the script were missing.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Get all recorded launches
    pub fn calls(&self) -> Vec<LaunchCall> {
        self.inner.lock().calls.clone()
    }

    /// Release every lock taken by launched daemons, as if they exited.
    pub fn stop_daemons(&self) {
        self.inner.lock().held.clear();
    }
}

impl DaemonLauncher for FakeLauncher {
    fn launch(&self, spec: &LaunchSpec) -> Result<u32, GuardError> {
        let mut state = self.inner.lock();
        state.next_pid += 1;
        let pid = state.next_pid;
        state.calls.push(LaunchCall {
            spec: spec.clone(),
            pid,
        });

        if self.fail {
            return Err(GuardError::Spawn {
                command: spec.command_line(),
                source: io::Error::from(io::ErrorKind::NotFound),
            });
        }

        if self.take_lock {
            let lock = DaemonLock::acquire(&spec.install_dir.lock_path())?;
            state.held.push(lock);
        }

        Ok(pid)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
