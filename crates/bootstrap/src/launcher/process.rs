// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launch the daemon as an independent operating-system process.

use std::process::{Child, Command, Stdio};

use tracing::{debug, warn};

use super::{DaemonLauncher, LaunchMode, LaunchSpec};
use crate::guard::GuardError;

/// Runs the launcher script as a detached process.
///
/// The script gets no stdio from us and runs in its own process group, so
/// it survives the foreground application exiting and does not receive the
/// terminal's job-control signals.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher {
    mode: LaunchMode,
}

impl ProcessLauncher {
    pub fn new(mode: LaunchMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> LaunchMode {
        self.mode
    }
}

impl DaemonLauncher for ProcessLauncher {
    fn launch(&self, spec: &LaunchSpec) -> Result<u32, GuardError> {
        let mut cmd = Command::new(&spec.program);
        cmd.arg(spec.install_dir.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        detach(&mut cmd);

        let mut child = cmd.spawn().map_err(|source| GuardError::Spawn {
            command: spec.command_line(),
            source,
        })?;
        let pid = child.id();
        debug!(pid, program = %spec.program.display(), "spawned daemon launcher");

        match self.mode {
            LaunchMode::Detached => reap_in_background(child, spec.command_line()),
            LaunchMode::Wait => {
                let status = child.wait().map_err(|source| GuardError::Spawn {
                    command: spec.command_line(),
                    source,
                })?;
                if !status.success() {
                    return Err(GuardError::LauncherFailed {
                        command: spec.command_line(),
                        status,
                    });
                }
            }
        }

        Ok(pid)
    }
}

#[cfg(unix)]
fn detach(cmd: &mut Command) {
    use std::os::unix::process::CommandExt;
    cmd.process_group(0);
}

#[cfg(windows)]
fn detach(cmd: &mut Command) {
    use std::os::windows::process::CommandExt;
    const DETACHED_PROCESS: u32 = 0x0000_0008;
    const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
    cmd.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
}

#[cfg(not(any(unix, windows)))]
fn detach(_cmd: &mut Command) {}

/// Collect the script's exit status so it does not linger as a zombie while
/// the foreground application runs.
fn reap_in_background(mut child: Child, command: String) {
    let spawned = std::thread::Builder::new()
        .name("recall-reaper".to_string())
        .spawn(move || match child.wait() {
            Ok(status) if status.success() => debug!(%command, "daemon launcher exited"),
            Ok(status) => warn!(%command, %status, "daemon launcher exited with failure"),
            Err(e) => warn!(%command, error = %e, "failed to wait for daemon launcher"),
        });
    if let Err(e) = spawned {
        warn!(error = %e, "failed to start reaper thread");
    }
}

#[cfg(all(test, unix))]
#[path = "process_tests.rs"]
mod tests;
