// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

use recall_core::{probe, read_holder_pid, LockState};
use tempfile::{tempdir, TempDir};

mod startup_shutdown;

/// Config rooted in a fresh scratch installation directory.
fn test_config() -> (TempDir, Config) {
    let dir = tempdir().unwrap();
    let install_dir = InstallDir::new(dir.path().to_str().unwrap());
    (dir, Config::new(install_dir))
}
