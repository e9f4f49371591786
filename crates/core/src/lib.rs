// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! recall-core: installation layout, path resolution and the daemon lock

pub mod layout;
pub mod lock;
pub mod paths;
pub mod time;

pub use layout::{
    ensure_data_dir, InstallDir, BIN_DIR, DAEMON_LOG, DATA_DIR, DEFAULT_LAUNCHER, LOCK_FILE,
};
pub use lock::{probe, read_holder_pid, DaemonLock, LockError, LockState};
pub use paths::{check_cwd, resolve, resolve_current, PathError, PathStyle, MAX_CWD_LEN};
pub use time::duration_ms;
