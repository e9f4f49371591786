// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recall bootstrap library
//!
//! Makes sure exactly one recall daemon is running before the foreground
//! application starts, then hands the resolved installation directory to the
//! host.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod guard;
pub mod handoff;
pub mod launcher;

pub use guard::{
    ensure_data_dir, ensure_unique_and_running, GuardConfig, GuardError, InstanceGuard, Outcome,
    DEFAULT_GRACE,
};
pub use handoff::{DisplayGeometry, Handoff, Host, StdoutHost, MAX_HEIGHT, MAX_WIDTH};
pub use launcher::{
    DaemonLauncher, LaunchMode, LaunchSpec, ParseLaunchModeError, ProcessLauncher,
};

#[cfg(any(test, feature = "test-support"))]
pub use launcher::{FakeLauncher, LaunchCall};
