// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recall daemon shim library
//!
//! The daemon side of the single-instance protocol: take the daemon lock on
//! startup and hold it until shutdown.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod lifecycle;

pub use lifecycle::{
    startup, write_startup_error, write_startup_marker, Config, DaemonState, LifecycleError,
    STARTUP_MARKER_PREFIX,
};
