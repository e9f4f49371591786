// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the recall binary.
//!
//! The guard itself never reads the environment; it only sees the
//! [`GuardConfig`] built here.

use std::time::Duration;

use recall_bootstrap::{GuardConfig, ParseLaunchModeError};

// --- Duration helper (private) ---

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

// --- Guard ---

pub fn grace_ms() -> Option<Duration> {
    parse_duration_ms("RECALL_GRACE_MS")
}

pub fn launcher() -> Option<String> {
    std::env::var("RECALL_LAUNCHER").ok().filter(|s| !s.is_empty())
}

pub fn launch_mode() -> Option<String> {
    std::env::var("RECALL_LAUNCH_MODE")
        .ok()
        .filter(|s| !s.is_empty())
}

/// Defaults overridden by `RECALL_GRACE_MS`, `RECALL_LAUNCHER` and `RECALL_LAUNCH_MODE`.
pub fn guard_config() -> Result<GuardConfig, ParseLaunchModeError> {
    let mut config = GuardConfig::default();
    if let Some(grace) = grace_ms() {
        config.grace = grace;
    }
    if let Some(launcher) = launcher() {
        config.launcher = launcher;
    }
    if let Some(mode) = launch_mode() {
        config.mode = mode.parse()?;
    }
    Ok(config)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
