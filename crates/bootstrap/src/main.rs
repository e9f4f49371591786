// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! recall - foreground bootstrap
//!
//! Resolves the installation directory from `argv[0]`, makes sure the
//! recall daemon is running, then hands off to the host application.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod env;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use recall_bootstrap::{
    ensure_unique_and_running, DisplayGeometry, Handoff, Host, Outcome, StdoutHost,
};
use recall_core::{resolve_current, PathError, PathStyle};
use tracing::debug;

#[derive(Debug, Parser)]
#[command(
    name = "recall",
    version,
    about = "Start the recall daemon if needed, then hand off to the host"
)]
struct Cli {
    /// Verbose bootstrap logging
    #[arg(long, alias = "recall-debug")]
    debug: bool,

    /// Display width hint for the host (at most 1920)
    #[arg(long)]
    width: Option<u32>,

    /// Display height hint for the host (at most 1080)
    #[arg(long)]
    height: Option<u32>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let invocation = invocation_path()?;
    let install_dir = resolve_current(&invocation, &PathStyle::native())?;
    let config = env::guard_config()?;

    match ensure_unique_and_running(&install_dir, &config)? {
        Outcome::AlreadyRunning { holder_pid } => debug!(?holder_pid, "reusing running daemon"),
        Outcome::Launched { pid } => debug!(pid, "launched daemon"),
    }

    let handoff = Handoff::new(install_dir, DisplayGeometry::clamped(cli.width, cli.height));
    StdoutHost::new(io::stdout().lock())
        .run(handoff)
        .context("Failed to hand off to host")?;
    Ok(())
}

/// `argv[0]` as given by the caller. A missing `argv[0]` resolves like a bare name.
fn invocation_path() -> Result<String, PathError> {
    match std::env::args_os().next() {
        Some(arg0) => arg0
            .into_string()
            .map_err(|raw| PathError::NonUtf8(PathBuf::from(raw))),
        None => Ok(String::new()),
    }
}

fn setup_logging(debug: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .init();
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
