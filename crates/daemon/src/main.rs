// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recall Daemon shim (recalld)
//!
//! Holds the daemon lock for an installation until it is told to stop.
//! Launcher scripts `exec` it (or a real daemon that does the same) so that
//! `recall` observes the daemon as running.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use recall_core::{read_holder_pid, InstallDir};
use recall_daemon::lifecycle::{self, Config, LifecycleError};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

/// What the command line asks for
#[derive(Debug, PartialEq, Eq)]
enum Invocation {
    Run(String),
    Version,
    Help,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Invocation, String> {
    let Some(arg) = args.next() else {
        return Err("missing installation directory".to_string());
    };
    let invocation = match arg.as_str() {
        "--version" | "-V" | "-v" => Invocation::Version,
        "--help" | "-h" | "help" => Invocation::Help,
        flag if flag.starts_with('-') => return Err(format!("unexpected argument '{flag}'")),
        _ => Invocation::Run(arg),
    };
    if let Some(extra) = args.next() {
        return Err(format!("unexpected argument '{extra}'"));
    }
    Ok(invocation)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let install_dir = match parse_args(std::env::args().skip(1)) {
        Ok(Invocation::Run(dir)) => InstallDir::new(dir),
        Ok(Invocation::Version) => {
            println!("recalld {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Ok(Invocation::Help) => {
            println!("recalld {}", env!("CARGO_PKG_VERSION"));
            println!("Recall daemon shim - holds the daemon lock until stopped");
            println!();
            println!("USAGE:");
            println!("    recalld <INSTALL_DIR>");
            println!();
            println!("The daemon is typically started by a launcher script run by");
            println!("`recall` and should not be invoked directly. It stops on");
            println!("SIGTERM or SIGINT.");
            println!();
            println!("OPTIONS:");
            println!("    -h, --help       Print help information");
            println!("    -v, --version    Print version information");
            return Ok(());
        }
        Err(msg) => {
            eprintln!("error: {msg}");
            eprintln!("Usage: recalld <INSTALL_DIR> | [--help | --version]");
            std::process::exit(1);
        }
    };

    let config = Config::new(install_dir);

    // Write startup marker to log (before tracing setup)
    lifecycle::write_startup_marker(&config)?;

    let log_guard = setup_logging(&config);

    info!(install_dir = %config.install_dir, "Starting recalld");

    // Handlers go in before the lock is taken: once the pid is in the lock
    // file, SIGTERM must mean a clean shutdown.
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let daemon = match lifecycle::startup(&config) {
        Ok(daemon) => daemon,
        Err(LifecycleError::LockFailed(_)) => {
            info!("Lock held by another daemon, exiting");
            drop(log_guard);
            eprintln!("recalld is already running");
            if let Some(pid) = read_holder_pid(&config.lock_path) {
                eprintln!("  pid: {pid}");
            }
            std::process::exit(1);
        }
        Err(e) => {
            // Write error synchronously (tracing is non-blocking and may not flush in time)
            lifecycle::write_startup_error(&config, &e);
            error!("Failed to start daemon: {}", e);
            drop(log_guard);
            return Err(e.into());
        }
    };

    info!(lock = %config.lock_path.display(), "Daemon ready");

    // Signal ready for a parent that waits on our stdout
    println!("READY");

    tokio::select! {
        _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        _ = sigint.recv() => info!("Received SIGINT, shutting down..."),
    }

    daemon.shutdown();
    drop(log_guard);
    Ok(())
}

fn setup_logging(config: &Config) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let file_appender = tracing_appender::rolling::never(&config.data_dir, recall_core::DAEMON_LOG);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    guard
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
