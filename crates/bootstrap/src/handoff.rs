// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handoff from the bootstrap to the host application.

use std::io::{self, Write};

use recall_core::InstallDir;

/// Largest window width handed to the host.
pub const MAX_WIDTH: u32 = 1920;

/// Largest window height handed to the host.
pub const MAX_HEIGHT: u32 = 1080;

/// Optional display size hints, clamped to [`MAX_WIDTH`] x [`MAX_HEIGHT`].
///
/// `None` leaves the choice to the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayGeometry {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl DisplayGeometry {
    /// Build from raw hints. Zero means unknown; larger values are clamped.
    pub fn clamped(width: Option<u32>, height: Option<u32>) -> Self {
        Self {
            width: clamp_hint(width, MAX_WIDTH),
            height: clamp_hint(height, MAX_HEIGHT),
        }
    }
}

fn clamp_hint(hint: Option<u32>, max: u32) -> Option<u32> {
    hint.filter(|&v| v > 0).map(|v| v.min(max))
}

/// Everything the host needs once the daemon is known to be running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handoff {
    pub install_dir: InstallDir,
    pub geometry: DisplayGeometry,
}

impl Handoff {
    pub fn new(install_dir: InstallDir, geometry: DisplayGeometry) -> Self {
        Self {
            install_dir,
            geometry,
        }
    }
}

/// The host application the bootstrap hands control to.
pub trait Host {
    fn run(&mut self, handoff: Handoff) -> io::Result<()>;
}

/// Host that reports the handoff as `key=value` lines.
pub struct StdoutHost<W> {
    out: W,
}

impl<W: Write> StdoutHost<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Host for StdoutHost<W> {
    fn run(&mut self, handoff: Handoff) -> io::Result<()> {
        writeln!(self.out, "install_dir={}", handoff.install_dir)?;
        writeln!(self.out, "width={}", format_hint(handoff.geometry.width))?;
        writeln!(self.out, "height={}", format_hint(handoff.geometry.height))?;
        self.out.flush()
    }
}

fn format_hint(hint: Option<u32>) -> String {
    hint.map_or_else(|| "auto".to_string(), |v| v.to_string())
}

#[cfg(test)]
#[path = "handoff_tests.rs"]
mod tests;
