// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk layout below the installation directory and the [`InstallDir`] newtype.

use std::fs::DirBuilder;
use std::io;
use std::path::{Path, PathBuf};

/// Data subdirectory holding daemon state.
pub const DATA_DIR: &str = "db";

/// Advisory lock anchor inside [`DATA_DIR`].
pub const LOCK_FILE: &str = "daemon.lock";

/// Daemon log file inside [`DATA_DIR`].
pub const DAEMON_LOG: &str = "daemon.log";

/// Directory holding executables and the launcher script.
pub const BIN_DIR: &str = "bin";

/// Launcher script started when no daemon holds the lock.
pub const DEFAULT_LAUNCHER: &str = "recalld.sh";

/// Root directory of an installation.
///
/// Computed once at startup (see [`crate::paths::resolve`]) and passed by
/// value from then on. Every other location is derived from it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstallDir(String);

impl InstallDir {
    pub fn new(dir: impl Into<String>) -> Self {
        Self(dir.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// `<install>/db`
    pub fn data_dir(&self) -> PathBuf {
        self.as_path().join(DATA_DIR)
    }

    /// `<install>/db/daemon.lock`
    pub fn lock_path(&self) -> PathBuf {
        self.data_dir().join(LOCK_FILE)
    }

    /// `<install>/db/daemon.log`
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join(DAEMON_LOG)
    }

    /// `<install>/bin/<launcher>`
    pub fn launcher_path(&self, launcher: &str) -> PathBuf {
        self.as_path().join(BIN_DIR).join(launcher)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::ops::Deref for InstallDir {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InstallDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for InstallDir {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for InstallDir {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<Path> for InstallDir {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

/// Create the data directory owner-only (0700 on unix). An existing one is
/// fine; missing parents are not created.
pub fn ensure_data_dir(path: &Path) -> io::Result<()> {
    let mut builder = DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }

    match builder.create(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
