// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Advisory lock on the daemon lock file.
//!
//! A running daemon holds an exclusive whole-file lock on `db/daemon.lock`
//! for its whole lifetime. The kernel drops the lock when the holder exits,
//! so "lock held" is the liveness check: no PID staleness detection is
//! needed.
//!
//! On Linux the lock is an open-file-description record lock
//! (`F_OFD_SETLK`). It conflicts with the classic `lockf`/`fcntl` record
//! locks a daemon built around `lockf` takes, and it belongs to the open
//! handle rather than the process, so two handles in one process still
//! exclude each other. Other platforms use `fs2`.
//!
//! Launchers only *test* the lock with [`probe`]; the daemon side takes it
//! with [`DaemonLock::acquire`].

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Observed state of the daemon lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// Another process holds the lock: a daemon is running.
    HeldByOther,
    /// Nobody holds the lock.
    Free,
}

/// Lock errors
#[derive(Debug, Error)]
pub enum LockError {
    #[error("Failed to open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to test lock '{}': {source}", path.display())]
    Test {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Lock '{}' is already held", path.display())]
    AlreadyHeld { path: PathBuf },

    #[error("Failed to write holder pid to '{}': {source}", path.display())]
    WritePid {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Open the lock file, creating it owner read/write if missing.
///
/// Never truncates: a running daemon's PID must survive other processes
/// opening the file.
pub fn open_lock_file(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true).truncate(false);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}

/// Test whether the lock at `path` is held, without blocking and without
/// keeping it.
///
/// Never takes the lock, so a daemon acquiring at the same moment is not
/// disturbed. The handle is closed before returning in every case.
pub fn probe(path: &Path) -> Result<LockState, LockError> {
    let file = open_lock_file(path).map_err(|source| LockError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let state = test_exclusive(&file).map_err(|source| LockError::Test {
        path: path.to_path_buf(),
        source,
    });
    drop(file);

    let state = state?;
    debug!(path = %path.display(), ?state, "probed daemon lock");
    Ok(state)
}

fn test_exclusive(file: &File) -> io::Result<LockState> {
    if sys::is_held(file)? {
        Ok(LockState::HeldByOther)
    } else {
        Ok(LockState::Free)
    }
}

/// Whether a lock error means "someone else holds it" rather than a failure.
pub fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock || sys::is_contended_os_error(err)
}

/// Exclusive lock held by the running daemon.
///
/// The lock is released when this value is dropped or the process exits.
/// The lock file itself is left in place for the next daemon.
#[derive(Debug)]
pub struct DaemonLock {
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    file: File,
    path: PathBuf,
}

impl DaemonLock {
    /// Take the lock without blocking and record our PID in the file.
    pub fn acquire(path: &Path) -> Result<Self, LockError> {
        let file = open_lock_file(path).map_err(|source| LockError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        match sys::try_lock(&file) {
            Ok(()) => {}
            Err(e) if is_contended(&e) => {
                return Err(LockError::AlreadyHeld {
                    path: path.to_path_buf(),
                })
            }
            Err(source) => {
                return Err(LockError::Test {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }

        // Truncate only now that we hold the lock
        let mut file = file;
        let write_pid = |file: &mut File| -> io::Result<()> {
            file.set_len(0)?;
            writeln!(file, "{}", std::process::id())?;
            file.flush()
        };
        write_pid(&mut file).map_err(|source| LockError::WritePid {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), pid = std::process::id(), "acquired daemon lock");
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// PID recorded by the current or last lock holder, if readable.
///
/// Diagnostic only: liveness is decided by [`probe`], never by this value.
pub fn read_holder_pid(path: &Path) -> Option<u32> {
    std::fs::read_to_string(path).ok()?.trim().parse().ok()
}

#[cfg(any(target_os = "linux", target_os = "android"))]
mod sys {
    use std::fs::File;
    use std::io;
    use std::os::fd::AsRawFd;

    use nix::errno::Errno;
    use nix::fcntl::{fcntl, FcntlArg};
    use nix::libc;

    fn whole_file_write_lock() -> libc::flock {
        libc::flock {
            l_type: libc::F_WRLCK as libc::c_short,
            l_whence: libc::SEEK_SET as libc::c_short,
            l_start: 0,
            l_len: 0,
            // Must be zero for OFD requests
            l_pid: 0,
        }
    }

    /// Take the exclusive lock without blocking.
    pub(super) fn try_lock(file: &File) -> io::Result<()> {
        let lock = whole_file_write_lock();
        fcntl(file.as_raw_fd(), FcntlArg::F_OFD_SETLK(&lock))?;
        Ok(())
    }

    /// Ask the kernel whether a conflicting lock exists, without taking one.
    pub(super) fn is_held(file: &File) -> io::Result<bool> {
        let mut lock = whole_file_write_lock();
        fcntl(file.as_raw_fd(), FcntlArg::F_OFD_GETLK(&mut lock))?;
        Ok(lock.l_type != libc::F_UNLCK as libc::c_short)
    }

    pub(super) fn is_contended_os_error(err: &io::Error) -> bool {
        matches!(
            err.raw_os_error().map(Errno::from_raw),
            Some(Errno::EAGAIN | Errno::EACCES)
        )
    }
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
mod sys {
    use std::fs::File;
    use std::io;

    use fs2::FileExt;

    pub(super) fn try_lock(file: &File) -> io::Result<()> {
        FileExt::try_lock_exclusive(file)
    }

    /// Test by taking the lock and releasing it at once.
    pub(super) fn is_held(file: &File) -> io::Result<bool> {
        match FileExt::try_lock_exclusive(file) {
            Ok(()) => {
                FileExt::unlock(file)?;
                Ok(false)
            }
            Err(e) if super::is_contended(&e) => Ok(true),
            Err(e) => Err(e),
        }
    }

    pub(super) fn is_contended_os_error(err: &io::Error) -> bool {
        err.raw_os_error().is_some()
            && err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
