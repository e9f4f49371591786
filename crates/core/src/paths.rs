// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Installation directory resolution.
//!
//! The installation directory is derived from the invocation path (`argv[0]`)
//! and the working directory. Resolution is a pure string computation
//! parameterized by a [`PathStyle`], so both POSIX and Windows conventions are
//! handled by one resolver and can be tested on any host.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::layout::InstallDir;

/// Working directories must fit in this many bytes, including the
/// terminating NUL the platform `getcwd` buffer would need.
pub const MAX_CWD_LEN: usize = 4096;

/// Path resolution errors
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Failed to read current directory: {0}")]
    Cwd(#[source] std::io::Error),

    #[error("Current directory is {len} bytes, longer than the {max} byte limit", max = MAX_CWD_LEN - 1)]
    CwdTooLong { len: usize },

    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8(PathBuf),
}

/// Separator and layout conventions of a platform.
#[derive(Clone, Copy)]
pub struct PathStyle {
    /// Path separator character.
    pub separator: char,
    /// Trailing segments removed from the resolved directory, first match wins.
    pub strip_suffixes: &'static [&'static str],
    /// Whether a program directory is absolute and replaces the working directory.
    pub is_absolute: fn(&str) -> bool,
}

impl PathStyle {
    pub const POSIX: PathStyle = PathStyle {
        separator: '/',
        strip_suffixes: &["/bin"],
        is_absolute: posix_is_absolute,
    };

    pub const WINDOWS: PathStyle = PathStyle {
        separator: '\\',
        strip_suffixes: &["\\bin", "\\Debug"],
        is_absolute: windows_is_absolute,
    };

    /// Style of the platform this binary was built for.
    pub fn native() -> PathStyle {
        if cfg!(windows) {
            Self::WINDOWS
        } else {
            Self::POSIX
        }
    }
}

impl std::fmt::Debug for PathStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathStyle")
            .field("separator", &self.separator)
            .field("strip_suffixes", &self.strip_suffixes)
            .finish_non_exhaustive()
    }
}

fn posix_is_absolute(dir: &str) -> bool {
    dir.starts_with('/')
}

/// `\foo` or a drive-letter prefix such as `C:`.
fn windows_is_absolute(dir: &str) -> bool {
    dir.starts_with('\\') || dir.as_bytes().get(1) == Some(&b':')
}

/// Resolve the installation directory from an invocation path and working directory.
///
/// 1. Drop the executable's file name (no separator → empty program directory)
/// 2. Drop a leading `./`; a bare `.` becomes empty
/// 3. Empty → `cwd`; absolute → replaces `cwd`; relative → appended to `cwd`
/// 4. Drop one trailing layout segment (`/bin`, or `\bin` / `\Debug`)
pub fn resolve(invocation: &str, cwd: &str, style: &PathStyle) -> InstallDir {
    let program = program_dir(invocation, style);

    let mut dir = if program.is_empty() {
        cwd.to_string()
    } else if (style.is_absolute)(program) {
        program.to_string()
    } else if cwd.ends_with(style.separator) {
        format!("{cwd}{program}")
    } else {
        format!("{cwd}{}{program}", style.separator)
    };

    strip_layout_suffix(&mut dir, style);
    InstallDir::new(dir)
}

/// Resolve against the process working directory.
///
/// The working directory is read once; see [`check_cwd`] for the limits applied.
pub fn resolve_current(invocation: &str, style: &PathStyle) -> Result<InstallDir, PathError> {
    let cwd = std::env::current_dir().map_err(PathError::Cwd)?;
    let cwd = check_cwd(&cwd)?;
    let dir = resolve(invocation, cwd, style);
    debug!(cwd, invocation, dir = %dir, "resolved installation directory");
    Ok(dir)
}

/// Validate a working directory: it must be UTF-8 and shorter than [`MAX_CWD_LEN`].
pub fn check_cwd(cwd: &Path) -> Result<&str, PathError> {
    let s = cwd
        .to_str()
        .ok_or_else(|| PathError::NonUtf8(cwd.to_path_buf()))?;
    if s.len() >= MAX_CWD_LEN {
        return Err(PathError::CwdTooLong { len: s.len() });
    }
    Ok(s)
}

fn program_dir<'a>(invocation: &'a str, style: &PathStyle) -> &'a str {
    let dir = match invocation.rfind(style.separator) {
        // Executable directly under the root: keep the root itself
        Some(0) => &invocation[..style.separator.len_utf8()],
        Some(pos) => &invocation[..pos],
        None => "",
    };

    let dir = strip_dot_prefix(dir, style.separator);
    if dir == "." {
        ""
    } else {
        dir
    }
}

fn strip_dot_prefix(dir: &str, separator: char) -> &str {
    let mut chars = dir.chars();
    match (chars.next(), chars.next()) {
        (Some('.'), Some(c)) if c == '/' || c == separator => chars.as_str(),
        _ => dir,
    }
}

fn strip_layout_suffix(dir: &mut String, style: &PathStyle) {
    for suffix in style.strip_suffixes {
        if let Some(stripped) = dir.strip_suffix(suffix) {
            if stripped.is_empty() {
                *dir = style.separator.to_string();
            } else {
                let len = stripped.len();
                dir.truncate(len);
            }
            return;
        }
    }
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
