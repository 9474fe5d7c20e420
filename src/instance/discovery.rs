//! Discovery of the installed PostgreSQL binary directory.
//!
//! PostgreSQL installs ship a `pg_config` helper that prints installation
//! paths; `pg_config --bindir` is the portable way to find `initdb` and
//! `postgres` without guessing distribution-specific locations.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::constants::{INITDB_BIN, PG_CONFIG_BIN, POSTGRES_BIN};
use crate::error::{Error, Result};

/// A resolved PostgreSQL binary installation directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinDir {
    path: PathBuf,
}

impl BinDir {
    /// Resolve the binary directory by invoking `pg_config --bindir` from
    /// `PATH` and capturing its output, trimmed of surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Discovery`] if `pg_config` cannot be invoked and
    /// [`Error::DiscoveryFailed`] if it exits non-zero.
    pub fn discover() -> Result<Self> {
        Self::discover_with(PG_CONFIG_BIN)
    }

    /// Same as [`BinDir::discover`], but invoking a specific `pg_config`
    /// executable instead of resolving it from `PATH`.
    pub fn discover_with(pg_config: impl AsRef<OsStr>) -> Result<Self> {
        let output = Command::new(pg_config.as_ref())
            .arg("--bindir")
            .output()
            .map_err(|source| Error::Discovery { source })?;

        if !output.status.success() {
            return Err(Error::DiscoveryFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
        tracing::debug!(bindir = %path, "resolved PostgreSQL binary directory");
        Ok(Self::from_path(path))
    }

    /// Wrap an explicit binary directory, skipping discovery. Useful for
    /// non-standard installations and for test environments that provide
    /// their own binaries.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The resolved directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute path of the `initdb` tool.
    pub fn initdb(&self) -> PathBuf {
        self.path.join(INITDB_BIN)
    }

    /// Absolute path of the `postgres` server executable.
    pub fn postgres(&self) -> PathBuf {
        self.path.join(POSTGRES_BIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_paths_join_fixed_names() {
        let bindir = BinDir::from_path("/usr/lib/postgresql/16/bin");
        assert_eq!(
            bindir.initdb(),
            PathBuf::from("/usr/lib/postgresql/16/bin/initdb")
        );
        assert_eq!(
            bindir.postgres(),
            PathBuf::from("/usr/lib/postgresql/16/bin/postgres")
        );
    }

    #[test]
    fn test_discover_with_missing_helper() {
        let err = BinDir::discover_with("pg_config-that-does-not-exist").unwrap_err();
        assert!(matches!(err, Error::Discovery { .. }));
    }
}
