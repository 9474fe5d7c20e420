//! Error types for instance provisioning and teardown.
//!
//! Every failure class from the provisioning sequence has its own variant
//! so callers can decide whether to halt or recover. Code that wants the
//! original abort-on-failure behavior should go through [`crate::harness`].

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

/// Result type for instance operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Instance provisioning and teardown errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// `pg_config` could not be invoked at all (typically not installed
    /// or not on `PATH`).
    #[error("failed to invoke pg_config: {source}")]
    Discovery {
        #[source]
        source: io::Error,
    },

    /// `pg_config` ran but exited unsuccessfully.
    #[error("pg_config --bindir exited with {status}: {stderr}")]
    DiscoveryFailed { status: ExitStatus, stderr: String },

    /// IO error with context.
    #[error("IO error in {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// `initdb` failed to populate the fresh data directory.
    #[error("initdb exited with {status}: {stderr}")]
    InitDb { status: ExitStatus, stderr: String },

    /// The server executable could not be spawned.
    #[error("failed to spawn postgres: {source}")]
    Spawn {
        #[source]
        source: io::Error,
    },

    /// The server socket never appeared within the polling window.
    #[error("timed out after {waited:?} waiting for socket {}", .socket.display())]
    ReadyTimeout { waited: Duration, socket: PathBuf },

    /// Delivering the kill signal to the server process failed.
    #[error("failed to signal postgres (pid {pid}): {source}")]
    Signal {
        pid: u32,
        #[source]
        source: io::Error,
    },

    /// Recursive removal of the instance's temp directory failed.
    #[error("failed to remove data directory {}: {source}", .dir.display())]
    Cleanup {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
