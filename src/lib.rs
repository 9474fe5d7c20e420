// =============================================================================
// Lint Configuration
// =============================================================================

// Safety: no unsafe anywhere in this crate
#![deny(unsafe_code)]
// Correctness: Must handle all fallible operations
#![deny(unused_must_use)]
// Quality: Pedantic but pragmatic
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
// Allowed with documented reasons
#![allow(clippy::missing_errors_doc)] // Error returns self-documenting via type
#![allow(clippy::module_name_repetitions)] // e.g., instance::PgInstance is clearer
#![allow(clippy::must_use_candidate)] // Not all returned values need annotation

//! pgtest - ephemeral PostgreSQL servers for integration tests.
//!
//! Spins up a throwaway PostgreSQL instance backed by a fresh data directory
//! under the system temp root, reachable only through a Unix-domain socket
//! inside that directory. The instance is tuned for disposable test data
//! (`fsync = off`, no network listeners, UTC timezone) and is torn down by
//! killing the server process and deleting the directory.
//!
//! Best reserved for slow integration tests: every instance pays for a full
//! `initdb` run. The caller gets a connection string and is responsible for
//! all database interaction; this crate never speaks the wire protocol.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> pgtest::Result<()> {
//! let pg = pgtest::PgInstance::start()?;
//!
//! // Hand pg.connection_string() to any PostgreSQL client library, e.g.
//! // "host=/tmp/pgtest-mysuite-Ab3dEf dbname=postgres sslmode=disable"
//! run_migrations(pg.connection_string());
//!
//! pg.stop()?;
//! # Ok(())
//! # }
//! # fn run_migrations(_url: &str) {}
//! ```
//!
//! For one-time suite setup where no error plumbing exists, the [`harness`]
//! module provides wrappers that panic on failure instead of returning
//! errors.
//!
//! # Requirements
//!
//! The PostgreSQL binaries (`pg_config`, `initdb`, `postgres`) must be
//! installed; the binary directory is resolved via `pg_config --bindir`.
//! Instance management relies on Unix-domain sockets and POSIX signals, so
//! only Unix-like platforms are supported.

/// Configuration template rendered into each instance's `postgresql.conf`.
///
/// Each instance gets its own immutable [`config::PostgresConf`] value;
/// there is no shared template state between instances.
pub mod config;

/// Centralized constants for binary names, file names, and tuning defaults.
///
/// All magic values used during provisioning are defined here with
/// documented rationale.
pub mod constants;

/// Error types for provisioning and teardown.
pub mod error;

/// Fatal-by-default wrappers for one-time suite setup.
pub mod harness;

/// Instance lifecycle management.
///
/// Covers binary discovery, provisioning, readiness polling, and teardown.
pub mod instance;

pub use config::PostgresConf;
pub use error::{Error, Result};
pub use instance::{BinDir, PgInstance};
