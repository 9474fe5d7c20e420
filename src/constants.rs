//! Centralized constants for instance provisioning defaults.
//!
//! All magic values used during provisioning should be defined here with
//! documented rationale. This enables:
//! - Reviewing the instance tuning in one place
//! - Consistent values across modules
//! - Easy tuning without code search

use std::time::Duration;

// =============================================================================
// External Binaries
// =============================================================================

/// Configuration-query helper shipped with every PostgreSQL installation.
/// Prints installation paths; used here to locate the binary directory.
pub const PG_CONFIG_BIN: &str = "pg_config";

/// Tool that populates a fresh data directory.
pub const INITDB_BIN: &str = "initdb";

/// The server executable itself.
pub const POSTGRES_BIN: &str = "postgres";

// =============================================================================
// Files and Directories
// =============================================================================

/// Configuration file name inside a data directory.
pub const CONF_FILE_NAME: &str = "postgresql.conf";

/// Per-instance server log file inside the data directory.
/// Captures the server's stdout/stderr for post-mortem debugging.
pub const SERVER_LOG_FILE_NAME: &str = "server.log";

/// Prefix for instance temp directory names. The invoking program's base
/// name is appended so leaked directories are attributable when debugging.
pub const TEMP_DIR_PREFIX: &str = "pgtest";

// =============================================================================
// Instance Tuning
// =============================================================================

/// Database every fresh cluster ships with; the connection descriptor
/// points clients at it.
pub const DEFAULT_DATABASE: &str = "postgres";

/// Default PostgreSQL port. No TCP listener is ever opened; the port only
/// determines the socket file name (`.s.PGSQL.<port>`).
pub const DEFAULT_PORT: u16 = 5432;

/// Connection cap written to the instance config. Small fixed number;
/// a test suite needing more than this is holding connections wrong.
pub const MAX_CONNECTIONS: u32 = 100;

/// Shared buffer allocation in MB. Generous enough that tests are not
/// I/O bound, modest enough to run many instances side by side.
pub const SHARED_BUFFERS_MB: u32 = 128;

/// Fixed server timezone for deterministic test behavior.
pub const TIMEZONE: &str = "UTC";

// =============================================================================
// Readiness Polling
// =============================================================================

/// Interval between socket-existence checks while waiting for the server.
pub const READY_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Number of socket-existence checks before giving up (~1 second total).
pub const READY_POLL_ATTEMPTS: u32 = 20;
