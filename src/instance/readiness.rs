//! Bounded polling for the server's Unix-domain socket.
//!
//! The server signals readiness externally: once it accepts connections it
//! creates a socket file with a well-known name inside its socket
//! directory. Polling for that file is cheaper and simpler than attempting
//! protocol-level handshakes, and is the same signal `pg_ctl` itself keys
//! off historically.

use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::constants::{READY_POLL_ATTEMPTS, READY_POLL_INTERVAL};

/// Socket file name the server creates for the given port.
pub(crate) fn socket_file_name(port: u16) -> String {
    format!(".s.PGSQL.{port}")
}

/// Total time the polling loop is willing to wait.
pub(crate) fn poll_window() -> Duration {
    READY_POLL_INTERVAL * READY_POLL_ATTEMPTS
}

/// Block until `socket` exists, checking at a fixed interval.
///
/// Returns `true` as soon as the socket appears, `false` once the bounded
/// number of attempts is exhausted. Blocking sleeps; callers own the
/// thread for the duration.
pub(crate) fn wait_for_socket(socket: &Path) -> bool {
    for attempt in 0..READY_POLL_ATTEMPTS {
        if socket.exists() {
            tracing::debug!(socket = %socket.display(), attempt, "server socket appeared");
            return true;
        }
        thread::sleep(READY_POLL_INTERVAL);
    }
    false
}
