//! Configuration template for ephemeral PostgreSQL instances.
//!
//! Each instance renders its own [`PostgresConf`] value into the
//! `postgresql.conf` inside its data directory, overwriting the stock file
//! `initdb` generated. The settings trade every durability guarantee for
//! startup speed and isolation, which is only safe because the data
//! directory is disposable.

use std::path::{Path, PathBuf};

use crate::constants::{MAX_CONNECTIONS, SHARED_BUFFERS_MB, TIMEZONE};

/// Server settings written to `postgresql.conf` for one instance.
///
/// Immutable once constructed; instances never share template state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConf {
    /// Durable writes. Off for test instances: the data directory does not
    /// outlive the process, so there is nothing worth flushing for.
    pub fsync: bool,
    /// TCP listen addresses. Empty disables all network listeners, leaving
    /// the Unix-domain socket as the only way in.
    pub listen_addresses: String,
    /// Concurrent connection cap.
    pub max_connections: u32,
    /// Directory the server creates its socket file in. Restricted to the
    /// instance's own temp directory so instances cannot collide.
    pub unix_socket_directories: PathBuf,
    /// Shared buffer allocation in MB.
    pub shared_buffers_mb: u32,
    /// Server timezone.
    pub timezone: String,
}

impl PostgresConf {
    /// The ephemeral/test tuning, with the socket confined to `dir`.
    pub fn for_socket_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            fsync: false,
            listen_addresses: String::new(),
            max_connections: MAX_CONNECTIONS,
            unix_socket_directories: dir.into(),
            shared_buffers_mb: SHARED_BUFFERS_MB,
            timezone: TIMEZONE.to_string(),
        }
    }

    /// Render as `postgresql.conf` text, one `key = value` per line.
    pub fn render(&self) -> String {
        format!(
            "fsync = {}\n\
             listen_addresses = '{}'\n\
             max_connections = {}\n\
             unix_socket_directories = '{}'\n\
             shared_buffers = {}MB\n\
             timezone = '{}'\n",
            if self.fsync { "on" } else { "off" },
            self.listen_addresses,
            self.max_connections,
            self.unix_socket_directories.display(),
            self.shared_buffers_mb,
            self.timezone,
        )
    }

    /// The socket directory this configuration confines the server to.
    pub fn socket_dir(&self) -> &Path {
        &self.unix_socket_directories
    }
}
