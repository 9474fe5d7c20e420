//! Provisioning and teardown of ephemeral PostgreSQL instances.
//!
//! Provisioning runs a fixed sequence: resolve binaries, create a private
//! temp directory, `initdb` it, write the ephemeral tuning config, spawn
//! `postgres`, and poll for the socket. Any failure after the directory is
//! created unwinds by removing it; the caller never sees a half-built
//! instance. Teardown kills the server outright, reaps it, and deletes the
//! directory.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use tempfile::TempDir;

use crate::config::PostgresConf;
use crate::constants::{
    CONF_FILE_NAME, DEFAULT_DATABASE, DEFAULT_PORT, SERVER_LOG_FILE_NAME, TEMP_DIR_PREFIX,
};
use crate::error::{Error, Result};
use crate::instance::discovery::BinDir;
use crate::instance::readiness;

/// One ephemeral PostgreSQL server process plus its private data directory.
///
/// The server process is exclusively owned by this value; nothing else may
/// signal or reap it. Dropping an instance without calling
/// [`PgInstance::stop`] still kills the server and removes the directory,
/// but best-effort and without error reporting; explicit `stop()` is the
/// supported path.
pub struct PgInstance {
    conn_str: String,
    path: PathBuf,
    pid: u32,
    dir: Option<TempDir>,
    child: Option<Child>,
}

impl PgInstance {
    /// Start a new instance, resolving the PostgreSQL installation via
    /// `pg_config --bindir`.
    ///
    /// Blocks the calling thread for the entire setup sequence, including
    /// the bounded readiness poll (up to ~1 second).
    ///
    /// # Errors
    ///
    /// Returns the first failure in the provisioning sequence: discovery,
    /// temp directory creation, `initdb`, config write, spawn, or
    /// readiness timeout. Whenever the temp directory was already created,
    /// it is removed before the error is returned.
    pub fn start() -> Result<Self> {
        Self::start_in(&BinDir::discover()?)
    }

    /// Start a new instance using an explicitly resolved binary directory.
    pub fn start_in(bindir: &BinDir) -> Result<Self> {
        let dir = create_instance_dir()?;
        // From here on, `dir` going out of scope on an error path removes
        // the partially built data directory.

        run_initdb(&bindir.initdb(), dir.path())?;
        write_conf(dir.path())?;

        let conn_str = connection_string(dir.path(), DEFAULT_DATABASE);
        let mut child = spawn_postgres(&bindir.postgres(), dir.path())?;
        let pid = child.id();

        let socket = dir.path().join(readiness::socket_file_name(DEFAULT_PORT));
        if !readiness::wait_for_socket(&socket) {
            // The server may still be mid-startup or wedged; it has to go
            // before the data directory underneath it can be removed.
            tracing::warn!(pid, socket = %socket.display(), "server never became ready, killing it");
            kill_and_reap(&mut child);
            return Err(Error::ReadyTimeout {
                waited: readiness::poll_window(),
                socket,
            });
        }

        tracing::info!(pid, dir = %dir.path().display(), "postgres is accepting connections");

        Ok(Self {
            conn_str,
            path: dir.path().to_path_buf(),
            pid,
            dir: Some(dir),
            child: Some(child),
        })
    }

    /// Connection string accepted by PostgreSQL client libraries.
    ///
    /// Format: `host=<data dir> dbname=postgres sslmode=disable`. The host
    /// is the socket directory; `sslmode=disable` is appropriate because
    /// only the local socket is reachable.
    pub fn connection_string(&self) -> &str {
        &self.conn_str
    }

    /// The instance's private data directory (also its socket directory).
    pub fn data_dir(&self) -> &Path {
        &self.path
    }

    /// Process id of the server.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Stop the server and remove its data directory.
    ///
    /// Sends SIGKILL, reaps the process, then recursively removes the temp
    /// directory. Consuming `self` makes a second stop unrepresentable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Signal`] if the kill could not be delivered (the
    /// directory is still removed, best-effort, in that case) and
    /// [`Error::Cleanup`] if directory removal fails.
    pub fn stop(mut self) -> Result<()> {
        let child = self.child.take();
        let dir = self.dir.take();

        let signal_result = match child {
            Some(mut child) => signal_and_reap(&mut child),
            None => Ok(()),
        };

        if let Err(err) = signal_result {
            if let Some(dir) = dir {
                let _ = dir.close();
            }
            return Err(err);
        }

        if let Some(dir) = dir {
            let path = dir.path().to_path_buf();
            dir.close()
                .map_err(|source| Error::Cleanup { dir: path, source })?;
        }

        tracing::debug!(pid = self.pid, "instance stopped and removed");
        Ok(())
    }
}

impl Drop for PgInstance {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            tracing::debug!(pid = self.pid, "dropping instance, killing postgres");
            kill_and_reap(&mut child);
        }
        // `TempDir` removes the directory when dropped.
    }
}

impl std::fmt::Debug for PgInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgInstance")
            .field("conn_str", &self.conn_str)
            .field("path", &self.path)
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

/// Create the instance's uniquely named temp directory under the system
/// temp root. The prefix embeds the invoking program's base name so leaked
/// directories are attributable when debugging.
fn create_instance_dir() -> Result<TempDir> {
    let program = invoking_program_name();
    let dir = tempfile::Builder::new()
        .prefix(&format!("{TEMP_DIR_PREFIX}-{program}-"))
        .tempdir()
        .map_err(|source| Error::io("creating instance temp directory", source))?;
    tracing::debug!(dir = %dir.path().display(), "created instance directory");
    Ok(dir)
}

/// Base name of the invoking executable, `unknown` if it cannot be
/// determined.
fn invoking_program_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|exe| {
            exe.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

/// Populate `dir` as a fresh data directory.
fn run_initdb(initdb: &Path, dir: &Path) -> Result<()> {
    tracing::debug!(dir = %dir.display(), "initializing data directory");
    let output = Command::new(initdb)
        .arg("-D")
        .arg(dir)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| Error::io(format!("running {}", initdb.display()), source))?;

    if !output.status.success() {
        return Err(Error::InitDb {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}

/// Overwrite the stock `postgresql.conf` with the ephemeral tuning.
fn write_conf(dir: &Path) -> Result<()> {
    let conf = PostgresConf::for_socket_dir(dir);
    fs::write(dir.join(CONF_FILE_NAME), conf.render())
        .map_err(|source| Error::io(format!("writing {CONF_FILE_NAME}"), source))
}

/// Connection descriptor for a socket directory and target database.
fn connection_string(dir: &Path, database: &str) -> String {
    format!("host={} dbname={database} sslmode=disable", dir.display())
}

/// Spawn the server rooted at `dir`, without waiting for it to exit.
/// stdout/stderr go to the per-instance server log.
fn spawn_postgres(postgres: &Path, dir: &Path) -> Result<Child> {
    let log_path = dir.join(SERVER_LOG_FILE_NAME);
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|source| Error::io(format!("opening {SERVER_LOG_FILE_NAME}"), source))?;
    let log_file_err = log_file
        .try_clone()
        .map_err(|source| Error::io(format!("cloning {SERVER_LOG_FILE_NAME} handle"), source))?;

    let child = Command::new(postgres)
        .arg("-D")
        .arg(dir)
        .stdin(Stdio::null())
        .stdout(log_file)
        .stderr(log_file_err)
        .spawn()
        .map_err(|source| Error::Spawn { source })?;

    tracing::info!(pid = child.id(), dir = %dir.display(), "spawned postgres");
    Ok(child)
}

/// Deliver SIGKILL to the server, then reap it so directory removal cannot
/// race the dying process's final writes. SIGKILL rather than a graceful
/// signal: the data is disposable and tests want the fastest teardown.
#[cfg(unix)]
#[allow(clippy::cast_possible_wrap)] // pids fit in i32 on every supported platform
fn signal_and_reap(child: &mut Child) -> Result<()> {
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    let pid = child.id();
    signal::kill(Pid::from_raw(pid as i32), Signal::SIGKILL).map_err(|errno| Error::Signal {
        pid,
        source: std::io::Error::from_raw_os_error(errno as i32),
    })?;
    child
        .wait()
        .map_err(|source| Error::io("waiting for postgres to exit", source))?;
    Ok(())
}

#[cfg(not(unix))]
fn signal_and_reap(child: &mut Child) -> Result<()> {
    let pid = child.id();
    child
        .kill()
        .map_err(|source| Error::Signal { pid, source })?;
    child
        .wait()
        .map_err(|source| Error::io("waiting for postgres to exit", source))?;
    Ok(())
}

/// Best-effort kill and reap for error paths and `Drop`.
fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_string_format() {
        let s = connection_string(Path::new("/tmp/pgtest-suite-Xy12"), "postgres");
        assert_eq!(
            s,
            "host=/tmp/pgtest-suite-Xy12 dbname=postgres sslmode=disable"
        );
    }

    #[test]
    fn test_invoking_program_name_is_nonempty() {
        assert!(!invoking_program_name().is_empty());
    }

    #[test]
    fn test_instance_dir_embeds_program_name() {
        let dir = create_instance_dir().unwrap();
        let name = dir.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("pgtest-"));
        assert!(name.contains(&invoking_program_name()));
        dir.close().unwrap();
    }
}
