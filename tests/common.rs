//! Shared fixtures for lifecycle integration tests.
//!
//! Real PostgreSQL binaries cannot be assumed on every machine that runs
//! this suite, so these helpers build stub binary directories whose
//! `initdb`, `postgres`, and `pg_config` scripts mimic the behaviors the
//! lifecycle code observes: populating a data directory, creating the
//! server socket, failing partway, or never becoming ready.

#![cfg(unix)]
#![allow(dead_code)] // Not every test binary uses every fixture

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Socket file the real server would create for the default port.
pub const SOCKET_NAME: &str = ".s.PGSQL.5432";

/// A stub PostgreSQL binary directory backed by shell scripts.
///
/// Scripts record what they were invoked with (`last-datadir`,
/// `postgres.pid`) into the stub directory itself, so tests can observe
/// paths and processes that the library cleans up on its error paths.
pub struct StubBinDir {
    dir: TempDir,
}

impl StubBinDir {
    /// A toolchain whose `initdb` succeeds and whose server creates its
    /// socket immediately, then idles until killed.
    pub fn responsive() -> Self {
        let stub = Self::empty();
        stub.install_initdb(0);
        stub.install(
            "postgres",
            "#!/bin/sh\n\
             DATADIR=\"$2\"\n\
             echo \"$$\" > \"$(dirname \"$0\")/postgres.pid\"\n\
             echo 'stub postgres listening'\n\
             touch \"$DATADIR/.s.PGSQL.5432\"\n\
             exec sleep 600\n",
        );
        stub
    }

    /// A toolchain whose server starts but never creates its socket.
    pub fn never_ready() -> Self {
        let stub = Self::empty();
        stub.install_initdb(0);
        stub.install(
            "postgres",
            "#!/bin/sh\n\
             echo \"$$\" > \"$(dirname \"$0\")/postgres.pid\"\n\
             exec sleep 600\n",
        );
        stub
    }

    /// A toolchain whose `initdb` fails after recording its target.
    pub fn initdb_fails() -> Self {
        let stub = Self::empty();
        stub.install_initdb(1);
        stub
    }

    /// An empty stub directory with no tools installed.
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create stub bindir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn bindir(&self) -> pgtest::BinDir {
        pgtest::BinDir::from_path(self.dir.path())
    }

    /// Data directory the stub `initdb` was last pointed at.
    pub fn last_datadir(&self) -> Option<PathBuf> {
        fs::read_to_string(self.dir.path().join("last-datadir"))
            .ok()
            .map(|s| PathBuf::from(s.trim()))
    }

    /// Pid the stub server recorded when it started.
    pub fn server_pid(&self) -> Option<u32> {
        fs::read_to_string(self.dir.path().join("postgres.pid"))
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }

    fn install_initdb(&self, exit_code: u8) {
        self.install(
            "initdb",
            &format!(
                "#!/bin/sh\n\
                 printf '%s' \"$2\" > \"$(dirname \"$0\")/last-datadir\"\n\
                 [ {exit_code} -ne 0 ] && echo 'initdb: stub failure' >&2\n\
                 exit {exit_code}\n"
            ),
        );
    }

    fn install(&self, name: &str, contents: &str) {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("failed to write stub script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("failed to chmod stub script");
    }
}

/// A stub `pg_config` executable in its own directory.
pub struct StubPgConfig {
    dir: TempDir,
    script: PathBuf,
}

impl StubPgConfig {
    /// Prints `bindir` padded with decorative whitespace, exercising the
    /// output trimming in discovery.
    pub fn printing(bindir: &Path) -> Self {
        Self::with_script(&format!(
            "#!/bin/sh\n\
             printf '  %s  \\n' '{}'\n",
            bindir.display()
        ))
    }

    /// Exits non-zero with a message on stderr.
    pub fn failing() -> Self {
        Self::with_script(
            "#!/bin/sh\n\
             echo 'pg_config: stub discovery failure' >&2\n\
             exit 3\n",
        )
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    fn with_script(contents: &str) -> Self {
        let dir = TempDir::new().expect("failed to create stub pg_config dir");
        let script = dir.path().join("pg_config");
        fs::write(&script, contents).expect("failed to write stub pg_config");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
            .expect("failed to chmod stub pg_config");
        Self { dir, script }
    }
}

/// Whether a process with `pid` still exists (signal 0 probe).
pub fn process_alive(pid: u32) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("kill -0 {pid} 2>/dev/null"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
