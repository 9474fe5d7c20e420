//! Fatal-by-default wrappers for one-time suite setup.
//!
//! The core API returns [`Result`](crate::Result) so embedding code can
//! decide whether to halt or recover. Suite bootstrap code usually cannot:
//! a broken local environment should stop the whole test run. These
//! wrappers panic with the first failure's diagnostic instead of returning
//! it.
//!
//! # Example
//!
//! ```no_run
//! let pg = pgtest::harness::start();
//! // ... run the suite against pg.connection_string() ...
//! pgtest::harness::stop(pg);
//! ```

use crate::instance::PgInstance;

/// Start a new instance, panicking on any provisioning failure.
///
/// # Panics
///
/// Panics with the provisioning diagnostic; partial state (the temp
/// directory) has already been cleaned up by the time the panic unwinds.
pub fn start() -> PgInstance {
    PgInstance::start().unwrap_or_else(|err| panic!("pgtest: failed to start postgres: {err}"))
}

/// Stop an instance, panicking if teardown fails.
///
/// # Panics
///
/// Panics with the teardown diagnostic.
pub fn stop(instance: PgInstance) {
    instance
        .stop()
        .unwrap_or_else(|err| panic!("pgtest: failed to stop postgres: {err}"));
}
