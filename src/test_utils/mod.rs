//! Test utilities for modpkg
//!
//! This module provides helpers for writing tests: fixtures for project
//! files, dependency graphs, and jar archives, plus opt-in logging for
//! debugging test runs.
//!
//! The module is compiled only for tests and for consumers enabling the
//! `test-utils` feature (the crate's own integration tests do this through a
//! path dev-dependency on itself).
//!
//! # Example
//!
//! ```rust,no_run
//! use modpkg_cli::test_utils::{GraphFixture, ProjectFixture};
//!
//! # fn main() -> anyhow::Result<()> {
//! let temp = tempfile::tempdir()?;
//! let project_file = ProjectFixture::basic().write_to(temp.path())?;
//! GraphFixture::with_host().write_to(temp.path())?;
//! # Ok(())
//! # }
//! ```

pub mod fixtures;

pub use fixtures::{GraphFixture, JarFixture, ProjectFixture, jar_entry_names, read_jar_entry};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Installs the tracing subscriber once, no matter how many times it is
/// called. Respects `RUST_LOG` when no explicit level is given; with neither,
/// logging stays off.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
