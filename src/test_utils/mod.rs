//! Test utilities for mavin
//!
//! Builders for dependency trees and on-disk workspaces, plus one-time
//! logging setup. Available to unit tests and, through the `test-utils`
//! feature, to the integration tests under `tests/`.
//!
//! # Example
//!
//! ```rust,no_run
//! use mavin_cli::test_utils::{DependencyTreeBuilder, init_test_logging};
//!
//! init_test_logging(None);
//! let tree = DependencyTreeBuilder::new()
//!     .artifact("g:a:1.0", "f/g/a/1.0/a.jar", &["g:b:1.0"])
//!     .artifact("g:b:1.0", "f/g/b/1.0/b.jar", &[])
//!     .build();
//! assert_eq!(tree.len(), 2);
//! ```

pub mod builder;
pub mod fixtures;

pub use builder::DependencyTreeBuilder;
pub use fixtures::WorkspaceFixture;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has any effect. With `level` set, that level is used;
/// otherwise `RUST_LOG` is honored, and without either logging stays off.
///
/// ```bash
/// RUST_LOG=mavin_cli=debug cargo test
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
