//! Filesystem, path and terminal helpers shared by the pipelines and the CLI.
//!
//! - [`fs`] - atomic writes and directory creation
//! - [`paths`] - `~`/`$VAR` expansion and config-relative path resolution
//! - [`progress`] - spinners that stay silent in scripted runs

pub mod fs;
pub mod paths;
pub mod progress;

pub use fs::{atomic_write, ensure_dir, safe_write};
pub use paths::{expand_path, relative_to};
pub use progress::ProgressBar;
