//! mavin - Maven dependency graph compiler
//!
//! mavin takes the dependency tree produced by an external Maven resolver and
//! compiles it into build targets: one import per archive, an aggregate for
//! every descriptor-only artifact, and a version-qualified alias for each.
//!
//! # Pipelines
//!
//! - **Live**: run the resolver, record a URL and SHA-256 for every file, and
//!   generate `unpinned_<name>` from the fresh tree.
//! - **Pinned**: replay a lockfile written by `mavin pin` without touching
//!   the resolver, and generate `<name>` plus its fetch declarations.
//!
//! Both feed the same tree to [`compiler::compile`], so a lockfile replays
//! into exactly the targets the live pass produced.
//!
//! # Modules
//!
//! - [`coordinate`] - coordinate parsing and label canonicalization
//! - [`tree`] - the resolver's dependency tree
//! - [`compiler`] - tree to target graph
//! - [`render`] - BUILD, defs.bzl and compat.bzl text
//! - [`lockfile`] - lockfile IO, checksums and input fingerprints
//! - [`resolver`] - external resolver invocation
//! - [`pipeline`] - live and pinned passes
//! - [`config`] - `mavin.toml`
//! - [`cli`] - command-line interface
//! - [`core`] - error types
//! - [`utils`] - filesystem, path and progress helpers
//!
//! # Configuration
//!
//! ```toml
//! [settings]
//! output_dir = "third_party/mavin"
//!
//! [[instance]]
//! name = "maven"
//! artifacts = [
//!     "com.google.guava:guava:31.1-jre",
//!     { group = "javax.inject", artifact = "javax.inject", version = "1", neverlink = true },
//! ]
//! repositories = ["https://repo1.maven.org/maven2"]
//! lock_file = "maven_install.json"
//! ```

pub mod cli;
pub mod compiler;
pub mod config;
pub mod constants;
pub mod coordinate;
pub mod core;
pub mod lockfile;
pub mod pipeline;
pub mod render;
pub mod resolver;
pub mod tree;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
