//! Global constants used throughout the mavin codebase.
//!
//! This module contains the fixed packaging/classifier tables, file names,
//! and timeout values shared across modules. Defining them centrally keeps
//! the canonicalization rules auditable in one place.

use std::time::Duration;

/// Packaging types the external resolver is allowed to fetch.
///
/// Order matters: the canonicalizer strips `:type:` infixes in this order.
pub const SUPPORTED_PACKAGING_TYPES: &[&str] =
    &["jar", "aar", "bundle", "eclipse-plugin", "orbit", "test-jar"];

/// Packaging types recognized only while stripping coordinates.
///
/// `pom` is never passed to the resolver as a fetch target.
pub const STRIP_ONLY_PACKAGING_TYPES: &[&str] = &["pom"];

/// Classifiers removed from coordinates during canonicalization.
pub const STRIPPED_CLASSIFIERS: &[&str] = &["sources", "natives"];

/// Classifier marking a source archive in the dependency tree.
pub const SOURCES_CLASSIFIER: &str = "sources";

/// Characters replaced by [`LABEL_SEPARATOR`] when building target labels.
pub const ESCAPED_CHARACTERS: &[char] = &['.', '-', ':', '/', '+'];

/// Separator that replaces every escaped character.
pub const LABEL_SEPARATOR: char = '_';

/// Prefix of the repository name used by the live pipeline.
pub const UNPINNED_PREFIX: &str = "unpinned_";

/// Configuration file searched for from the working directory upwards.
pub const CONFIG_FILE_NAME: &str = "mavin.toml";

/// Lockfile snapshot written next to live-generated targets.
pub const LIVE_SNAPSHOT_FILE_NAME: &str = "install.json";

/// Generated target declarations.
pub const BUILD_FILE_NAME: &str = "BUILD";

/// Generated fetch declarations (pinned pipeline only).
pub const DEFS_FILE_NAME: &str = "defs.bzl";

/// Generated compatibility repositories.
pub const COMPAT_FILE_NAME: &str = "compat.bzl";

/// Default resolver executable.
pub const DEFAULT_RESOLVER: &str = "coursier";

/// Default output directory for generated repositories.
pub const DEFAULT_OUTPUT_DIR: &str = "third_party/mavin";

/// Default timeout for a single resolver invocation (10 minutes).
///
/// Resolution of a large tree on a cold cache downloads every artifact,
/// so this is deliberately generous.
pub const DEFAULT_RESOLVER_TIMEOUT: Duration = Duration::from_secs(600);

/// Environment variable that disables progress spinners.
pub const NO_PROGRESS_ENV: &str = "MAVIN_NO_PROGRESS";
