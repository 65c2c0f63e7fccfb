//! The lockfile: a persisted [`DependencyTree`] snapshot.
//!
//! A lockfile wraps the dependency tree, with every artifact's `url` and
//! `sha256` filled in, as
//!
//! ```json
//! {
//!   "dependency_tree": { "dependencies": [ ... ] },
//!   "__input_artifacts_hash": "9f86d0..."
//! }
//! ```
//!
//! It is written at the end of a live pass and consumed wholesale at the start
//! of a pinned pass; it is the only persisted state. Replaying it through the
//! compiler yields the same labels, edges and aliases as the live pass that
//! wrote it.
//!
//! The optional `__input_artifacts_hash` fingerprints the resolver inputs
//! (see [`InputFingerprint`]) so a pinned pass can warn when the
//! configuration has moved on since the lockfile was pinned.

mod checksum;
mod fingerprint;
mod io;
mod url;

pub use checksum::{sha256_bytes, sha256_file};
pub use fingerprint::InputFingerprint;
pub use url::url_from_cache_path;

use serde::{Deserialize, Serialize};

use crate::core::MavinError;
use crate::tree::DependencyTree;

/// Top-level lockfile key holding the tree.
pub const DEPENDENCY_TREE_KEY: &str = "dependency_tree";

/// A persisted dependency tree plus input fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lockfile {
    pub dependency_tree: DependencyTree,

    /// Fingerprint of the resolver inputs the tree was produced from
    #[serde(
        rename = "__input_artifacts_hash",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub input_artifacts_hash: Option<String>,
}

impl Lockfile {
    #[must_use]
    pub const fn new(dependency_tree: DependencyTree) -> Self {
        Self {
            dependency_tree,
            input_artifacts_hash: None,
        }
    }

    #[must_use]
    pub fn with_input_hash(mut self, hash: impl Into<String>) -> Self {
        self.input_artifacts_hash = Some(hash.into());
        self
    }

    /// Whether the recorded fingerprint differs from `current`.
    ///
    /// Lockfiles without a fingerprint are never stale.
    #[must_use]
    pub fn is_stale(&self, current: &InputFingerprint) -> bool {
        self.input_artifacts_hash.as_deref().is_some_and(|recorded| recorded != current.hash())
    }

    /// Require `url` and `sha256` on every entry that has a file.
    ///
    /// Pinned generation copies each import out of a fetch repository, and
    /// fetches are only declared for entries with a URL.
    pub fn check_provenance(&self, file: &str, repository: &str) -> Result<(), MavinError> {
        let unpinned = self.dependency_tree.iter().find(|artifact| {
            artifact.file.is_some() && (artifact.url.is_none() || artifact.sha256.is_none())
        });

        match unpinned {
            Some(artifact) => Err(MavinError::LockfileProvenanceMissing {
                file: file.to_string(),
                repository: repository.to_string(),
                coord: artifact.coord.clone(),
            }),
            None => Ok(()),
        }
    }
}
