//! The dependency tree contract shared by the resolver, the lockfile and the
//! graph compiler.
//!
//! The JSON shape is
//! `{"dependencies": [{"coord", "file", "dependencies", "url"?, "sha256"?}, ...]}`.
//! Entry order is significant: when several entries canonicalize to the same
//! target label, the first one wins. The tree is neither guaranteed acyclic
//! nor free of duplicates, and dependency lists may name coordinates that
//! have no entry of their own.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Extension used for Maven descriptor files.
const DESCRIPTOR_EXTENSION: &str = "pom";

/// Binary archive extensions that have a sibling descriptor file.
const BINARY_EXTENSIONS: &[&str] = &["jar", "aar"];

/// One entry of a dependency tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedArtifact {
    /// Full coordinate as emitted by the resolver
    pub coord: String,

    /// Materialized artifact path; `None` for POM-only aggregators or failed fetches
    #[serde(default)]
    pub file: Option<String>,

    /// Coordinates this artifact depends on, in resolver order
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Source URL, reconstructed by the live pipeline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// SHA-256 of the materialized file, computed by the live pipeline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl ResolvedArtifact {
    pub fn new(coord: impl Into<String>, file: Option<&str>) -> Self {
        Self {
            coord: coord.into(),
            file: file.map(str::to_string),
            dependencies: Vec::new(),
            url: None,
            sha256: None,
        }
    }

    /// File extension of the materialized artifact, if any.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        let file = self.file.as_deref()?;
        let name = file.rsplit(['/', '\\']).next().unwrap_or(file);
        name.rsplit_once('.').map(|(_, ext)| ext)
    }

    /// Path of the Maven descriptor that sits next to the artifact file.
    #[must_use]
    pub fn descriptor_path(&self) -> Option<String> {
        let file = self.file.as_deref()?;
        for ext in BINARY_EXTENSIONS {
            if let Some(stem) = file.strip_suffix(&format!(".{ext}")) {
                return Some(format!("{stem}.{DESCRIPTOR_EXTENSION}"));
            }
        }
        Some(file.to_string())
    }

    /// The raw record as compact JSON, for diagnostics.
    #[must_use]
    pub fn record(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

/// An ordered dependency tree as produced by the resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyTree {
    #[serde(default)]
    pub dependencies: Vec<ResolvedArtifact>,
}

impl DependencyTree {
    #[must_use]
    pub const fn new(dependencies: Vec<ResolvedArtifact>) -> Self {
        Self {
            dependencies,
        }
    }

    /// Parse the resolver's JSON output. Unknown top-level fields are ignored.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Resolver output is not a valid dependency tree")
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedArtifact> {
        self.dependencies.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolver_output_ignores_unknown_fields() {
        let json = r#"{
            "version": "0.1.0",
            "conflict_resolution": {},
            "dependencies": [
                {"coord": "g:a:1.0", "file": "v1/https/repo/g/a/1.0/a-1.0.jar", "dependencies": ["g:b:1.0"]},
                {"coord": "g:b:1.0", "file": null, "dependencies": []}
            ]
        }"#;
        let tree = DependencyTree::from_json(json).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.dependencies[0].dependencies, vec!["g:b:1.0"]);
        assert_eq!(tree.dependencies[1].file, None);
        assert_eq!(tree.dependencies[1].url, None);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let tree = DependencyTree::from_json(r#"{"dependencies": [{"coord": "g:a:1.0"}]}"#).unwrap();
        assert_eq!(tree.dependencies[0].file, None);
        assert!(tree.dependencies[0].dependencies.is_empty());
    }

    #[test]
    fn test_serialization_keeps_null_file_and_skips_provenance() {
        let artifact = ResolvedArtifact::new("g:a:1.0", None);
        let json = serde_json::to_string(&artifact).unwrap();
        assert_eq!(json, r#"{"coord":"g:a:1.0","file":null,"dependencies":[]}"#);
    }

    #[test]
    fn test_extension_ignores_dotted_directories() {
        let bare = ResolvedArtifact::new("org.foo:a:1.0", Some("cache/org.foo/a/1.0/a"));
        assert_eq!(bare.extension(), None);

        let jar = ResolvedArtifact::new("org.foo:a:1.0", Some("cache/org.foo/a/1.0/a-1.0.jar"));
        assert_eq!(jar.extension(), Some("jar"));
    }

    #[test]
    fn test_extension_and_descriptor() {
        let jar = ResolvedArtifact::new("g:a:1.0", Some("f/g/a/1.0/a-1.0.jar"));
        assert_eq!(jar.extension(), Some("jar"));
        assert_eq!(jar.descriptor_path().as_deref(), Some("f/g/a/1.0/a-1.0.pom"));

        let aar = ResolvedArtifact::new("g:a:aar:1.0", Some("f/g/a/1.0/a-1.0.aar"));
        assert_eq!(aar.descriptor_path().as_deref(), Some("f/g/a/1.0/a-1.0.pom"));

        let pom_only = ResolvedArtifact::new("g:a:1.0", None);
        assert_eq!(pom_only.extension(), None);

        let windows = ResolvedArtifact::new("g:a:1.0", Some(r"f\g\a\1.0\a-1.0.jar"));
        assert_eq!(windows.extension(), Some("jar"));
        assert_eq!(pom_only.descriptor_path(), None);
    }
}
