//! Fluent builder for [`DependencyTree`] fixtures.

use sha2::{Digest, Sha256};

use crate::tree::{DependencyTree, ResolvedArtifact};

/// Base URL used for fabricated provenance.
const FIXTURE_REPOSITORY: &str = "https://repo.maven.apache.org/maven2";

/// Builds dependency trees entry by entry, preserving insertion order.
#[derive(Debug, Default)]
pub struct DependencyTreeBuilder {
    entries: Vec<ResolvedArtifact>,
}

impl DependencyTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry with a materialized file.
    pub fn artifact(mut self, coord: &str, file: &str, deps: &[&str]) -> Self {
        self.entries.push(entry(coord, Some(file), deps));
        self
    }

    /// Append an entry without a file.
    pub fn pom_only(mut self, coord: &str, deps: &[&str]) -> Self {
        self.entries.push(entry(coord, None, deps));
        self
    }

    /// Append an entry with a file, a URL under Maven Central and a
    /// checksum derived from the coordinate.
    pub fn fetched(mut self, coord: &str, file: &str, deps: &[&str]) -> Self {
        let mut artifact = entry(coord, Some(file), deps);
        artifact.url = Some(format!("{FIXTURE_REPOSITORY}/{file}"));
        artifact.sha256 = Some(hex::encode(Sha256::digest(coord.as_bytes())));
        self.entries.push(artifact);
        self
    }

    /// Append a prepared entry as is.
    pub fn entry(mut self, artifact: ResolvedArtifact) -> Self {
        self.entries.push(artifact);
        self
    }

    pub fn build(self) -> DependencyTree {
        DependencyTree::new(self.entries)
    }
}

fn entry(coord: &str, file: Option<&str>, deps: &[&str]) -> ResolvedArtifact {
    let mut artifact = ResolvedArtifact::new(coord, file);
    artifact.dependencies = deps.iter().map(|dep| (*dep).to_string()).collect();
    artifact
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_order() {
        let tree = DependencyTreeBuilder::new()
            .artifact("g:b:1.0", "b.jar", &["g:a:1.0"])
            .pom_only("g:a:1.0", &[])
            .build();

        let coords: Vec<&str> = tree.iter().map(|a| a.coord.as_str()).collect();
        assert_eq!(coords, vec!["g:b:1.0", "g:a:1.0"]);
        assert_eq!(tree.dependencies[0].dependencies, vec!["g:a:1.0"]);
        assert_eq!(tree.dependencies[1].file, None);
    }

    #[test]
    fn test_fetched_sets_provenance() {
        let tree = DependencyTreeBuilder::new().fetched("g:a:1.0", "g/a/1.0/a-1.0.jar", &[]).build();
        let artifact = &tree.dependencies[0];
        assert_eq!(
            artifact.url.as_deref(),
            Some("https://repo.maven.apache.org/maven2/g/a/1.0/a-1.0.jar")
        );
        assert_eq!(artifact.sha256.as_ref().map(String::len), Some(64));
    }
}
