//! The external resolver collaborator.
//!
//! Version conflict resolution and downloading are delegated to an external
//! resolver binary. Its contract is all-or-nothing: a coordinate list,
//! repositories and exclusions go in; either a complete [`DependencyTree`]
//! comes back, or the pass fails with the resolver's own diagnostic text.
//! There is no retry at this layer.
//!
//! [`ArtifactResolver`] is the seam the live pipeline depends on.
//! [`CoursierResolver`] drives a real binary through [`ResolverCommand`];
//! tests substitute in-memory implementations.

mod command;
mod coursier;

pub use command::{ResolverCommand, ResolverOutput};
pub use coursier::CoursierResolver;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::InstanceConfig;
use crate::constants::UNPINNED_PREFIX;
use crate::coordinate::ArtifactCoordinate;
use crate::tree::DependencyTree;

/// Everything the resolver needs for one live pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverRequest {
    /// Repository name the pass runs under, used in diagnostics
    pub repository: String,
    pub artifacts: Vec<ArtifactCoordinate>,
    /// Maven repositories, first match wins
    pub repositories: Vec<String>,
    /// `group:artifact` pairs
    pub excluded_artifacts: Vec<String>,
    pub fetch_sources: bool,
    pub fail_on_missing_checksum: bool,
}

impl ResolverRequest {
    /// Build the request for a live pass of `instance`.
    pub fn for_instance(instance: &InstanceConfig) -> Result<Self> {
        Ok(Self {
            repository: format!("{UNPINNED_PREFIX}{}", instance.name),
            artifacts: instance.coordinates()?,
            repositories: instance.repositories.clone(),
            excluded_artifacts: instance.excluded_artifacts.clone(),
            fetch_sources: instance.fetch_sources,
            fail_on_missing_checksum: instance.fail_on_missing_checksum,
        })
    }
}

/// Resolves a request into a dependency tree.
///
/// Implementations return artifact `file` paths relative to the resolver
/// cache root.
#[async_trait]
pub trait ArtifactResolver: Send + Sync {
    async fn resolve(&self, request: &ResolverRequest) -> Result<DependencyTree>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_for_instance() {
        let instance: InstanceConfig = toml::from_str(
            r#"
            name = "maven"
            artifacts = ["g:a:1.0", { group = "g", artifact = "b", version = "2.0", classifier = "natives" }]
            repositories = ["https://repo1.maven.org/maven2"]
            excluded_artifacts = ["g:c"]
            fail_on_missing_checksum = false
            "#,
        )
        .unwrap();

        let request = ResolverRequest::for_instance(&instance).unwrap();
        assert_eq!(request.repository, "unpinned_maven");
        assert_eq!(request.artifacts.len(), 2);
        assert_eq!(request.artifacts[1].classifier.as_deref(), Some("natives"));
        assert_eq!(request.excluded_artifacts, vec!["g:c"]);
        assert!(!request.fail_on_missing_checksum);
        assert!(!request.fetch_sources);
    }
}
