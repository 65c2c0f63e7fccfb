//! [`ArtifactResolver`] backed by a coursier-compatible executable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};

use super::{ArtifactResolver, ResolverCommand, ResolverRequest};
use crate::core::MavinError;
use crate::tree::DependencyTree;
use crate::utils::relative_to;

/// Runs `<program> fetch ... --json-output-file <tmp>` and parses the report.
#[derive(Debug, Clone)]
pub struct CoursierResolver {
    program: String,
    cache_dir: PathBuf,
    timeout: Duration,
}

impl CoursierResolver {
    pub fn new(program: impl Into<String>, cache_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            cache_dir: cache_dir.into(),
            timeout,
        }
    }

    /// Resolve the configured program through `PATH`.
    fn locate(&self) -> Result<PathBuf, MavinError> {
        which::which(&self.program).map_err(|_| MavinError::ResolverNotFound {
            program: self.program.clone(),
        })
    }

    /// Rewrite absolute `file` paths relative to the cache root.
    fn relativize(&self, tree: &mut DependencyTree) {
        for artifact in &mut tree.dependencies {
            let Some(file) = artifact.file.as_deref() else {
                continue;
            };
            match relative_to(Path::new(file), &self.cache_dir) {
                Some(relative) => {
                    artifact.file = Some(relative.to_string_lossy().replace('\\', "/"));
                }
                None => debug!(
                    "Artifact {} lives outside the cache at {}; keeping its path",
                    artifact.coord, file
                ),
            }
        }
    }
}

#[async_trait]
impl ArtifactResolver for CoursierResolver {
    async fn resolve(&self, request: &ResolverRequest) -> Result<DependencyTree> {
        let program = self.locate()?;

        let report = tempfile::Builder::new()
            .prefix("mavin-resolve-")
            .suffix(".json")
            .tempfile()
            .context("Failed to create a temporary file for the resolver report")?;

        info!(
            "Resolving {} artifact(s) for {} against {} repositories",
            request.artifacts.len(),
            request.repository,
            request.repositories.len()
        );

        ResolverCommand::fetch(program, request, report.path())
            .timeout(self.timeout)
            .execute()
            .await?;

        let content = tokio::fs::read_to_string(report.path()).await.with_context(|| {
            format!("Failed to read resolver report {}", report.path().display())
        })?;
        let mut tree = DependencyTree::from_json(&content)
            .with_context(|| format!("Resolver report for {} is malformed", request.repository))?;

        self.relativize(&mut tree);
        debug!("Resolver returned {} entries for {}", tree.len(), request.repository);
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::DependencyTreeBuilder;

    #[test]
    fn test_relativize_strips_cache_root() {
        let resolver = CoursierResolver::new("coursier", "/cache/v1", Duration::from_secs(1));
        let mut tree = DependencyTreeBuilder::new()
            .artifact("g:a:1.0", "/cache/v1/https/repo/g/a/1.0/a-1.0.jar", &[])
            .artifact("g:b:1.0", "https/repo/g/b/1.0/b-1.0.jar", &[])
            .artifact("g:c:1.0", "/elsewhere/c.jar", &[])
            .pom_only("g:d:1.0", &[])
            .build();

        resolver.relativize(&mut tree);

        let files: Vec<Option<&str>> = tree.iter().map(|a| a.file.as_deref()).collect();
        assert_eq!(
            files,
            vec![
                Some("https/repo/g/a/1.0/a-1.0.jar"),
                Some("https/repo/g/b/1.0/b-1.0.jar"),
                Some("/elsewhere/c.jar"),
                None,
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_resolver_binary() {
        let resolver =
            CoursierResolver::new("mavin-test-no-such-resolver", "/cache", Duration::from_secs(1));
        let request = ResolverRequest {
            repository: "unpinned_maven".to_string(),
            artifacts: vec![],
            repositories: vec![],
            excluded_artifacts: vec![],
            fetch_sources: false,
            fail_on_missing_checksum: true,
        };

        let error = resolver.resolve(&request).await.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<MavinError>(),
            Some(MavinError::ResolverNotFound { .. })
        ));
    }
}
