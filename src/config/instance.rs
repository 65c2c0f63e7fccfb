//! One named resolution instance from `mavin.toml`.
//!
//! Instances are fully independent: each has its own artifact list,
//! repositories and lockfile, so the same coordinates may resolve to
//! different version trees in different instances.

use std::collections::HashSet;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::compiler::CompileOptions;
use crate::coordinate::ArtifactCoordinate;
use crate::core::MavinError;
use crate::lockfile::InputFingerprint;

/// An artifact request, either a coordinate string or a detailed table.
///
/// ```toml
/// artifacts = [
///     "com.google.guava:guava:31.1-jre",
///     { group = "junit", artifact = "junit", version = "4.13.2", neverlink = true },
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArtifactSpec {
    /// `group:artifact[:packaging[:classifier]]:version`
    Coordinate(String),
    Detailed(DetailedArtifact),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedArtifact {
    pub group: String,
    pub artifact: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packaging: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    /// Compile-time only
    #[serde(default)]
    pub neverlink: bool,
}

impl ArtifactSpec {
    /// Parse into a structured coordinate.
    pub fn coordinate(&self) -> Result<ArtifactCoordinate, MavinError> {
        match self {
            Self::Coordinate(raw) => ArtifactCoordinate::from_str(raw),
            Self::Detailed(detail) => {
                if [&detail.group, &detail.artifact, &detail.version]
                    .iter()
                    .any(|part| part.trim().is_empty())
                {
                    return Err(MavinError::ConfigError {
                        message: format!(
                            "Artifact table {{ group = \"{}\", artifact = \"{}\", version = \"{}\" }} \
                             needs a non-empty group, artifact and version",
                            detail.group, detail.artifact, detail.version
                        ),
                    });
                }
                let mut coord = ArtifactCoordinate::new(
                    detail.group.trim(),
                    detail.artifact.trim(),
                    detail.version.trim(),
                );
                if let Some(packaging) = &detail.packaging {
                    coord = coord.with_packaging(packaging.trim());
                }
                if let Some(classifier) = &detail.classifier {
                    coord = coord.with_classifier(classifier.trim());
                }
                Ok(coord)
            }
        }
    }

    #[must_use]
    pub const fn is_neverlink(&self) -> bool {
        matches!(self, Self::Detailed(DetailedArtifact { neverlink: true, .. }))
    }
}

const fn default_true() -> bool {
    true
}

/// A named resolution instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceConfig {
    /// Repository name of the generated targets
    pub name: String,

    #[serde(default)]
    pub artifacts: Vec<ArtifactSpec>,

    /// Maven repositories, consulted in order
    #[serde(default)]
    pub repositories: Vec<String>,

    /// `group:artifact` pairs removed from the transitive closure
    #[serde(default)]
    pub excluded_artifacts: Vec<String>,

    #[serde(default)]
    pub fetch_sources: bool,

    #[serde(default = "default_true")]
    pub fail_on_missing_checksum: bool,

    /// Coordinates known to publish no binary
    #[serde(default)]
    pub pom_only_artifacts: Vec<String>,

    /// Lockfile path; its presence selects the pinned pipeline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_file: Option<String>,

    #[serde(default)]
    pub generate_compat_repositories: bool,
}

impl InstanceConfig {
    /// Parsed artifact coordinates, in configuration order.
    pub fn coordinates(&self) -> Result<Vec<ArtifactCoordinate>> {
        self.artifacts
            .iter()
            .map(|spec| {
                spec.coordinate()
                    .with_context(|| format!("Invalid artifact in instance '{}'", self.name))
            })
            .collect()
    }

    /// `(group, artifact)` pairs of the artifacts marked neverlink.
    pub fn neverlink_pairs(&self) -> Result<Vec<(String, String)>> {
        let mut pairs = Vec::new();
        for spec in self.artifacts.iter().filter(|spec| spec.is_neverlink()) {
            let coord = spec.coordinate()?;
            pairs.push((coord.group, coord.artifact));
        }
        Ok(pairs)
    }

    /// Whether this instance runs the pinned pipeline by default.
    #[must_use]
    pub const fn is_pinned(&self) -> bool {
        self.lock_file.is_some()
    }

    /// Compiler options derived from this instance.
    pub fn compile_options(&self, pinned: bool) -> Result<CompileOptions> {
        let pairs = self.neverlink_pairs()?;
        Ok(CompileOptions::new()
            .with_neverlink(pairs.iter().map(|(group, artifact)| (group.as_str(), artifact.as_str())))
            .with_pom_only(&self.pom_only_artifacts)
            .with_fetch_sources(self.fetch_sources)
            .with_pinned(pinned))
    }

    /// Fingerprint of the resolver inputs, recorded in lockfiles.
    pub fn fingerprint(&self) -> Result<InputFingerprint> {
        let artifacts = self.coordinates()?.iter().map(ToString::to_string).collect();
        Ok(InputFingerprint {
            artifacts,
            repositories: self.repositories.clone(),
            excluded_artifacts: self.excluded_artifacts.clone(),
            fetch_sources: self.fetch_sources,
        })
    }

    /// Check this instance on its own.
    pub fn validate(&self) -> Result<(), MavinError> {
        if !is_valid_name(&self.name) {
            return Err(config_error(format!(
                "Instance name '{}' is not a valid repository name. Use letters, digits and \
                 underscores, not starting with a digit",
                self.name
            )));
        }

        if self.repositories.is_empty() {
            return Err(config_error(format!(
                "Instance '{}' has no repositories. Add at least one, e.g. \
                 repositories = [\"https://repo1.maven.org/maven2\"]",
                self.name
            )));
        }

        for spec in &self.artifacts {
            spec.coordinate()?;
        }

        for exclusion in &self.excluded_artifacts {
            let valid = matches!(
                exclusion.split(':').collect::<Vec<_>>().as_slice(),
                [group, artifact] if !group.trim().is_empty() && !artifact.trim().is_empty()
            );
            if !valid {
                return Err(config_error(format!(
                    "Excluded artifact '{exclusion}' in instance '{}' must be of the form group:artifact",
                    self.name
                )));
            }
        }

        for coord in &self.pom_only_artifacts {
            ArtifactCoordinate::from_str(coord)?;
        }

        let mut seen = HashSet::new();
        for spec in &self.artifacts {
            let coord = spec.coordinate()?;
            if !seen.insert(coord.versionless()) {
                return Err(config_error(format!(
                    "Artifact {} is listed more than once in instance '{}'",
                    coord.versionless(),
                    self.name
                )));
            }
        }

        Ok(())
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn config_error(message: String) -> MavinError {
    MavinError::ConfigError {
        message,
    }
}
