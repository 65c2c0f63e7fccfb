//! Maven artifact coordinates and their canonical build-target labels.
//!
//! A coordinate names one artifact as `group:artifact[:packaging[:classifier]]:version`.
//! The [`label`] submodule maps raw coordinate strings, exactly as the resolver
//! emits them, onto identifiers that are safe to use as target names.
//!
//! # Examples
//!
//! ```rust
//! use mavin_cli::coordinate::{ArtifactCoordinate, target_label, versioned_label};
//!
//! let coord: ArtifactCoordinate = "com.google.guava:guava:31.1-jre".parse().unwrap();
//! assert_eq!(coord.packaging, "jar");
//! assert_eq!(target_label(&coord.to_string()).as_str(), "com_google_guava_guava");
//! assert_eq!(versioned_label(&coord.to_string()).as_str(), "com_google_guava_guava_31_1_jre");
//! ```

pub mod label;

pub use label::{
    TargetLabel, VersionedLabel, escape, fetch_repository_name, is_sources_coordinate, label_for,
    strip_packaging_and_classifier, strip_packaging_and_classifier_and_version, target_label,
    versioned_label, versionless_label,
};

use std::fmt;
use std::str::FromStr;

use crate::core::MavinError;

const DEFAULT_PACKAGING: &str = "jar";

/// A structured Maven coordinate.
///
/// Immutable once parsed; [`Display`](fmt::Display) produces the canonical
/// `group:artifact[:packaging[:classifier]]:version` form, omitting the
/// default `jar` packaging when there is no classifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactCoordinate {
    /// Group identifier, e.g. `com.google.guava`
    pub group: String,
    /// Artifact identifier, e.g. `guava`
    pub artifact: String,
    /// Concrete version
    pub version: String,
    /// Packaging type; `jar` unless stated otherwise
    pub packaging: String,
    /// Optional classifier such as `sources`
    pub classifier: Option<String>,
}

impl ArtifactCoordinate {
    /// Create a `jar` coordinate without a classifier.
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
            packaging: DEFAULT_PACKAGING.to_string(),
            classifier: None,
        }
    }

    #[must_use]
    pub fn with_packaging(mut self, packaging: impl Into<String>) -> Self {
        self.packaging = packaging.into();
        self
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    /// The `group:artifact` pair identifying this artifact across versions.
    #[must_use]
    pub fn versionless(&self) -> String {
        format!("{}:{}", self.group, self.artifact)
    }

    /// Render the coordinate in the resolver's command-line syntax.
    ///
    /// Classifier and non-default packaging travel as `,classifier=` and
    /// `,type=` attributes rather than extra colon segments.
    #[must_use]
    pub fn to_resolver_arg(&self) -> String {
        let mut arg = format!("{}:{}:{}", self.group, self.artifact, self.version);
        if let Some(classifier) = &self.classifier {
            arg.push_str(&format!(",classifier={classifier}"));
        }
        if self.packaging != DEFAULT_PACKAGING {
            arg.push_str(&format!(",type={}", self.packaging));
        }
        arg
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)?;
        match &self.classifier {
            Some(classifier) => write!(f, ":{}:{classifier}", self.packaging)?,
            None if self.packaging != DEFAULT_PACKAGING => write!(f, ":{}", self.packaging)?,
            None => {}
        }
        write!(f, ":{}", self.version)
    }
}

impl FromStr for ArtifactCoordinate {
    type Err = MavinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.iter().any(|part| part.trim().is_empty()) {
            return Err(invalid_coordinate(s));
        }

        let coord = match parts.as_slice() {
            [group, artifact, version] => Self::new(*group, *artifact, *version),
            [group, artifact, packaging, version] => {
                Self::new(*group, *artifact, *version).with_packaging(*packaging)
            }
            [group, artifact, packaging, classifier, version] => {
                Self::new(*group, *artifact, *version)
                    .with_packaging(*packaging)
                    .with_classifier(*classifier)
            }
            _ => return Err(invalid_coordinate(s)),
        };

        Ok(coord)
    }
}

fn invalid_coordinate(raw: &str) -> MavinError {
    MavinError::ConfigError {
        message: format!(
            "Invalid artifact coordinate '{raw}'. Expected group:artifact:version, \
             group:artifact:packaging:version or group:artifact:packaging:classifier:version"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_three_segments() {
        let coord: ArtifactCoordinate = "junit:junit:4.13.2".parse().unwrap();
        assert_eq!(coord.group, "junit");
        assert_eq!(coord.artifact, "junit");
        assert_eq!(coord.version, "4.13.2");
        assert_eq!(coord.packaging, "jar");
        assert_eq!(coord.classifier, None);
        assert_eq!(coord.to_string(), "junit:junit:4.13.2");
    }

    #[test]
    fn test_parse_packaging_and_classifier() {
        let coord: ArtifactCoordinate = "g:a:aar:1.0".parse().unwrap();
        assert_eq!(coord.packaging, "aar");
        assert_eq!(coord.to_string(), "g:a:aar:1.0");

        let coord: ArtifactCoordinate = "g:a:jar:sources:1.0".parse().unwrap();
        assert_eq!(coord.classifier.as_deref(), Some("sources"));
        assert_eq!(coord.to_string(), "g:a:jar:sources:1.0");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("g:a".parse::<ArtifactCoordinate>().is_err());
        assert!("g::1.0".parse::<ArtifactCoordinate>().is_err());
        assert!("a:b:c:d:e:f".parse::<ArtifactCoordinate>().is_err());
    }

    #[test]
    fn test_resolver_arg() {
        let coord = ArtifactCoordinate::new("g", "a", "1.0");
        assert_eq!(coord.to_resolver_arg(), "g:a:1.0");

        let coord = ArtifactCoordinate::new("g", "a", "1.0")
            .with_packaging("aar")
            .with_classifier("natives");
        assert_eq!(coord.to_resolver_arg(), "g:a:1.0,classifier=natives,type=aar");
    }

    #[test]
    fn test_versionless() {
        let coord = ArtifactCoordinate::new("com.example", "lib", "2.0");
        assert_eq!(coord.versionless(), "com.example:lib");
    }
}
