//! Error handling for mavin
//!
//! This module provides the error taxonomy and user-friendly error reporting for
//! the mavin graph compiler. The error system follows two principles:
//! 1. **Strongly-typed errors** so callers and tests can match on failure modes
//! 2. **Actionable messages** so an operator can fix the problem without
//!    re-running at a higher verbosity
//!
//! # Architecture
//!
//! - [`MavinError`] - Enumerated error types for every fatal condition
//! - [`ErrorContext`] - Wrapper adding details and a suggestion for CLI display
//!
//! # Error Categories
//!
//! - **Resolver**: [`MavinError::ResolverInvocationFailure`], [`MavinError::ResolverNotFound`],
//!   [`MavinError::UnsupportedTransport`]
//! - **Graph compilation**: [`MavinError::MissingArtifact`], [`MavinError::UnrecognizedPackaging`]
//! - **Lockfile**: [`MavinError::LockfileCorrupt`], [`MavinError::LockfileSchemaInvalid`],
//!   [`MavinError::LockfileProvenanceMissing`]
//! - **Configuration**: [`MavinError::ConfigError`], [`MavinError::ConfigNotFound`],
//!   [`MavinError::ConfigParseError`]
//!
//! Every graph compilation error aborts the whole pass; there is no partial output.
//!
//! # Examples
//!
//! ```rust,no_run
//! use mavin_cli::core::{MavinError, user_friendly_error};
//!
//! let error = MavinError::ResolverNotFound {
//!     program: "coursier".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::constants::SUPPORTED_PACKAGING_TYPES;

/// An artifact that declares a dependency on a missing artifact.
///
/// Collected only on the failure path to help locate the POM that
/// introduced the broken edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseDependent {
    /// Full coordinate of the dependent artifact
    pub coord: String,
    /// Path of the dependent's descriptor (`.pom`) file, when it has a file at all
    pub descriptor: Option<String>,
}

/// The main error type for mavin operations
///
/// Each variant names one fatal condition of the resolution and compilation
/// pipelines and carries the context needed to act on it.
#[derive(Error, Debug)]
pub enum MavinError {
    /// The external resolver exited with a non-zero status
    ///
    /// The resolver's raw error output is preserved verbatim in `stderr`.
    #[error("Resolver failed for repository '{repository}' (exit status {status}): {stderr}")]
    ResolverInvocationFailure {
        /// Repository name the resolver was running for
        repository: String,
        /// Exit status, or a description such as "timed out"
        status: String,
        /// Raw diagnostic text emitted by the resolver
        stderr: String,
    },

    /// The resolver executable could not be located
    #[error("Resolver executable '{program}' was not found in PATH")]
    ResolverNotFound {
        /// Program name or path that was looked up
        program: String,
    },

    /// An artifact was not fetched over http or https
    #[error(
        "Artifact {coord} was not fetched over http(s) (cache path: {path}); only http and https repositories are supported"
    )]
    UnsupportedTransport {
        /// Coordinate of the offending artifact
        coord: String,
        /// Cache-relative path reported by the resolver
        path: String,
    },

    /// A referenced artifact has no file and is not a known POM-only aggregator
    #[error("{}", missing_artifact_message(.coord, .record, .dependents))]
    MissingArtifact {
        /// Coordinate of the missing artifact
        coord: String,
        /// Raw resolver record for the artifact, as JSON
        record: String,
        /// Other artifacts whose dependency lists reference `coord`
        dependents: Vec<ReverseDependent>,
    },

    /// A materialized artifact has an extension with no import strategy
    #[error(
        "Unable to generate a target for {coord}: unsupported packaging type '{extension}'. Parsed artifact data: {record}"
    )]
    UnrecognizedPackaging {
        /// Coordinate of the artifact
        coord: String,
        /// File extension found on the artifact
        extension: String,
        /// Raw resolver record for the artifact, as JSON
        record: String,
    },

    /// The lockfile could not be read or is not valid JSON
    #[error("Failed to parse lockfile {file}: {reason}\n\n{}", lockfile_remedy(.repository, .file))]
    LockfileCorrupt {
        /// Path to the lockfile
        file: String,
        /// Repository the lockfile belongs to
        repository: String,
        /// Underlying parse or read failure
        reason: String,
    },

    /// The lockfile parsed but has no `dependency_tree` field
    #[error(
        "Lockfile {file} does not contain a dependency_tree field\n\n{}",
        lockfile_remedy(.repository, .file)
    )]
    LockfileSchemaInvalid {
        /// Path to the lockfile
        file: String,
        /// Repository the lockfile belongs to
        repository: String,
    },

    /// A materialized lockfile entry lacks the `url` or `sha256` that pinned
    /// generation needs to declare its fetch
    #[error(
        "Lockfile {file} has no download provenance for {coord}: materialized entries need both `url` and `sha256`\n\n{}",
        lockfile_remedy(.repository, .file)
    )]
    LockfileProvenanceMissing {
        /// Path to the lockfile
        file: String,
        /// Repository the lockfile belongs to
        repository: String,
        /// Coordinate of the first entry missing provenance
        coord: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// Configuration file (mavin.toml) not found
    #[error("Configuration file mavin.toml not found in current directory or any parent directory")]
    ConfigNotFound,

    /// Configuration file parsing error
    #[error("Invalid configuration file syntax in {file}: {reason}")]
    ConfigParseError {
        /// Path to the configuration file
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

fn missing_artifact_message(coord: &str, record: &str, dependents: &[ReverseDependent]) -> String {
    let mut message = format!(
        "The artifact for {coord} was not downloaded. Perhaps the packaging type is not one of: {}?\n\
         It is also possible that the packaging type is not specified in the artifact's coordinates.\n\
         Parsed artifact data: {record}",
        SUPPORTED_PACKAGING_TYPES.join(", ")
    );

    if !dependents.is_empty() {
        message.push_str(&format!("\n\nThese artifacts depend on {coord}:"));
        for dependent in dependents {
            match &dependent.descriptor {
                Some(descriptor) => {
                    message.push_str(&format!("\n  - {} (POM: {descriptor})", dependent.coord));
                }
                None => message.push_str(&format!("\n  - {}", dependent.coord)),
            }
        }
        message.push_str(&format!(
            "\n\nPlease verify that {coord} is declared correctly in the POMs listed above, \
             or report the problem to the maintainers of those artifacts."
        ));
    }

    message
}

fn lockfile_remedy(repository: &str, file: &str) -> String {
    format!(
        "The lockfile may be corrupted or was not written by mavin. To regenerate it:\n  \
         1. Delete {file}\n  \
         2. Run `mavin pin --name {repository}` to write a fresh lockfile"
    )
}

impl Clone for MavinError {
    fn clone(&self) -> Self {
        match self {
            Self::ResolverInvocationFailure {
                repository,
                status,
                stderr,
            } => Self::ResolverInvocationFailure {
                repository: repository.clone(),
                status: status.clone(),
                stderr: stderr.clone(),
            },
            Self::ResolverNotFound {
                program,
            } => Self::ResolverNotFound {
                program: program.clone(),
            },
            Self::UnsupportedTransport {
                coord,
                path,
            } => Self::UnsupportedTransport {
                coord: coord.clone(),
                path: path.clone(),
            },
            Self::MissingArtifact {
                coord,
                record,
                dependents,
            } => Self::MissingArtifact {
                coord: coord.clone(),
                record: record.clone(),
                dependents: dependents.clone(),
            },
            Self::UnrecognizedPackaging {
                coord,
                extension,
                record,
            } => Self::UnrecognizedPackaging {
                coord: coord.clone(),
                extension: extension.clone(),
                record: record.clone(),
            },
            Self::LockfileCorrupt {
                file,
                repository,
                reason,
            } => Self::LockfileCorrupt {
                file: file.clone(),
                repository: repository.clone(),
                reason: reason.clone(),
            },
            Self::LockfileSchemaInvalid {
                file,
                repository,
            } => Self::LockfileSchemaInvalid {
                file: file.clone(),
                repository: repository.clone(),
            },
            Self::LockfileProvenanceMissing {
                file,
                repository,
                coord,
            } => Self::LockfileProvenanceMissing {
                file: file.clone(),
                repository: repository.clone(),
                coord: coord.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::ConfigNotFound => Self::ConfigNotFound,
            Self::ConfigParseError {
                file,
                reason,
            } => Self::ConfigParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            // For errors that don't implement Clone, convert to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::JsonError(e) => Self::Other {
                message: format!("JSON error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// `ErrorContext` wraps a [`MavinError`] and adds optional details and a
/// suggestion for resolution. This is how the CLI presents every failure.
///
/// # Display Format
///
/// 1. **Error**: the main error message in red
/// 2. **Details**: additional context in yellow (optional)
/// 3. **Suggestion**: actionable steps in green (optional)
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying mavin error
    pub error: MavinError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: MavinError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`MavinError`] anywhere in the context chain, common
/// [`std::io::Error`] kinds and TOML syntax errors; everything else is
/// reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(mavin_error) = error.downcast_ref::<MavinError>() {
        return create_error_context(mavin_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(MavinError::Other {
                    message: format!("Permission denied: {error}"),
                })
                .with_suggestion(
                    "Check ownership and permissions of the output directory and lockfile",
                );
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(MavinError::Other {
                    message: format!("File not found: {error}"),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(MavinError::ConfigParseError {
            file: "mavin.toml".to_string(),
            reason: toml_error.to_string(),
        })
        .with_suggestion(
            "Check the TOML syntax in your mavin.toml file. Verify quotes, brackets, and indentation",
        );
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(MavinError::Other {
        message,
    })
}

/// Map each [`MavinError`] variant to a tailored [`ErrorContext`].
fn create_error_context(error: MavinError) -> ErrorContext {
    match &error {
        MavinError::ResolverNotFound { program } => {
            let program = program.clone();
            ErrorContext::new(error)
                .with_suggestion(format!(
                    "Install '{program}' or point `settings.resolver` in mavin.toml at the executable"
                ))
                .with_details("Live resolution invokes the external resolver; pinned instances do not need it")
        }

        MavinError::ResolverInvocationFailure { repository, .. } => {
            let repository = repository.clone();
            ErrorContext::new(error)
                .with_suggestion("Check the artifact coordinates, repository URLs and network access, then retry")
                .with_details(format!(
                    "The resolver output above is reported verbatim; no targets were generated for '{repository}'"
                ))
        }

        MavinError::UnsupportedTransport { .. } => ErrorContext::new(error)
            .with_suggestion("Replace non-http(s) repositories (file://, local caches) with http or https mirrors")
            .with_details("Artifact URLs are reconstructed from the resolver cache layout, which only encodes http(s) origins"),

        MavinError::MissingArtifact { dependents, .. } => {
            let details = if dependents.is_empty() {
                "No other artifact in the tree references it; check the coordinate in mavin.toml"
            } else {
                "The dependents listed above declare it in their POMs"
            };
            ErrorContext::new(error)
                .with_suggestion("Add the packaging type to the coordinate, exclude the artifact, or list it in `pom_only_artifacts` if it is a POM-only aggregator")
                .with_details(details)
        }

        MavinError::UnrecognizedPackaging { .. } => ErrorContext::new(error)
            .with_suggestion("Only jar and aar archives can be imported; exclude the artifact or depend on a jar/aar variant")
            .with_details("Emitting an import for this file would produce a broken target"),

        MavinError::LockfileCorrupt { .. } | MavinError::LockfileSchemaInvalid { .. } => {
            ErrorContext::new(error)
                .with_details("Pinned generation never invokes the resolver, so it cannot repair a broken lockfile")
        }

        MavinError::LockfileProvenanceMissing { .. } => ErrorContext::new(error)
            .with_details("Without a download URL the generated copy rule would reference a fetch repository that is never declared"),

        MavinError::ConfigNotFound => ErrorContext::new(error)
            .with_suggestion("Create a mavin.toml with at least one [[instance]] section, or pass --config")
            .with_details("mavin looks for mavin.toml in the current directory and parent directories up to the filesystem root"),

        MavinError::ConfigParseError { file, .. } => {
            let file = file.clone();
            ErrorContext::new(error).with_suggestion(format!(
                "Check the TOML syntax in {file}. Common issues: missing quotes, unmatched brackets, invalid characters"
            ))
        }

        _ => ErrorContext::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = MavinError::ResolverNotFound {
            program: "coursier".to_string(),
        };
        assert_eq!(error.to_string(), "Resolver executable 'coursier' was not found in PATH");
    }

    #[test]
    fn test_missing_artifact_without_dependents() {
        let error = MavinError::MissingArtifact {
            coord: "g:a:1.0".to_string(),
            record: "{}".to_string(),
            dependents: vec![],
        };
        let message = error.to_string();
        assert!(message.contains("The artifact for g:a:1.0 was not downloaded"));
        assert!(message.contains("jar, aar, bundle, eclipse-plugin, orbit, test-jar"));
        assert!(!message.contains("These artifacts depend on"));
    }

    #[test]
    fn test_missing_artifact_with_dependents() {
        let error = MavinError::MissingArtifact {
            coord: "g:a:1.0".to_string(),
            record: "{}".to_string(),
            dependents: vec![
                ReverseDependent {
                    coord: "g:b:1.0".to_string(),
                    descriptor: Some("f/g/b/1.0/b.pom".to_string()),
                },
                ReverseDependent {
                    coord: "g:c:1.0".to_string(),
                    descriptor: None,
                },
            ],
        };
        let message = error.to_string();
        assert!(message.contains("These artifacts depend on g:a:1.0:"));
        assert!(message.contains("  - g:b:1.0 (POM: f/g/b/1.0/b.pom)"));
        assert!(message.contains("  - g:c:1.0\n"));
    }

    #[test]
    fn test_lockfile_errors_name_remedy() {
        let error = MavinError::LockfileCorrupt {
            file: "maven_install.json".to_string(),
            repository: "maven".to_string(),
            reason: "expected value".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("1. Delete maven_install.json"));
        assert!(message.contains("2. Run `mavin pin --name maven`"));

        let error = MavinError::LockfileSchemaInvalid {
            file: "maven_install.json".to_string(),
            repository: "maven".to_string(),
        };
        assert!(error.to_string().contains("dependency_tree"));
        assert!(error.to_string().contains("mavin pin --name maven"));

        let error = MavinError::LockfileProvenanceMissing {
            file: "maven_install.json".to_string(),
            repository: "maven".to_string(),
            coord: "g:a:1.0".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("g:a:1.0"));
        assert!(message.contains("1. Delete maven_install.json"));
        assert!(message.contains("mavin pin --name maven"));
    }

    #[test]
    fn test_error_clone() {
        let error = MavinError::UnsupportedTransport {
            coord: "g:a:1.0".to_string(),
            path: "v1/file/tmp/a.jar".to_string(),
        };
        assert_eq!(error.to_string(), error.clone().to_string());

        let io = MavinError::from(std::io::Error::other("boom"));
        match io.clone() {
            MavinError::Other {
                message,
            } => assert!(message.contains("boom")),
            _ => panic!("Expected Other"),
        }
    }

    #[test]
    fn test_user_friendly_error_finds_typed_error_through_context() {
        use anyhow::Context;

        let result: anyhow::Result<()> = Err(MavinError::ConfigNotFound.into());
        let error = result.context("loading workspace").unwrap_err();

        let ctx = user_friendly_error(error);
        assert!(matches!(ctx.error, MavinError::ConfigNotFound));
        assert!(ctx.suggestion.unwrap().contains("mavin.toml"));
    }

    #[test]
    fn test_user_friendly_error_toml_parse() {
        let result: Result<toml::Value, _> = toml::from_str("invalid = toml {");
        let error = anyhow::Error::from(result.unwrap_err());

        let ctx = user_friendly_error(error);
        assert!(matches!(ctx.error, MavinError::ConfigParseError { .. }));
        assert!(ctx.suggestion.unwrap().contains("TOML syntax"));
    }

    #[test]
    fn test_user_friendly_error_generic_includes_chain() {
        use anyhow::Context;

        let result: anyhow::Result<()> = Err(anyhow::anyhow!("root cause"));
        let error = result.context("outer").unwrap_err();

        let ctx = user_friendly_error(error);
        match ctx.error {
            MavinError::Other {
                message,
            } => {
                assert!(message.starts_with("outer"));
                assert!(message.contains("1: root cause"));
            }
            _ => panic!("Expected Other error"),
        }
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new(MavinError::ConfigNotFound)
            .with_details("details here")
            .with_suggestion("do this");
        let rendered = ctx.to_string();
        assert!(rendered.contains("Details: details here"));
        assert!(rendered.contains("Suggestion: do this"));
    }
}
