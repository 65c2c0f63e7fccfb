//! Coordinate canonicalization.
//!
//! Pure functions mapping raw coordinate strings to target names. The rules
//! are table driven (see [`crate::constants`]):
//!
//! 1. Remove recognized packaging `:type:` infixes, then classifier infixes.
//! 2. Optionally drop the trailing version segment.
//! 3. Replace `. - : / +` with `_`, delete `[` and `]`, and truncate at the
//!    first `,` so version ranges collapse to their lower or only bound.
//!
//! Unrecognized packaging types are left in place; the graph compiler
//! reports them when it sees the file.

use std::fmt;

use crate::constants::{
    ESCAPED_CHARACTERS, LABEL_SEPARATOR, SOURCES_CLASSIFIER, STRIP_ONLY_PACKAGING_TYPES,
    STRIPPED_CLASSIFIERS, SUPPORTED_PACKAGING_TYPES,
};

/// Versionless target name for a `(group, artifact)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetLabel(String);

/// Version-qualified alias name; maps onto exactly one [`TargetLabel`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionedLabel(String);

impl TargetLabel {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl VersionedLabel {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for VersionedLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remove packaging and classifier infixes, keeping the version.
///
/// `pom` is stripped here even though it is never a fetch target.
#[must_use]
pub fn strip_packaging_and_classifier(coord: &str) -> String {
    let mut stripped = coord.to_string();
    for packaging in SUPPORTED_PACKAGING_TYPES.iter().chain(STRIP_ONLY_PACKAGING_TYPES) {
        stripped = stripped.replace(&format!(":{packaging}:"), ":");
    }
    for classifier in STRIPPED_CLASSIFIERS {
        stripped = stripped.replace(&format!(":{classifier}:"), ":");
    }
    stripped
}

/// Remove packaging, classifier and the trailing version segment.
#[must_use]
pub fn strip_packaging_and_classifier_and_version(coord: &str) -> String {
    let stripped = strip_packaging_and_classifier(coord);
    match stripped.rsplit_once(':') {
        Some((head, _version)) => head.to_string(),
        None => String::new(),
    }
}

/// Turn an arbitrary string into a target-safe identifier.
#[must_use]
pub fn escape(value: &str) -> String {
    let head = value.split(',').next().unwrap_or_default();
    head.chars()
        .filter(|c| !matches!(c, '[' | ']'))
        .map(|c| if ESCAPED_CHARACTERS.contains(&c) { LABEL_SEPARATOR } else { c })
        .collect()
}

/// Canonical label for a raw coordinate, with or without its version.
#[must_use]
pub fn label_for(coord: &str, strip_version: bool) -> String {
    if strip_version {
        escape(&strip_packaging_and_classifier_and_version(coord))
    } else {
        escape(&strip_packaging_and_classifier(coord))
    }
}

#[must_use]
pub fn target_label(coord: &str) -> TargetLabel {
    TargetLabel(label_for(coord, true))
}

#[must_use]
pub fn versioned_label(coord: &str) -> VersionedLabel {
    VersionedLabel(label_for(coord, false))
}

/// Target label for a bare `(group, artifact)` pair.
#[must_use]
pub fn versionless_label(group: &str, artifact: &str) -> TargetLabel {
    TargetLabel(escape(&format!("{group}:{artifact}")))
}

/// Name of the fetch declaration for a raw coordinate.
///
/// Only escaped, never stripped, so an archive and its `sources` archive get
/// distinct names.
#[must_use]
pub fn fetch_repository_name(coord: &str) -> String {
    escape(coord)
}

/// Whether the raw coordinate carries the `sources` classifier.
///
/// The classifier is the fourth segment of
/// `group:artifact:packaging:classifier:version`; an artifact that is merely
/// named `sources` does not count.
#[must_use]
pub fn is_sources_coordinate(coord: &str) -> bool {
    let parts: Vec<&str> = coord.split(':').collect();
    parts.len() == 5 && parts[3] == SOURCES_CLASSIFIER
}
