//! Input fingerprints for staleness detection.

use serde::{Deserialize, Serialize};

use super::sha256_bytes;

/// The resolver inputs a dependency tree was produced from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFingerprint {
    /// Canonical artifact coordinates
    pub artifacts: Vec<String>,
    pub repositories: Vec<String>,
    pub excluded_artifacts: Vec<String>,
    pub fetch_sources: bool,
}

impl InputFingerprint {
    /// Order-insensitive SHA-256 of the inputs.
    ///
    /// Lists are sorted before hashing.
    #[must_use]
    pub fn hash(&self) -> String {
        let mut content = String::new();
        for (section, values) in [
            ("artifacts", &self.artifacts),
            ("repositories", &self.repositories),
            ("excluded_artifacts", &self.excluded_artifacts),
        ] {
            let mut sorted: Vec<&str> = values.iter().map(String::as_str).collect();
            sorted.sort_unstable();
            content.push_str(section);
            content.push('\n');
            for value in sorted {
                content.push_str(value);
                content.push('\n');
            }
        }
        content.push_str(&format!("fetch_sources={}\n", self.fetch_sources));
        sha256_bytes(content.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingerprint() -> InputFingerprint {
        InputFingerprint {
            artifacts: vec!["g:b:1.0".into(), "g:a:1.0".into()],
            repositories: vec!["https://repo1.maven.org/maven2".into()],
            excluded_artifacts: vec![],
            fetch_sources: false,
        }
    }

    #[test]
    fn test_hash_ignores_order() {
        let mut reordered = fingerprint();
        reordered.artifacts.reverse();
        assert_eq!(fingerprint().hash(), reordered.hash());
    }

    #[test]
    fn test_hash_changes_with_inputs() {
        let base = fingerprint().hash();

        let mut changed = fingerprint();
        changed.artifacts.push("g:c:1.0".into());
        assert_ne!(base, changed.hash());

        let mut changed = fingerprint();
        changed.fetch_sources = true;
        assert_ne!(base, changed.hash());

        let mut moved = fingerprint();
        moved.excluded_artifacts.push(moved.artifacts.remove(0));
        assert_ne!(base, moved.hash());
    }
}
