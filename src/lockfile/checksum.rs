//! SHA-256 checksums of materialized artifacts.

use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of a file, streamed from disk.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).with_context(|| {
        format!(
            "Cannot read file for checksum calculation: {}\n\n\
                Check that the resolver materialized it and that it is readable.",
            path.display()
        )
    })?;

    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .with_context(|| format!("Failed to read {} while computing its checksum", path.display()))?;
    Ok(hex::encode(hasher.finalize()))
}

/// Lowercase hex SHA-256 of a byte slice.
#[must_use]
pub fn sha256_bytes(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            sha256_bytes(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_file_matches_bytes() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("a.jar");
        std::fs::write(&path, b"not really a jar").unwrap();
        assert_eq!(sha256_file(&path).unwrap(), sha256_bytes(b"not really a jar"));
    }

    #[test]
    fn test_missing_file() {
        let temp = tempdir().unwrap();
        assert!(sha256_file(&temp.path().join("missing.jar")).is_err());
    }
}
