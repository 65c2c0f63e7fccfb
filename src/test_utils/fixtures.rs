//! On-disk workspaces for command-level tests.
//!
//! A [`WorkspaceFixture`] owns a temporary directory laid out as
//!
//! ```text
//! <root>/
//!   mavin.toml
//!   cache/            resolver download cache
//!   <lockfiles>
//! ```
//!
//! On unix it can also install a stand-in resolver script that copies a
//! canned report to wherever `--json-output-file` points.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::constants::CONFIG_FILE_NAME;
use crate::lockfile::Lockfile;
#[cfg(unix)]
use crate::tree::DependencyTree;

/// Cache directory name inside the fixture root.
pub const CACHE_DIR: &str = "cache";

/// A temporary mavin workspace, removed on drop.
pub struct WorkspaceFixture {
    _temp_dir: TempDir,
    /// Canonical root, so paths match what the binary sees as its cwd
    root: PathBuf,
}

impl WorkspaceFixture {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temp dir")?;
        let root = temp_dir.path().canonicalize()?;
        fs::create_dir_all(root.join(CACHE_DIR))?;
        Ok(Self {
            _temp_dir: temp_dir,
            root,
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join(CONFIG_FILE_NAME)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.path().join(CACHE_DIR)
    }

    /// Write `mavin.toml`.
    pub fn write_config(&self, content: &str) -> Result<PathBuf> {
        self.write_file(CONFIG_FILE_NAME, content.as_bytes())
    }

    /// Write a file relative to the root, creating parent directories.
    pub fn write_file(&self, relative: &str, content: &[u8]) -> Result<PathBuf> {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Write a file relative to the cache root.
    pub fn write_cache_file(&self, relative: &str, content: &[u8]) -> Result<PathBuf> {
        self.write_file(&format!("{CACHE_DIR}/{relative}"), content)
    }

    pub fn write_lockfile(&self, relative: &str, lockfile: &Lockfile) -> Result<PathBuf> {
        self.write_file(relative, lockfile.to_json_string()?.as_bytes())
    }

    pub fn read(&self, relative: &str) -> Result<String> {
        let path = self.path().join(relative);
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path().join(relative).exists()
    }

    /// Install an executable resolver stand-in that reports `tree`.
    ///
    /// Relative `file` paths in `tree` are made absolute under the cache
    /// root, the way a real resolver reports them. Each invocation's
    /// arguments are appended to `resolver-args.txt`.
    #[cfg(unix)]
    pub fn install_fake_resolver(&self, tree: &DependencyTree) -> Result<PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let mut report = tree.clone();
        for artifact in &mut report.dependencies {
            if let Some(file) = artifact.file.as_deref() {
                artifact.file = Some(self.cache_dir().join(file).display().to_string());
            }
        }
        let report_path =
            self.write_file("resolver-report.json", serde_json::to_string_pretty(&report)?.as_bytes())?;
        let args_path = self.path().join("resolver-args.txt");

        let script = format!(
            r#"#!/bin/sh
echo "$@" >> '{args}'
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "--json-output-file" ]; then
    out="$2"
  fi
  shift
done
cp '{report}' "$out"
"#,
            args = args_path.display(),
            report = report_path.display(),
        );

        let path = self.write_file("fake-resolver.sh", script.as_bytes())?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        Ok(path)
    }

    /// Install a resolver stand-in that prints `stderr` and exits with 1.
    #[cfg(unix)]
    pub fn install_failing_resolver(&self, stderr: &str) -> Result<PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let script = format!("#!/bin/sh\necho '{stderr}' >&2\nexit 1\n");
        let path = self.write_file("failing-resolver.sh", script.as_bytes())?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        Ok(path)
    }
}
