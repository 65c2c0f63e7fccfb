//! Shared helpers for mavin integration tests.

// Not every test binary uses every helper
#![allow(dead_code)]

use assert_cmd::Command;
use mavin_cli::lockfile::Lockfile;
use mavin_cli::test_utils::{DependencyTreeBuilder, WorkspaceFixture};

pub const GUAVA: &str = "com.google.guava:guava:31.1-jre";
pub const FAILUREACCESS: &str = "com.google.guava:failureaccess:1.0.1";
pub const GUAVA_JAR: &str = "com/google/guava/guava/31.1-jre/guava-31.1-jre.jar";
pub const FAILUREACCESS_JAR: &str =
    "com/google/guava/failureaccess/1.0.1/failureaccess-1.0.1.jar";

/// `mavin` running inside `fixture` with colors and spinners off.
pub fn mavin(fixture: &WorkspaceFixture) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mavin"));
    cmd.current_dir(fixture.path())
        .env("MAVIN_NO_PROGRESS", "1")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

/// A one-instance configuration named `maven`.
pub fn config(extra_settings: &str, extra_instance: &str) -> String {
    format!(
        r#"
[settings]
output_dir = "out"
cache_dir = "cache"
{extra_settings}

[[instance]]
name = "maven"
artifacts = ["{GUAVA}"]
repositories = ["https://repo1.maven.org/maven2"]
{extra_instance}
"#
    )
}

/// A lockfile in which guava depends on failureaccess.
pub fn guava_lockfile() -> Lockfile {
    Lockfile::new(
        DependencyTreeBuilder::new()
            .fetched(GUAVA, GUAVA_JAR, &[FAILUREACCESS])
            .fetched(FAILUREACCESS, FAILUREACCESS_JAR, &[])
            .build(),
    )
}
