//! Pinned pipeline through the `mavin` binary.

use predicates::prelude::*;

mod common;
use common::{FAILUREACCESS, GUAVA, GUAVA_JAR, config, guava_lockfile, mavin};
use mavin_cli::lockfile::Lockfile;
use mavin_cli::test_utils::{DependencyTreeBuilder, WorkspaceFixture};

fn pinned_workspace(extra_instance: &str) -> WorkspaceFixture {
    let fixture = WorkspaceFixture::new().unwrap();
    fixture
        .write_config(&config("", &format!("lock_file = \"maven_install.json\"\n{extra_instance}")))
        .unwrap();
    fixture.write_lockfile("maven_install.json", &guava_lockfile()).unwrap();
    fixture
}

#[test]
fn test_generate_from_lockfile() {
    let fixture = pinned_workspace("");

    mavin(&fixture)
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("maven"));

    let build = fixture.read("out/maven/BUILD").unwrap();
    assert!(build.starts_with("# Generated by mavin. DO NOT EDIT.\n# Repository: maven\n"));
    assert!(build.contains("name = \"com_google_guava_guava\""));
    assert!(build.contains("\":com_google_guava_failureaccess\""));
    assert!(build.contains("name = \"com_google_guava_guava_31_1_jre\""));
    assert!(build.contains("actual = \":com_google_guava_guava\""));
    assert!(build.contains("srcs = [\"@com_google_guava_guava_31_1_jre//file\"]"));

    let defs = fixture.read("out/maven/defs.bzl").unwrap();
    assert!(defs.contains("def pinned_maven_install():"));
    assert!(defs.contains("name = \"com_google_guava_guava_31_1_jre\""));
    assert!(defs.contains(&format!("/{GUAVA_JAR}\"]")));
    assert!(defs.contains("downloaded_file_path = \"guava-31.1-jre.jar\""));

    assert!(!fixture.exists("out/maven/compat.bzl"));
    assert!(!fixture.exists("out/unpinned_maven"));
}

#[test]
fn test_generate_is_deterministic() {
    let fixture = pinned_workspace("");

    mavin(&fixture).arg("generate").assert().success();
    let first = fixture.read("out/maven/BUILD").unwrap();
    mavin(&fixture).arg("generate").assert().success();
    let second = fixture.read("out/maven/BUILD").unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_generate_compat_repositories() {
    let fixture = pinned_workspace("generate_compat_repositories = true");

    mavin(&fixture).arg("generate").assert().success();

    let compat = fixture.read("out/maven/compat.bzl").unwrap();
    assert!(compat.contains("def compat_repositories():"));
    assert!(compat.contains("name = \"com_google_guava_guava\""));
}

#[test]
fn test_corrupt_lockfile_suggests_repin() {
    let fixture = pinned_workspace("");
    fixture.write_file("maven_install.json", b"{ not json").unwrap();

    mavin(&fixture)
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("maven_install.json"))
        .stderr(predicate::str::contains("mavin pin --name maven"));

    assert!(!fixture.exists("out/maven/BUILD"));
}

#[test]
fn test_lockfile_without_dependency_tree_is_rejected() {
    let fixture = pinned_workspace("");
    fixture.write_file("maven_install.json", br#"{"something_else": {}}"#).unwrap();

    mavin(&fixture)
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("dependency_tree"));
}

#[test]
fn test_missing_dependency_is_fatal() {
    let fixture = pinned_workspace("");
    let lockfile = Lockfile::new(
        DependencyTreeBuilder::new().fetched(GUAVA, GUAVA_JAR, &[FAILUREACCESS]).build(),
    );
    fixture.write_lockfile("maven_install.json", &lockfile).unwrap();

    mavin(&fixture)
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains(FAILUREACCESS))
        .stderr(predicate::str::contains(GUAVA));
}

#[test]
fn test_lockfile_entry_without_url_is_fatal() {
    let fixture = pinned_workspace("");
    let mut lockfile = guava_lockfile();
    lockfile.dependency_tree.dependencies[1].url = None;
    fixture.write_lockfile("maven_install.json", &lockfile).unwrap();

    mavin(&fixture)
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains(FAILUREACCESS))
        .stderr(predicate::str::contains("mavin pin --name maven"));

    assert!(!fixture.exists("out/maven/BUILD"));
}

#[test]
fn test_stale_lockfile_still_generates() {
    let fixture = pinned_workspace("");
    let lockfile = guava_lockfile().with_input_hash("0000");
    fixture.write_lockfile("maven_install.json", &lockfile).unwrap();

    mavin(&fixture)
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("out of date"));

    assert!(fixture.exists("out/maven/BUILD"));
}

#[test]
fn test_validate_reports_without_writing() {
    let fixture = pinned_workspace("");

    mavin(&fixture)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("✓"))
        .stdout(predicate::str::contains("maven"));

    assert!(!fixture.exists("out"));
}

#[test]
fn test_validate_json_output() {
    let fixture = pinned_workspace("");

    let output = mavin(&fixture).args(["validate", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reports[0]["name"], "maven");
    assert_eq!(reports[0]["status"], "valid");
    assert_eq!(reports[0]["stale"], false);
}

#[test]
fn test_validate_skips_live_instances() {
    let fixture = WorkspaceFixture::new().unwrap();
    fixture.write_config(&config("", "")).unwrap();

    mavin(&fixture)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped"));
}
