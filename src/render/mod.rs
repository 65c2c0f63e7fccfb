//! Text rendering of generated declarations.
//!
//! All output is a pure function of its input: declarations are emitted in
//! the order the compiler produced them, and no timestamps or absolute paths
//! are added, so regenerating from the same tree is byte-identical.

use std::fmt::Write as _;

use crate::compiler::{
    AliasTarget, CompiledGraph, CopyTarget, ExportTarget, ImportKind, ImportTarget,
    TargetDeclaration,
};
use crate::coordinate::TargetLabel;
use crate::pipeline::{CompatRepository, FetchDeclaration};

const HEADER: &str = "# Generated by mavin. DO NOT EDIT.\n";

const HTTP_FILE_LOAD: &str =
    "load(\"@bazel_tools//tools/build_defs/repo:http.bzl\", \"http_file\")\n";

const COMPAT_RULE_LOAD: &str =
    "load(\"@mavin//private:compat_repository.bzl\", \"compat_repository\")\n";

const PUBLIC_VISIBILITY: &str = "//visibility:public";

/// Render the `BUILD` file of `repository`.
#[must_use]
pub fn build_file(repository: &str, graph: &CompiledGraph) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    let _ = writeln!(out, "# Repository: {repository}");

    for declaration in &graph.declarations {
        out.push('\n');
        match declaration {
            TargetDeclaration::Import(import) => render_import(&mut out, import),
            TargetDeclaration::Export(export) => render_export(&mut out, export),
            TargetDeclaration::Alias(alias) => render_alias(&mut out, alias),
            TargetDeclaration::Copy(copy) => render_copy(&mut out, copy),
        }
    }
    out
}

/// Render `defs.bzl` with one `http_file` per fetch declaration.
#[must_use]
pub fn defs_file(repository: &str, fetches: &[FetchDeclaration]) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    out.push_str(HTTP_FILE_LOAD);
    out.push('\n');
    let _ = writeln!(out, "def pinned_{repository}_install():");

    if fetches.is_empty() {
        out.push_str("    pass\n");
        return out;
    }

    for (index, fetch) in fetches.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str("    http_file(\n");
        attr(&mut out, 2, "name", &quote(&fetch.name));
        attr(&mut out, 2, "urls", &format!("[{}]", quote(&fetch.url)));
        if let Some(sha256) = &fetch.sha256 {
            attr(&mut out, 2, "sha256", &quote(sha256));
        }
        attr(&mut out, 2, "downloaded_file_path", &quote(&fetch.downloaded_file_path));
        out.push_str("    )\n");
    }
    out
}

/// Render `compat.bzl`.
#[must_use]
pub fn compat_file(repositories: &[CompatRepository]) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    out.push_str(COMPAT_RULE_LOAD);
    out.push('\n');
    out.push_str("def compat_repositories():\n");

    if repositories.is_empty() {
        out.push_str("    pass\n");
        return out;
    }

    for repository in repositories {
        let _ = writeln!(
            out,
            "    compat_repository(name = {}, generating_repository = {})",
            quote(repository.name.as_str()),
            quote(&repository.generating_repository)
        );
    }
    out
}

fn render_import(out: &mut String, import: &ImportTarget) {
    let rule = match import.kind {
        ImportKind::Jar => "java_import",
        ImportKind::Aar => "aar_import",
    };
    let _ = writeln!(out, "{rule}(");
    attr(out, 1, "name", &quote(import.name.as_str()));
    match import.kind {
        ImportKind::Jar => attr(out, 1, "jars", &format!("[{}]", quote(&import.archive))),
        ImportKind::Aar => attr(out, 1, "aar", &quote(&import.archive)),
    }
    if let Some(srcjar) = &import.srcjar {
        attr(out, 1, "srcjar", &quote(srcjar));
    }
    label_list(out, "deps", &import.deps);
    if import.neverlink {
        attr(out, 1, "neverlink", "True");
    }
    attr(out, 1, "tags", &format!("[{}]", quote(&format!("maven_coordinates={}", import.coordinates))));
    attr(out, 1, "visibility", &format!("[{}]", quote(PUBLIC_VISIBILITY)));
    out.push_str(")\n");
}

fn render_export(out: &mut String, export: &ExportTarget) {
    out.push_str("java_library(\n");
    attr(out, 1, "name", &quote(export.name.as_str()));
    label_list(out, "exports", &export.exports);
    attr(out, 1, "tags", &format!("[{}]", quote(&format!("maven_coordinates={}", export.coordinates))));
    attr(out, 1, "visibility", &format!("[{}]", quote(PUBLIC_VISIBILITY)));
    out.push_str(")\n");
}

fn render_alias(out: &mut String, alias: &AliasTarget) {
    out.push_str("alias(\n");
    attr(out, 1, "name", &quote(alias.name.as_str()));
    attr(out, 1, "actual", &quote(&local_label(&alias.actual)));
    attr(out, 1, "visibility", &format!("[{}]", quote(PUBLIC_VISIBILITY)));
    out.push_str(")\n");
}

fn render_copy(out: &mut String, copy: &CopyTarget) {
    out.push_str("genrule(\n");
    attr(out, 1, "name", &quote(&copy.name));
    attr(out, 1, "srcs", &format!("[{}]", quote(&format!("@{}//file", copy.fetch_repository))));
    attr(out, 1, "outs", &format!("[{}]", quote(&copy.output)));
    attr(out, 1, "cmd", &quote("cp $< $@"));
    out.push_str(")\n");
}

/// `name = [":a", ":b"]` on one line per label; omitted when empty.
fn label_list(out: &mut String, name: &str, labels: &[TargetLabel]) {
    if labels.is_empty() {
        return;
    }
    let _ = writeln!(out, "    {name} = [");
    for label in labels {
        let _ = writeln!(out, "        {},", quote(&local_label(label)));
    }
    out.push_str("    ],\n");
}

fn attr(out: &mut String, depth: usize, name: &str, value: &str) {
    let _ = writeln!(out, "{}{name} = {value},", "    ".repeat(depth));
}

fn local_label(label: &TargetLabel) -> String {
    format!(":{label}")
}

/// Double-quoted string literal.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{CompileOptions, compile};
    use crate::pipeline::fetch_declarations;
    use crate::test_utils::DependencyTreeBuilder;

    #[test]
    fn test_build_file_for_jar_with_deps() {
        let tree = DependencyTreeBuilder::new()
            .artifact("g:a:1.0", "f/g/a/1.0/a.jar", &["g:b:1.0", "g:a:1.0"])
            .artifact("g:b:1.0", "f/g/b/1.0/b.jar", &[])
            .build();
        let graph = compile(&tree, &CompileOptions::default()).unwrap();

        let expected = r#"# Generated by mavin. DO NOT EDIT.
# Repository: unpinned_maven

java_import(
    name = "g_a",
    jars = ["f/g/a/1.0/a.jar"],
    deps = [
        ":g_b",
    ],
    tags = ["maven_coordinates=g:a:1.0"],
    visibility = ["//visibility:public"],
)

alias(
    name = "g_a_1_0",
    actual = ":g_a",
    visibility = ["//visibility:public"],
)

java_import(
    name = "g_b",
    jars = ["f/g/b/1.0/b.jar"],
    tags = ["maven_coordinates=g:b:1.0"],
    visibility = ["//visibility:public"],
)

alias(
    name = "g_b_1_0",
    actual = ":g_b",
    visibility = ["//visibility:public"],
)
"#;
        assert_eq!(build_file("unpinned_maven", &graph), expected);
    }

    #[test]
    fn test_build_file_aar_sources_neverlink_and_copies() {
        let tree = DependencyTreeBuilder::new()
            .artifact("g:lib:aar:1.0", "v1/https/r/lib-1.0.aar", &[])
            .artifact("g:lib:jar:sources:1.0", "v1/https/r/lib-1.0-sources.jar", &[])
            .build();
        let options = CompileOptions::new()
            .with_fetch_sources(true)
            .with_pinned(true)
            .with_neverlink([("g", "lib")]);
        let graph = compile(&tree, &options).unwrap();

        let rendered = build_file("maven", &graph);
        assert!(rendered.contains(
            "aar_import(\n    name = \"g_lib\",\n    aar = \"v1/https/r/lib-1.0.aar\",\n    srcjar = \"v1/https/r/lib-1.0-sources.jar\",\n"
        ));
        assert!(rendered.contains("    neverlink = True,\n"));
        assert!(rendered.contains(
            "genrule(\n    name = \"g_lib_aar_1_0_extension\",\n    srcs = [\"@g_lib_aar_1_0//file\"],\n    outs = [\"v1/https/r/lib-1.0.aar\"],\n    cmd = \"cp $< $@\",\n)\n"
        ));
        assert!(rendered.contains("srcs = [\"@g_lib_jar_sources_1_0//file\"]"));
    }

    #[test]
    fn test_build_file_for_aggregator() {
        let tree = DependencyTreeBuilder::new()
            .pom_only("g:bom:1.0", &["g:x:1.0"])
            .artifact("g:x:1.0", "x.jar", &[])
            .build();
        let graph = compile(&tree, &CompileOptions::new().with_pom_only(["g:bom:1.0"])).unwrap();

        let rendered = build_file("maven", &graph);
        assert!(rendered.contains(
            "java_library(\n    name = \"g_bom\",\n    exports = [\n        \":g_x\",\n    ],\n    tags = [\"maven_coordinates=g:bom:1.0\"],\n"
        ));
    }

    #[test]
    fn test_build_file_is_deterministic() {
        let tree = DependencyTreeBuilder::new()
            .artifact("g:a:1.0", "a.jar", &["g:c:1.0", "g:b:1.0"])
            .artifact("g:b:1.0", "b.jar", &[])
            .artifact("g:c:1.0", "c.jar", &[])
            .build();
        let first = build_file("maven", &compile(&tree, &CompileOptions::default()).unwrap());
        let second = build_file("maven", &compile(&tree, &CompileOptions::default()).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn test_defs_file() {
        let tree = DependencyTreeBuilder::new().fetched("g:a:1.0", "g/a/1.0/a-1.0.jar", &[]).build();
        let fetches = fetch_declarations(&tree);
        let rendered = defs_file("maven", &fetches);

        assert!(rendered.contains(HTTP_FILE_LOAD));
        assert!(rendered.contains("def pinned_maven_install():\n    http_file(\n        name = \"g_a_1_0\",\n"));
        assert!(rendered.contains(
            "        urls = [\"https://repo.maven.apache.org/maven2/g/a/1.0/a-1.0.jar\"],\n"
        ));
        assert!(rendered.contains("        downloaded_file_path = \"a-1.0.jar\",\n    )\n"));
        assert!(rendered.contains(&format!("sha256 = \"{}\"", fetches[0].sha256.as_ref().unwrap())));
    }

    #[test]
    fn test_empty_defs_and_compat_are_valid() {
        assert!(defs_file("maven", &[]).ends_with("def pinned_maven_install():\n    pass\n"));
        assert!(compat_file(&[]).ends_with("def compat_repositories():\n    pass\n"));
    }

    #[test]
    fn test_compat_file() {
        let tree = DependencyTreeBuilder::new().artifact("g:a:1.0", "a.jar", &[]).build();
        let graph = compile(&tree, &CompileOptions::default()).unwrap();
        let compat = crate::pipeline::compat_repositories(&graph, "maven");

        let rendered = compat_file(&compat);
        assert!(rendered.contains(
            "    compat_repository(name = \"g_a\", generating_repository = \"maven\")\n"
        ));
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote(r#"a"b\c"#), r#""a\"b\\c""#);
    }
}
