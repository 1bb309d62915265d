//! Full-pipeline driver tests over on-disk fixtures.

use clap::Parser;
use dtx_cli::CliArgs;
use dtx_cli::driver::{self, Stage};
use dtx_common::ResolveError;
use std::path::Path;

fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn default_args() -> CliArgs {
    CliArgs::parse_from(["dtx"])
}

/// Standard project layout with the given upstream options declarations.
fn fixture(root: &Path, package_decls: &str) {
    write(&root.join("tsconfig.types.json"), "{}");
    write(
        &root.join("src/types.ts"),
        r#"import type { InspectOptions } from 'svelte-inspect-value';

export interface InspectValueAttributes {
  theme?: InspectOptions['theme'];
  search?: InspectOptions['search'];
}
"#,
    );
    let package = root.join("node_modules/svelte-inspect-value");
    write(
        &package.join("package.json"),
        r#"{ "name": "svelte-inspect-value", "types": "./dist/index.d.ts" }"#,
    );
    write(&package.join("dist/index.d.ts"), package_decls);
    std::fs::create_dir_all(root.join("dist")).unwrap();
}

const FULL_OPTIONS: &str = r#"
export interface InspectOptions {
  theme: 'inspect' | 'drak' | 'stone' | 'dark' | 'light';
  search: boolean | 'highlight' | 'filter' | 'filter-strict';
  showTypes: boolean;
  showLength: boolean;
  showPreview: boolean;
  expandAll: boolean;
}
"#;

#[test]
fn generates_declaration_file_with_resolved_types() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path(), FULL_OPTIONS);

    let out = driver::run(&default_args(), dir.path()).expect("pipeline succeeds");
    assert_eq!(out, dir.path().join("dist/index.d.ts"));

    let content = std::fs::read_to_string(&out).unwrap();
    assert!(content.contains("theme?: 'inspect' | 'drak' | 'stone' | 'dark' | 'light';"));
    assert!(content.contains("search?: boolean | 'highlight' | 'filter' | 'filter-strict';"));
    assert!(content.contains("showTypes?: boolean;"));

    // Self-contained: no import statements at all.
    for line in content.lines() {
        assert!(!line.trim_start().starts_with("import "));
    }
}

#[test]
fn scenario_simple_theme_and_search() {
    let dir = tempfile::tempdir().unwrap();
    fixture(
        dir.path(),
        r#"
export interface InspectOptions {
  theme: 'a' | 'b' | 'c';
  search: boolean;
  showTypes: boolean;
  showLength: boolean;
  showPreview: boolean;
  expandAll: boolean;
}
"#,
    );

    let out = driver::run(&default_args(), dir.path()).unwrap();
    let content = std::fs::read_to_string(&out).unwrap();
    assert!(content.contains("theme?: 'a' | 'b' | 'c';"));
    assert!(content.contains("search?: boolean;"));
    assert_eq!(content.matches("import ").count(), 0);
}

#[test]
fn runs_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path(), FULL_OPTIONS);

    let out = driver::run(&default_args(), dir.path()).unwrap();
    let first = std::fs::read(&out).unwrap();
    let out = driver::run(&default_args(), dir.path()).unwrap();
    let second = std::fs::read(&out).unwrap();
    assert_eq!(first, second);
}

#[test]
fn missing_import_fails_in_resolving_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path(), FULL_OPTIONS);
    write(
        &dir.path().join("src/types.ts"),
        "export interface InspectValueAttributes { theme?: string }\n",
    );

    let err = driver::run(&default_args(), dir.path()).unwrap_err();
    assert_eq!(err.stage, Stage::Resolving);
    assert!(matches!(err.error, ResolveError::SymbolNotFound { .. }));
    assert!(!dir.path().join("dist/index.d.ts").exists());
}

#[test]
fn renamed_property_fails_in_extracting_and_keeps_prior_output() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path(), FULL_OPTIONS);
    let prior = dir.path().join("dist/index.d.ts");
    write(&prior, "// prior successful run\n");

    let renamed = FULL_OPTIONS.replace("theme:", "colour:");
    write(
        &dir.path()
            .join("node_modules/svelte-inspect-value/dist/index.d.ts"),
        &renamed,
    );

    let err = driver::run(&default_args(), dir.path()).unwrap_err();
    assert_eq!(err.stage, Stage::Extracting);
    match &err.error {
        ResolveError::PropertyNotFound { property, .. } => assert_eq!(property, "theme"),
        other => panic!("expected PropertyNotFound, got {other:?}"),
    }
    // The failure happened before the write; the prior file is untouched.
    assert_eq!(
        std::fs::read_to_string(&prior).unwrap(),
        "// prior successful run\n"
    );
}

#[test]
fn missing_config_fails_in_loading() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path(), FULL_OPTIONS);
    std::fs::remove_file(dir.path().join("tsconfig.types.json")).unwrap();

    let err = driver::run(&default_args(), dir.path()).unwrap_err();
    assert_eq!(err.stage, Stage::Loading);
    assert!(matches!(err.error, ResolveError::Configuration { .. }));
}

#[test]
fn missing_output_directory_fails_in_synthesizing() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path(), FULL_OPTIONS);
    std::fs::remove_dir_all(dir.path().join("dist")).unwrap();

    let err = driver::run(&default_args(), dir.path()).unwrap_err();
    assert_eq!(err.stage, Stage::Synthesizing);
    assert!(matches!(err.error, ResolveError::Write { .. }));
}

#[test]
fn target_import_override_is_honored() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path(), FULL_OPTIONS);
    write(
        &dir.path().join("src/types.ts"),
        "import type { Renamed } from 'svelte-inspect-value';\nexport {};\n",
    );

    // Default target no longer matches.
    let err = driver::run(&default_args(), dir.path()).unwrap_err();
    assert_eq!(err.stage, Stage::Resolving);

    // Overridden target resolves, but the upstream type has no such export,
    // so the run stops at the first missing property.
    let args = CliArgs::parse_from(["dtx", "--target-import", "Renamed"]);
    let err = driver::run(&args, dir.path()).unwrap_err();
    assert_eq!(err.stage, Stage::Extracting);
}
