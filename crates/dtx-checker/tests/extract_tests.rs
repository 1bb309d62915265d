//! End-to-end extraction tests over on-disk fixtures that mirror the real
//! layout: an entry file importing the options type from a node_modules
//! package.

use dtx_checker::{CheckerState, Program};
use dtx_common::ResolveError;
use std::path::Path;

fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Build the standard fixture: entry importing `InspectOptions` from
/// `svelte-inspect-value`, whose declarations are `package_decls`.
fn fixture(dir: &Path, package_decls: &str) {
    write(&dir.join("tsconfig.types.json"), "{}");
    write(
        &dir.join("src/types.ts"),
        r#"import type { InspectOptions } from 'svelte-inspect-value';

export interface InspectValueAttributes {
  theme?: InspectOptions['theme'];
}
"#,
    );
    let package = dir.join("node_modules/svelte-inspect-value");
    write(
        &package.join("package.json"),
        r#"{ "name": "svelte-inspect-value", "types": "./dist/index.d.ts" }"#,
    );
    write(&package.join("dist/index.d.ts"), package_decls);
}

fn extract(dir: &Path, property: &str) -> Result<String, ResolveError> {
    let program = Program::load(
        &dir.join("tsconfig.types.json"),
        &dir.join("src/types.ts"),
    )?;
    let mut checker = CheckerState::new();
    let import = checker.resolve_named_import(&program, "InspectOptions")?;
    let declared = checker.declared_type_of_symbol(&program, import.file, import.symbol);
    checker.property_type_text(declared, property, "InspectOptions")
}

#[test]
fn extracts_literal_union_and_boolean() {
    let dir = tempfile::tempdir().unwrap();
    fixture(
        dir.path(),
        r#"
export interface InspectOptions {
  theme: 'inspect' | 'drak' | 'stone' | 'dark' | 'light';
  search: boolean | 'highlight' | 'filter' | 'filter-strict';
  showTypes: boolean;
}
"#,
    );
    assert_eq!(
        extract(dir.path(), "theme").unwrap(),
        "'inspect' | 'drak' | 'stone' | 'dark' | 'light'"
    );
    assert_eq!(
        extract(dir.path(), "search").unwrap(),
        "boolean | 'highlight' | 'filter' | 'filter-strict'"
    );
    assert_eq!(extract(dir.path(), "showTypes").unwrap(), "boolean");
}

#[test]
fn expands_type_aliases_structurally() {
    let dir = tempfile::tempdir().unwrap();
    fixture(
        dir.path(),
        r#"
type Theme = 'inspect' | 'dark' | 'light';
export interface InspectOptions {
  theme: Theme;
}
"#,
    );
    assert_eq!(
        extract(dir.path(), "theme").unwrap(),
        "'inspect' | 'dark' | 'light'"
    );
}

#[test]
fn expands_aliases_across_files() {
    let dir = tempfile::tempdir().unwrap();
    fixture(
        dir.path(),
        r#"
export type { InspectOptions } from './options.js';
"#,
    );
    write(
        &dir.path()
            .join("node_modules/svelte-inspect-value/dist/options.ts"),
        r#"
import type { Theme } from './theme.js';
export interface InspectOptions {
  theme: Theme;
  search: boolean;
}
"#,
    );
    write(
        &dir.path()
            .join("node_modules/svelte-inspect-value/dist/theme.ts"),
        "export type Theme = 'light' | 'dark';\n",
    );
    assert_eq!(extract(dir.path(), "theme").unwrap(), "'light' | 'dark'");
    assert_eq!(extract(dir.path(), "search").unwrap(), "boolean");
}

#[test]
fn resolves_through_star_exports() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path(), "export * from './options.js';\n");
    write(
        &dir.path()
            .join("node_modules/svelte-inspect-value/dist/options.ts"),
        "export interface InspectOptions { theme: 'a' | 'b' }\n",
    );
    assert_eq!(extract(dir.path(), "theme").unwrap(), "'a' | 'b'");
}

#[test]
fn wide_union_renders_every_member() {
    let members: Vec<String> = (0..20).map(|i| format!("'theme-{i}'")).collect();
    let dir = tempfile::tempdir().unwrap();
    fixture(
        dir.path(),
        &format!(
            "export interface InspectOptions {{ theme: {} }}\n",
            members.join(" | ")
        ),
    );
    let text = extract(dir.path(), "theme").unwrap();
    assert!(!text.is_empty());
    assert!(!text.contains("..."));
    for member in members {
        assert!(text.contains(&member), "missing {member} in {text}");
    }
}

#[test]
fn missing_import_is_symbol_not_found() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path(), "export interface InspectOptions { theme: string }\n");
    // Entry without the designated import.
    write(
        &dir.path().join("src/types.ts"),
        "export interface InspectValueAttributes { theme?: string }\n",
    );
    let err = extract(dir.path(), "theme").unwrap_err();
    match err {
        ResolveError::SymbolNotFound { name, .. } => assert_eq!(name, "InspectOptions"),
        other => panic!("expected SymbolNotFound, got {other:?}"),
    }
}

#[test]
fn renamed_property_is_property_not_found() {
    let dir = tempfile::tempdir().unwrap();
    fixture(
        dir.path(),
        "export interface InspectOptions { colour: string }\n",
    );
    let err = extract(dir.path(), "theme").unwrap_err();
    match err {
        ResolveError::PropertyNotFound { property, type_name } => {
            assert_eq!(property, "theme");
            assert_eq!(type_name, "InspectOptions");
        }
        other => panic!("expected PropertyNotFound, got {other:?}"),
    }
}

#[test]
fn extraction_is_idempotent_and_order_independent() {
    let dir = tempfile::tempdir().unwrap();
    fixture(
        dir.path(),
        r#"
export interface InspectOptions {
  theme: 'a' | 'b';
  search: boolean | 'filter';
}
"#,
    );
    let program = Program::load(
        &dir.path().join("tsconfig.types.json"),
        &dir.path().join("src/types.ts"),
    )
    .unwrap();

    let mut forward = CheckerState::new();
    let import = forward.resolve_named_import(&program, "InspectOptions").unwrap();
    let declared = forward.declared_type_of_symbol(&program, import.file, import.symbol);
    let theme_first = forward
        .property_type_text(declared, "theme", "InspectOptions")
        .unwrap();
    let search_after = forward
        .property_type_text(declared, "search", "InspectOptions")
        .unwrap();
    let theme_again = forward
        .property_type_text(declared, "theme", "InspectOptions")
        .unwrap();

    let mut reverse = CheckerState::new();
    let import = reverse.resolve_named_import(&program, "InspectOptions").unwrap();
    let declared = reverse.declared_type_of_symbol(&program, import.file, import.symbol);
    let search_first = reverse
        .property_type_text(declared, "search", "InspectOptions")
        .unwrap();
    let theme_last = reverse
        .property_type_text(declared, "theme", "InspectOptions")
        .unwrap();

    assert_eq!(theme_first, theme_again);
    assert_eq!(theme_first, theme_last);
    assert_eq!(search_after, search_first);
}

#[test]
fn interface_heritage_contributes_properties() {
    let dir = tempfile::tempdir().unwrap();
    fixture(
        dir.path(),
        r#"
interface BaseOptions {
  search: boolean;
}
export interface InspectOptions extends BaseOptions {
  theme: 'a' | 'b';
}
"#,
    );
    assert_eq!(extract(dir.path(), "search").unwrap(), "boolean");
    assert_eq!(extract(dir.path(), "theme").unwrap(), "'a' | 'b'");
}

#[test]
fn keyof_expands_to_name_union() {
    let dir = tempfile::tempdir().unwrap();
    fixture(
        dir.path(),
        r#"
interface Themes { inspect: string; dark: string; light: string }
export interface InspectOptions {
  theme: keyof Themes;
}
"#,
    );
    assert_eq!(
        extract(dir.path(), "theme").unwrap(),
        "'inspect' | 'dark' | 'light'"
    );
}

#[test]
fn function_and_array_property_types_render() {
    let dir = tempfile::tempdir().unwrap();
    fixture(
        dir.path(),
        r#"
export interface InspectOptions {
  onCollapse: (path: string[]) => void;
  stores: ('value' | 'writable')[];
}
"#,
    );
    assert_eq!(
        extract(dir.path(), "onCollapse").unwrap(),
        "(path: string[]) => void"
    );
    assert_eq!(
        extract(dir.path(), "stores").unwrap(),
        "('value' | 'writable')[]"
    );
}

#[test]
fn cyclic_alias_falls_back_to_name() {
    let dir = tempfile::tempdir().unwrap();
    fixture(
        dir.path(),
        r#"
type Tree = { children: Tree[] };
export interface InspectOptions {
  theme: Tree;
}
"#,
    );
    // The cycle breaks at the reference; extraction still terminates and the
    // self reference keeps its name.
    let text = extract(dir.path(), "theme").unwrap();
    assert!(text.contains("children"));
    assert!(text.contains("Tree"));
}

#[test]
fn generic_references_render_by_name() {
    let dir = tempfile::tempdir().unwrap();
    fixture(
        dir.path(),
        r#"
export interface InspectOptions {
  parse: Record<string, number>;
}
"#,
    );
    assert_eq!(
        extract(dir.path(), "parse").unwrap(),
        "Record<string, number>"
    );
}
