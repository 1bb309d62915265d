//! Declaration synthesis tests.

use dtx_emitter::{
    RESOLVED_PROPERTIES, ResolvedOptionTypes, render_declarations, write_declaration_file,
};

fn sample() -> ResolvedOptionTypes {
    ResolvedOptionTypes {
        theme: "'inspect' | 'dark' | 'light'".to_string(),
        search: "boolean | 'highlight' | 'filter' | 'filter-strict'".to_string(),
        show_types: "boolean".to_string(),
        show_length: "boolean".to_string(),
        show_preview: "boolean".to_string(),
        expand_all: "boolean".to_string(),
    }
}

#[test]
fn interpolates_resolved_types_verbatim() {
    let content = render_declarations(&sample());
    assert!(content.contains("theme?: 'inspect' | 'dark' | 'light';"));
    assert!(content.contains("search?: boolean | 'highlight' | 'filter' | 'filter-strict';"));
    assert!(content.contains("expandAll?: boolean;"));
}

#[test]
fn emits_both_tag_names_in_both_augmentations() {
    let content = render_declarations(&sample());
    assert_eq!(content.matches("'inspect-value'").count(), 2);
    assert_eq!(content.matches("'inspect-panel'").count(), 2);
    assert!(content.contains("declare namespace JSX"));
    assert!(content.contains("declare module 'vue'"));
    assert!(content.contains("GlobalComponents"));
}

#[test]
fn output_has_no_import_statements() {
    let content = render_declarations(&sample());
    for line in content.lines() {
        let trimmed = line.trim_start();
        assert!(
            !trimmed.starts_with("import "),
            "unexpected import statement: {line}"
        );
        assert!(!trimmed.contains("from 'svelte-inspect-value'"));
        assert!(!trimmed.contains("from \"svelte-inspect-value\""));
    }
}

#[test]
fn every_resolved_property_has_a_template_slot() {
    let content = render_declarations(&sample());
    for property in RESOLVED_PROPERTIES {
        assert!(
            content.contains(&format!("{property}?: ")),
            "no slot for {property}"
        );
    }
}

#[test]
fn rendering_is_deterministic() {
    assert_eq!(render_declarations(&sample()), render_declarations(&sample()));
}

#[test]
fn writes_and_overwrites_destination() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("index.d.ts");

    write_declaration_file(&out, "first").unwrap();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "first");

    write_declaration_file(&out, "second").unwrap();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "second");
}

#[test]
fn missing_destination_directory_is_a_write_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("dist/index.d.ts");
    let err = write_declaration_file(&out, "content").unwrap_err();
    assert!(matches!(err, dtx_common::ResolveError::Write { .. }));
    assert!(!out.exists());
}
