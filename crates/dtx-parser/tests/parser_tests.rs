//! Statement and type-expression parsing tests.

use dtx_parser::{NodeIndex, ParserState};
use dtx_scanner::SyntaxKind;

fn parse(source: &str) -> (ParserState, NodeIndex) {
    let mut parser = ParserState::new("test.ts".to_string(), source.to_string());
    let root = parser.parse_source_file();
    (parser, root)
}

fn statements(parser: &ParserState, root: NodeIndex) -> Vec<NodeIndex> {
    let arena = parser.get_arena();
    let node = arena.get(root).expect("source file node");
    let file = arena.get_source_file(node).expect("source file data");
    file.statements.nodes.to_vec()
}

#[test]
fn parses_named_type_import() {
    let (parser, root) = parse("import type { InspectOptions } from 'svelte-inspect-value';");
    let stmts = statements(&parser, root);
    assert_eq!(stmts.len(), 1);

    let arena = parser.get_arena();
    let node = arena.get(stmts[0]).unwrap();
    assert_eq!(node.kind, SyntaxKind::ImportDeclaration);
    let import = arena.get_import_decl(node).unwrap();
    assert!(import.is_type_only);
    assert_eq!(import.specifiers.len(), 1);

    let spec_node = arena.get(import.specifiers.nodes[0]).unwrap();
    let spec = arena.get_specifier(spec_node).unwrap();
    assert!(spec.property_name.is_none());
    assert_eq!(arena.identifier_text(spec.name), Some("InspectOptions"));

    let module = arena.get(import.module_specifier).unwrap();
    assert_eq!(
        arena.get_literal(module).unwrap().text,
        "svelte-inspect-value"
    );
}

#[test]
fn parses_renamed_and_inline_type_specifiers() {
    let (parser, root) = parse("import { type Options as Opts, other } from './mod';");
    let stmts = statements(&parser, root);
    let arena = parser.get_arena();
    let import = arena
        .get_import_decl(arena.get(stmts[0]).unwrap())
        .unwrap();
    assert!(!import.is_type_only);
    assert_eq!(import.specifiers.len(), 2);

    let first = arena
        .get_specifier(arena.get(import.specifiers.nodes[0]).unwrap())
        .unwrap();
    assert!(first.is_type_only);
    assert_eq!(arena.identifier_text(first.property_name), Some("Options"));
    assert_eq!(arena.identifier_text(first.name), Some("Opts"));

    let second = arena
        .get_specifier(arena.get(import.specifiers.nodes[1]).unwrap())
        .unwrap();
    assert!(!second.is_type_only);
    assert_eq!(arena.identifier_text(second.name), Some("other"));
}

#[test]
fn parses_exported_interface_with_optional_members() {
    let (parser, root) = parse(
        r#"
export interface InspectOptions {
  /** Color theme. */
  theme?: 'light' | 'dark';
  search: boolean;
  readonly depth: number;
}
"#,
    );
    let stmts = statements(&parser, root);
    assert_eq!(stmts.len(), 1);
    let arena = parser.get_arena();
    let node = arena.get(stmts[0]).unwrap();
    assert_eq!(node.kind, SyntaxKind::InterfaceDeclaration);
    let iface = arena.get_interface(node).unwrap();
    assert!(iface.is_exported);
    assert_eq!(arena.identifier_text(iface.name), Some("InspectOptions"));
    assert_eq!(iface.members.len(), 3);

    let theme = arena
        .get_property_signature(arena.get(iface.members.nodes[0]).unwrap())
        .unwrap();
    assert!(theme.optional);
    assert!(!theme.readonly);
    assert_eq!(arena.identifier_text(theme.name), Some("theme"));
    let theme_type = arena.get(theme.type_node).unwrap();
    assert_eq!(theme_type.kind, SyntaxKind::UnionType);
    assert_eq!(
        arena.get_composite_type(theme_type).unwrap().types.len(),
        2
    );

    let depth = arena
        .get_property_signature(arena.get(iface.members.nodes[2]).unwrap())
        .unwrap();
    assert!(depth.readonly);
    assert!(!depth.optional);
}

#[test]
fn parses_type_alias_union_of_literals() {
    let (parser, root) = parse("export type Theme = 'inspect' | 'dark' | 'light';");
    let stmts = statements(&parser, root);
    let arena = parser.get_arena();
    let alias = arena
        .get_type_alias(arena.get(stmts[0]).unwrap())
        .unwrap();
    assert!(alias.is_exported);
    let union = arena
        .get_composite_type(arena.get(alias.type_node).unwrap())
        .unwrap();
    assert_eq!(union.types.len(), 3);
    let first = arena
        .get_literal_type(arena.get(union.types.nodes[0]).unwrap())
        .unwrap();
    assert_eq!(first.text, "inspect");
}

#[test]
fn parses_function_type_and_array_suffix() {
    let (parser, root) = parse("type Handler = (value: unknown, path?: string[]) => void;");
    let stmts = statements(&parser, root);
    let arena = parser.get_arena();
    let alias = arena
        .get_type_alias(arena.get(stmts[0]).unwrap())
        .unwrap();
    let func_node = arena.get(alias.type_node).unwrap();
    assert_eq!(func_node.kind, SyntaxKind::FunctionType);
    let func = arena.get_function_type(func_node).unwrap();
    assert_eq!(func.params.len(), 2);
    assert_eq!(
        arena.get(func.return_type).unwrap().kind,
        SyntaxKind::VoidKeyword
    );

    let path = arena
        .get_parameter(arena.get(func.params.nodes[1]).unwrap())
        .unwrap();
    assert!(path.optional);
    assert_eq!(
        arena.get(path.type_node).unwrap().kind,
        SyntaxKind::ArrayType
    );
}

#[test]
fn parses_parenthesized_union_array() {
    let (parser, root) = parse("type Mixed = (string | number)[];");
    let stmts = statements(&parser, root);
    let arena = parser.get_arena();
    let alias = arena
        .get_type_alias(arena.get(stmts[0]).unwrap())
        .unwrap();
    let array = arena.get(alias.type_node).unwrap();
    assert_eq!(array.kind, SyntaxKind::ArrayType);
    let inner = arena.get_wrapped_type(array).unwrap().inner;
    assert_eq!(arena.get(inner).unwrap().kind, SyntaxKind::ParenthesizedType);
}

#[test]
fn parses_reexport_clause() {
    let (parser, root) = parse("export { InspectOptions } from './options';");
    let stmts = statements(&parser, root);
    let arena = parser.get_arena();
    let node = arena.get(stmts[0]).unwrap();
    assert_eq!(node.kind, SyntaxKind::ExportDeclaration);
    let export = arena.get_export_decl(node).unwrap();
    assert!(!export.is_star);
    assert_eq!(export.specifiers.len(), 1);
    let module = arena.get(export.module_specifier).unwrap();
    assert_eq!(arena.get_literal(module).unwrap().text, "./options");
}

#[test]
fn skips_unmodeled_statements() {
    let (parser, root) = parse(
        r#"
const x = 1;
export function register(): void {}
export interface Kept { a: string }
"#,
    );
    let stmts = statements(&parser, root);
    assert_eq!(stmts.len(), 1);
    let arena = parser.get_arena();
    assert_eq!(
        arena.get(stmts[0]).unwrap().kind,
        SyntaxKind::InterfaceDeclaration
    );
}

#[test]
fn indexed_access_in_entry_file_parses() {
    let (parser, root) = parse("interface A { theme?: InspectOptions['theme']; }");
    let stmts = statements(&parser, root);
    let arena = parser.get_arena();
    let iface = arena.get_interface(arena.get(stmts[0]).unwrap()).unwrap();
    let prop = arena
        .get_property_signature(arena.get(iface.members.nodes[0]).unwrap())
        .unwrap();
    assert_eq!(
        arena.get(prop.type_node).unwrap().kind,
        SyntaxKind::IndexedAccessType
    );
}

#[test]
fn keyof_operator_parses() {
    let (parser, root) = parse("type Keys = keyof { a: 1; b: 2 };");
    let stmts = statements(&parser, root);
    let arena = parser.get_arena();
    let alias = arena
        .get_type_alias(arena.get(stmts[0]).unwrap())
        .unwrap();
    let op_node = arena.get(alias.type_node).unwrap();
    assert_eq!(op_node.kind, SyntaxKind::TypeOperator);
    let op = arena.get_type_operator(op_node).unwrap();
    assert_eq!(op.operator, SyntaxKind::KeyofKeyword);
    assert_eq!(
        arena.get(op.operand).unwrap().kind,
        SyntaxKind::TypeLiteral
    );
}
