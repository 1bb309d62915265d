//! Node representation and per-kind payload structs.

use dtx_common::Span;
use dtx_common::interner::Atom;
use dtx_scanner::SyntaxKind;
use smallvec::SmallVec;

/// Index of a node inside its `NodeArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }
}

/// Ordered list of child node indices.
#[derive(Clone, Debug, Default)]
pub struct NodeList {
    pub nodes: SmallVec<[NodeIndex; 4]>,
}

impl NodeList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, idx: NodeIndex) {
        self.nodes.push(idx);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// One AST node: kind, byte span, and an index into the kind's side table.
#[derive(Clone, Copy, Debug)]
pub struct Node {
    pub kind: SyntaxKind,
    pub pos: u32,
    pub end: u32,
    pub(crate) data: u32,
}

impl Node {
    #[must_use]
    pub fn span(&self) -> Span {
        Span::new(self.pos, self.end)
    }
}

// ============================================================================
// Side-table payloads
// ============================================================================

#[derive(Clone, Debug)]
pub struct IdentifierData {
    pub atom: Atom,
}

/// String literal token (module specifiers, property-name strings).
#[derive(Clone, Debug)]
pub struct LiteralData {
    /// Cooked text, escape sequences resolved.
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct ImportDeclData {
    pub is_type_only: bool,
    /// Named import specifiers, in source order. Default and namespace
    /// bindings are parsed but not recorded; the tool only resolves named
    /// imports.
    pub specifiers: NodeList,
    pub module_specifier: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct SpecifierData {
    /// Original exported name for renamed specifiers (`{ foo as bar }`),
    /// `NodeIndex::NONE` otherwise.
    pub property_name: NodeIndex,
    /// Local binding name.
    pub name: NodeIndex,
    pub is_type_only: bool,
}

#[derive(Clone, Debug)]
pub struct ExportDeclData {
    /// `export { a, b as c }` specifiers; empty for `export *`.
    pub specifiers: NodeList,
    /// Re-export source (`export ... from 'mod'`), `NodeIndex::NONE` for a
    /// local export clause.
    pub module_specifier: NodeIndex,
    pub is_star: bool,
}

#[derive(Clone, Debug)]
pub struct InterfaceData {
    pub name: NodeIndex,
    pub type_param_count: u32,
    /// `extends` heritage type references.
    pub heritage: NodeList,
    pub members: NodeList,
    pub is_exported: bool,
}

#[derive(Clone, Debug)]
pub struct TypeAliasData {
    pub name: NodeIndex,
    pub type_param_count: u32,
    pub type_node: NodeIndex,
    pub is_exported: bool,
}

#[derive(Clone, Debug)]
pub struct PropertySignatureData {
    pub name: NodeIndex,
    pub optional: bool,
    pub readonly: bool,
    /// `NodeIndex::NONE` means no annotation (implicit `any`).
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct IndexSignatureData {
    pub parameter_name: NodeIndex,
    pub key_type: NodeIndex,
    pub value_type: NodeIndex,
}

/// Union, intersection, and indexed-access payloads (two or more children).
#[derive(Clone, Debug)]
pub struct CompositeTypeData {
    pub types: NodeList,
}

#[derive(Clone, Debug)]
pub struct TypeRefData {
    /// Qualified entity name, interned as written (`React.HTMLAttributes`).
    pub name: Atom,
    pub type_args: NodeList,
}

/// Single-child wrappers: parenthesized types, array element, rest element.
#[derive(Clone, Debug)]
pub struct WrappedTypeData {
    pub inner: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct TupleTypeData {
    pub elements: NodeList,
}

#[derive(Clone, Debug)]
pub struct TypeLiteralData {
    pub members: NodeList,
}

#[derive(Clone, Debug)]
pub struct FunctionTypeData {
    pub params: NodeList,
    pub return_type: NodeIndex,
    pub is_constructor: bool,
}

#[derive(Clone, Debug)]
pub struct ParameterData {
    pub name: NodeIndex,
    pub type_node: NodeIndex,
    pub optional: bool,
    pub rest: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiteralTypeKind {
    String,
    Number,
    Boolean,
}

#[derive(Clone, Debug)]
pub struct LiteralTypeData {
    pub literal_kind: LiteralTypeKind,
    /// Cooked text for strings, raw source text for numbers, `true`/`false`
    /// for booleans. Opaque types reuse this table with verbatim source.
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct TypeOperatorData {
    /// `KeyofKeyword`, `TypeofKeyword`, or `ReadonlyKeyword`.
    pub operator: SyntaxKind,
    pub operand: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct SourceFileData {
    pub statements: NodeList,
}
