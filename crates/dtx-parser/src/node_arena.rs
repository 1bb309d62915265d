//! NodeArena: node pool, per-kind side tables, and accessors.

use crate::node::*;
use dtx_common::interner::{Atom, Interner};
use dtx_scanner::SyntaxKind;

/// Owns every node of one parsed source file.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
    interner: Interner,

    identifiers: Vec<IdentifierData>,
    literals: Vec<LiteralData>,
    import_decls: Vec<ImportDeclData>,
    specifiers: Vec<SpecifierData>,
    export_decls: Vec<ExportDeclData>,
    interfaces: Vec<InterfaceData>,
    type_aliases: Vec<TypeAliasData>,
    property_signatures: Vec<PropertySignatureData>,
    index_signatures: Vec<IndexSignatureData>,
    composite_types: Vec<CompositeTypeData>,
    type_refs: Vec<TypeRefData>,
    wrapped_types: Vec<WrappedTypeData>,
    tuple_types: Vec<TupleTypeData>,
    type_literals: Vec<TypeLiteralData>,
    function_types: Vec<FunctionTypeData>,
    parameters: Vec<ParameterData>,
    literal_types: Vec<LiteralTypeData>,
    type_operators: Vec<TypeOperatorData>,
    source_files: Vec<SourceFileData>,
}

macro_rules! add_method {
    ($add:ident, $get:ident, $pool:ident, $data:ty, $($kind:pat),+) => {
        pub fn $add(&mut self, kind: SyntaxKind, pos: u32, end: u32, data: $data) -> NodeIndex {
            let data_index = self.$pool.len() as u32;
            self.$pool.push(data);
            self.push_node(kind, pos, end, data_index)
        }

        #[must_use]
        pub fn $get(&self, node: &Node) -> Option<&$data> {
            match node.kind {
                $($kind)|+ => self.$pool.get(node.data as usize),
                _ => None,
            }
        }
    };
}

impl NodeArena {
    #[must_use]
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    #[must_use]
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn intern(&mut self, text: &str) -> Atom {
        self.interner.intern(text)
    }

    #[must_use]
    pub fn get(&self, idx: NodeIndex) -> Option<&Node> {
        if idx.is_none() {
            return None;
        }
        self.nodes.get(idx.0 as usize)
    }

    fn push_node(&mut self, kind: SyntaxKind, pos: u32, end: u32, data: u32) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            pos,
            end,
            data,
        });
        idx
    }

    /// Token-like node with no payload (intrinsic type keywords, error nodes).
    pub fn add_token(&mut self, kind: SyntaxKind, pos: u32, end: u32) -> NodeIndex {
        self.push_node(kind, pos, end, u32::MAX)
    }

    pub fn add_identifier(&mut self, pos: u32, end: u32, text: &str) -> NodeIndex {
        let atom = self.interner.intern(text);
        let data_index = self.identifiers.len() as u32;
        self.identifiers.push(IdentifierData { atom });
        self.push_node(SyntaxKind::Identifier, pos, end, data_index)
    }

    #[must_use]
    pub fn get_identifier(&self, node: &Node) -> Option<&IdentifierData> {
        match node.kind {
            SyntaxKind::Identifier => self.identifiers.get(node.data as usize),
            _ => None,
        }
    }

    /// Resolve an identifier node's text.
    #[must_use]
    pub fn identifier_text(&self, idx: NodeIndex) -> Option<&str> {
        let node = self.get(idx)?;
        let data = self.get_identifier(node)?;
        Some(self.interner.resolve(data.atom))
    }

    add_method!(add_literal, get_literal, literals, LiteralData, SyntaxKind::StringLiteral);
    add_method!(
        add_import_decl,
        get_import_decl,
        import_decls,
        ImportDeclData,
        SyntaxKind::ImportDeclaration
    );
    add_method!(
        add_specifier,
        get_specifier,
        specifiers,
        SpecifierData,
        SyntaxKind::ImportSpecifier
    );
    add_method!(
        add_export_decl,
        get_export_decl,
        export_decls,
        ExportDeclData,
        SyntaxKind::ExportDeclaration
    );
    add_method!(
        add_interface,
        get_interface,
        interfaces,
        InterfaceData,
        SyntaxKind::InterfaceDeclaration
    );
    add_method!(
        add_type_alias,
        get_type_alias,
        type_aliases,
        TypeAliasData,
        SyntaxKind::TypeAliasDeclaration
    );
    add_method!(
        add_property_signature,
        get_property_signature,
        property_signatures,
        PropertySignatureData,
        SyntaxKind::PropertySignature
    );
    add_method!(
        add_index_signature,
        get_index_signature,
        index_signatures,
        IndexSignatureData,
        SyntaxKind::IndexSignature
    );
    add_method!(
        add_composite_type,
        get_composite_type,
        composite_types,
        CompositeTypeData,
        SyntaxKind::UnionType,
        SyntaxKind::IntersectionType,
        SyntaxKind::IndexedAccessType
    );
    add_method!(
        add_type_ref,
        get_type_ref,
        type_refs,
        TypeRefData,
        SyntaxKind::TypeReference
    );
    add_method!(
        add_wrapped_type,
        get_wrapped_type,
        wrapped_types,
        WrappedTypeData,
        SyntaxKind::ParenthesizedType,
        SyntaxKind::ArrayType,
        SyntaxKind::RestType
    );
    add_method!(
        add_tuple_type,
        get_tuple_type,
        tuple_types,
        TupleTypeData,
        SyntaxKind::TupleType
    );
    add_method!(
        add_type_literal,
        get_type_literal,
        type_literals,
        TypeLiteralData,
        SyntaxKind::TypeLiteral
    );
    add_method!(
        add_function_type,
        get_function_type,
        function_types,
        FunctionTypeData,
        SyntaxKind::FunctionType
    );
    add_method!(
        add_parameter,
        get_parameter,
        parameters,
        ParameterData,
        SyntaxKind::Parameter
    );
    add_method!(
        add_literal_type,
        get_literal_type,
        literal_types,
        LiteralTypeData,
        SyntaxKind::LiteralType,
        SyntaxKind::OpaqueType
    );
    add_method!(
        add_type_operator,
        get_type_operator,
        type_operators,
        TypeOperatorData,
        SyntaxKind::TypeOperator
    );
    add_method!(
        add_source_file,
        get_source_file,
        source_files,
        SourceFileData,
        SyntaxKind::SourceFile
    );
}
