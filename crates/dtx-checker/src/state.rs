//! Checker state: import resolution, declared types, property extraction.
//!
//! The checker owns the type store and a string interner of its own; the
//! per-file parse arenas keep their identifiers, and names cross into the
//! checker's atom space during lowering. Type-alias references are expanded
//! to their structural form as they are lowered, so an extracted property
//! type renders fully spelled out.

use crate::format::TypeFormatter;
use crate::program::Program;
use crate::types::{
    FunctionShape, IndexInfo, ObjectShape, ParamInfo, PropertyInfo, TypeData, TypeId, TypeInterner,
};
use dtx_binder::{SymbolId, symbol_flags};
use dtx_common::interner::Interner;
use dtx_common::{ResolveError, Result};
use dtx_parser::{NodeIndex, node::LiteralTypeKind};
use dtx_scanner::SyntaxKind;
use rustc_hash::FxHashSet;

/// Alias chains longer than this are treated as unresolvable.
const MAX_ALIAS_HOPS: usize = 32;

/// Reference expansion deeper than this falls back to the reference name.
/// The designated properties are shallow flag/union types; the limit exists
/// so a pathological upstream package cannot hang the build.
pub const MAX_EXPANSION_DEPTH: usize = 64;

/// An import specifier resolved to its alias symbol.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedImport {
    pub file: usize,
    pub symbol: SymbolId,
}

pub struct CheckerState {
    pub types: TypeInterner,
    pub strings: Interner,
    expansion_stack: Vec<(usize, NodeIndex)>,
}

impl Default for CheckerState {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckerState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            types: TypeInterner::new(),
            strings: Interner::new(),
            expansion_stack: Vec::new(),
        }
    }

    // =========================================================================
    // Import resolution
    // =========================================================================

    /// Find the import specifier binding `target` in the entry file.
    ///
    /// Scans top-level import declarations in source order; within each
    /// named-import clause, specifiers in order; the first whose local name
    /// matches wins. Duplicate imports of the same name are not expected and
    /// not specially handled.
    pub fn resolve_named_import(
        &self,
        program: &Program,
        target: &str,
    ) -> Result<ResolvedImport> {
        let entry = program.entry();
        let arena = &entry.arena;

        let statements = arena
            .get(entry.root)
            .and_then(|node| arena.get_source_file(node))
            .map(|file| file.statements.nodes.clone())
            .unwrap_or_default();

        for stmt_idx in statements {
            let Some(stmt) = arena.get(stmt_idx) else {
                continue;
            };
            if stmt.kind != SyntaxKind::ImportDeclaration {
                continue;
            }
            let Some(import) = arena.get_import_decl(stmt) else {
                continue;
            };
            for &spec_idx in &import.specifiers.nodes {
                let Some(spec_node) = arena.get(spec_idx) else {
                    continue;
                };
                let Some(spec) = arena.get_specifier(spec_node) else {
                    continue;
                };
                if arena.identifier_text(spec.name) != Some(target) {
                    continue;
                }
                if let Some(&symbol) = entry.binder.node_symbols.get(&spec_idx.0) {
                    tracing::debug!(target, "matched import specifier");
                    return Ok(ResolvedImport {
                        file: program.entry_index(),
                        symbol,
                    });
                }
            }
        }

        Err(ResolveError::SymbolNotFound {
            name: target.to_string(),
            file: entry.file_name.clone(),
        })
    }

    // =========================================================================
    // Declared types
    // =========================================================================

    /// The declared type of a symbol: the type of the thing an import refers
    /// to, not the type of the import statement.
    ///
    /// A broken alias chain degrades to a bare reference carrying the
    /// symbol's name; property lookup on it then reports the precise missing
    /// property rather than a generic resolution failure.
    pub fn declared_type_of_symbol(
        &mut self,
        program: &Program,
        file: usize,
        symbol: SymbolId,
    ) -> TypeId {
        let (is_alias, name) = {
            let sym = program.file(file).binder.symbol(symbol);
            (sym.is_alias(), sym.name.clone())
        };

        if is_alias {
            match resolve_alias(program, file, symbol) {
                Some((decl_file, decl_symbol)) => {
                    self.lower_symbol_declaration(program, decl_file, decl_symbol)
                }
                None => {
                    tracing::warn!(name, "import did not resolve to a declaration");
                    self.named_reference(&name)
                }
            }
        } else {
            self.lower_symbol_declaration(program, file, symbol)
        }
    }

    fn named_reference(&mut self, name: &str) -> TypeId {
        let atom = self.strings.intern(name);
        let args = self.types.intern_list(Vec::new());
        self.types.intern(TypeData::Reference { name: atom, args })
    }

    fn lower_symbol_declaration(
        &mut self,
        program: &Program,
        file: usize,
        symbol: SymbolId,
    ) -> TypeId {
        let (flags, declaration, name) = {
            let sym = program.file(file).binder.symbol(symbol);
            (sym.flags, sym.declaration, sym.name.clone())
        };

        if flags & symbol_flags::INTERFACE != 0 {
            self.lower_interface(program, file, declaration)
        } else if flags & symbol_flags::TYPE_ALIAS != 0 {
            let type_node = {
                let arena = &program.file(file).arena;
                arena
                    .get(declaration)
                    .and_then(|node| arena.get_type_alias(node))
                    .map(|alias| alias.type_node)
            };
            match type_node {
                Some(type_node) => self.lower_type(program, file, type_node),
                None => self.named_reference(&name),
            }
        } else {
            self.named_reference(&name)
        }
    }

    fn lower_interface(&mut self, program: &Program, file: usize, decl: NodeIndex) -> TypeId {
        let (members, heritage) = {
            let arena = &program.file(file).arena;
            let Some(iface) = arena.get(decl).and_then(|node| arena.get_interface(node)) else {
                return TypeId::ANY;
            };
            (iface.members.nodes.clone(), iface.heritage.nodes.clone())
        };

        let mut shape = ObjectShape::default();
        for member in members {
            self.lower_member(program, file, member, &mut shape);
        }

        // Inherited properties come after own ones and never shadow them.
        for heritage_ref in heritage {
            let base = self.lower_type(program, file, heritage_ref);
            let base_shape = match self.types.lookup(base) {
                TypeData::Object(id) => Some(*id),
                _ => None,
            };
            if let Some(base_shape) = base_shape {
                let base_props = self.types.object_shape(base_shape).properties.clone();
                for prop in base_props {
                    if !shape.properties.iter().any(|p| p.name == prop.name) {
                        shape.properties.push(prop);
                    }
                }
            }
        }

        let shape_id = self.types.add_object_shape(shape);
        self.types.intern(TypeData::Object(shape_id))
    }

    fn lower_member(
        &mut self,
        program: &Program,
        file: usize,
        member: NodeIndex,
        shape: &mut ObjectShape,
    ) {
        enum Member {
            Property {
                name: String,
                optional: bool,
                readonly: bool,
                type_node: NodeIndex,
            },
            Index {
                key: NodeIndex,
                value: NodeIndex,
            },
        }

        let lowered = {
            let arena = &program.file(file).arena;
            let Some(node) = arena.get(member) else {
                return;
            };
            if let Some(prop) = arena.get_property_signature(node) {
                let Some(name) = arena.identifier_text(prop.name) else {
                    return;
                };
                Some(Member::Property {
                    name: name.to_string(),
                    optional: prop.optional,
                    readonly: prop.readonly,
                    type_node: prop.type_node,
                })
            } else if let Some(index) = arena.get_index_signature(node) {
                Some(Member::Index {
                    key: index.key_type,
                    value: index.value_type,
                })
            } else {
                None
            }
        };

        match lowered {
            Some(Member::Property {
                name,
                optional,
                readonly,
                type_node,
            }) => {
                let type_id = if type_node.is_none() {
                    TypeId::ANY
                } else {
                    self.lower_type(program, file, type_node)
                };
                let atom = self.strings.intern(&name);
                shape.properties.push(PropertyInfo {
                    name: atom,
                    optional,
                    readonly,
                    type_id,
                });
            }
            Some(Member::Index { key, value }) => {
                let key = self.lower_type(program, file, key);
                let value = self.lower_type(program, file, value);
                shape.index = Some(IndexInfo { key, value });
            }
            None => {}
        }
    }

    // =========================================================================
    // Type lowering
    // =========================================================================

    pub fn lower_type(&mut self, program: &Program, file: usize, idx: NodeIndex) -> TypeId {
        let Some(kind) = program.file(file).arena.get(idx).map(|node| node.kind) else {
            return TypeId::ANY;
        };

        match kind {
            SyntaxKind::AnyKeyword => TypeId::ANY,
            SyntaxKind::UnknownKeyword => TypeId::UNKNOWN,
            SyntaxKind::NeverKeyword => TypeId::NEVER,
            SyntaxKind::VoidKeyword => TypeId::VOID,
            SyntaxKind::UndefinedKeyword => TypeId::UNDEFINED,
            SyntaxKind::NullKeyword => TypeId::NULL,
            SyntaxKind::BooleanKeyword => TypeId::BOOLEAN,
            SyntaxKind::NumberKeyword => TypeId::NUMBER,
            SyntaxKind::StringKeyword => TypeId::STRING,
            SyntaxKind::ObjectKeyword => TypeId::OBJECT,
            SyntaxKind::SymbolKeyword => TypeId::SYMBOL,
            SyntaxKind::BigIntKeyword => TypeId::BIGINT,
            SyntaxKind::LiteralType | SyntaxKind::OpaqueType => {
                self.lower_literal_type(program, file, idx, kind)
            }
            SyntaxKind::UnionType => {
                let members = self.lower_composite_members(program, file, idx);
                self.types.union(members)
            }
            SyntaxKind::IntersectionType => {
                let members = self.lower_composite_members(program, file, idx);
                let list = self.types.intern_list(members);
                self.types.intern(TypeData::Intersection(list))
            }
            SyntaxKind::ArrayType => {
                let inner = self.lower_wrapped_inner(program, file, idx);
                let elem = self.lower_type(program, file, inner);
                self.types.intern(TypeData::Array(elem))
            }
            SyntaxKind::RestType => {
                let inner = self.lower_wrapped_inner(program, file, idx);
                let elem = self.lower_type(program, file, inner);
                self.types.intern(TypeData::Rest(elem))
            }
            SyntaxKind::ParenthesizedType => {
                let inner = self.lower_wrapped_inner(program, file, idx);
                self.lower_type(program, file, inner)
            }
            SyntaxKind::TupleType => {
                let elements = {
                    let arena = &program.file(file).arena;
                    arena
                        .get(idx)
                        .and_then(|node| arena.get_tuple_type(node))
                        .map(|tuple| tuple.elements.nodes.clone())
                        .unwrap_or_default()
                };
                let lowered: Vec<TypeId> = elements
                    .into_iter()
                    .map(|elem| self.lower_type(program, file, elem))
                    .collect();
                let list = self.types.intern_list(lowered);
                self.types.intern(TypeData::Tuple(list))
            }
            SyntaxKind::TypeLiteral => {
                let members = {
                    let arena = &program.file(file).arena;
                    arena
                        .get(idx)
                        .and_then(|node| arena.get_type_literal(node))
                        .map(|literal| literal.members.nodes.clone())
                        .unwrap_or_default()
                };
                let mut shape = ObjectShape::default();
                for member in members {
                    self.lower_member(program, file, member, &mut shape);
                }
                let shape_id = self.types.add_object_shape(shape);
                self.types.intern(TypeData::Object(shape_id))
            }
            SyntaxKind::FunctionType => self.lower_function_type(program, file, idx),
            SyntaxKind::TypeReference => self.lower_type_reference(program, file, idx),
            SyntaxKind::IndexedAccessType => self.lower_indexed_access(program, file, idx),
            SyntaxKind::TypeOperator => self.lower_type_operator(program, file, idx),
            _ => TypeId::ANY,
        }
    }

    fn lower_literal_type(
        &mut self,
        program: &Program,
        file: usize,
        idx: NodeIndex,
        kind: SyntaxKind,
    ) -> TypeId {
        let (literal_kind, text) = {
            let arena = &program.file(file).arena;
            let Some(data) = arena.get(idx).and_then(|node| arena.get_literal_type(node)) else {
                return TypeId::ANY;
            };
            (data.literal_kind, data.text.clone())
        };

        if kind == SyntaxKind::OpaqueType {
            let atom = self.strings.intern(&text);
            return self.types.intern(TypeData::Opaque(atom));
        }

        match literal_kind {
            LiteralTypeKind::String => {
                let atom = self.strings.intern(&text);
                self.types.intern(TypeData::StringLiteral(atom))
            }
            LiteralTypeKind::Number => {
                let atom = self.strings.intern(&text);
                self.types.intern(TypeData::NumberLiteral(atom))
            }
            LiteralTypeKind::Boolean => self.types.intern(TypeData::BooleanLiteral(text == "true")),
        }
    }

    fn lower_composite_members(
        &mut self,
        program: &Program,
        file: usize,
        idx: NodeIndex,
    ) -> Vec<TypeId> {
        let members = {
            let arena = &program.file(file).arena;
            arena
                .get(idx)
                .and_then(|node| arena.get_composite_type(node))
                .map(|composite| composite.types.nodes.clone())
                .unwrap_or_default()
        };
        members
            .into_iter()
            .map(|member| self.lower_type(program, file, member))
            .collect()
    }

    fn lower_wrapped_inner(&self, program: &Program, file: usize, idx: NodeIndex) -> NodeIndex {
        let arena = &program.file(file).arena;
        arena
            .get(idx)
            .and_then(|node| arena.get_wrapped_type(node))
            .map(|wrapped| wrapped.inner)
            .unwrap_or(NodeIndex::NONE)
    }

    fn lower_function_type(&mut self, program: &Program, file: usize, idx: NodeIndex) -> TypeId {
        let (params, return_type, is_constructor) = {
            let arena = &program.file(file).arena;
            let Some(func) = arena.get(idx).and_then(|node| arena.get_function_type(node))
            else {
                return TypeId::ANY;
            };
            (
                func.params.nodes.clone(),
                func.return_type,
                func.is_constructor,
            )
        };

        let mut lowered_params = Vec::with_capacity(params.len());
        for param_idx in params {
            let (name, optional, rest, type_node) = {
                let arena = &program.file(file).arena;
                let Some(param) = arena
                    .get(param_idx)
                    .and_then(|node| arena.get_parameter(node))
                else {
                    continue;
                };
                (
                    arena.identifier_text(param.name).map(str::to_string),
                    param.optional,
                    param.rest,
                    param.type_node,
                )
            };
            let type_id = if type_node.is_none() {
                TypeId::ANY
            } else {
                self.lower_type(program, file, type_node)
            };
            let name = name.map(|name| self.strings.intern(&name));
            lowered_params.push(ParamInfo {
                name,
                optional,
                rest,
                type_id,
            });
        }

        let return_type = if return_type.is_none() {
            TypeId::ANY
        } else {
            self.lower_type(program, file, return_type)
        };

        let shape_id = self.types.add_function_shape(FunctionShape {
            params: lowered_params,
            return_type,
            is_constructor,
        });
        self.types.intern(TypeData::Function(shape_id))
    }

    fn lower_type_reference(&mut self, program: &Program, file: usize, idx: NodeIndex) -> TypeId {
        let (name, arg_nodes) = {
            let arena = &program.file(file).arena;
            let Some(type_ref) = arena.get(idx).and_then(|node| arena.get_type_ref(node)) else {
                return TypeId::ANY;
            };
            (
                arena.interner().resolve(type_ref.name).to_string(),
                type_ref.type_args.nodes.clone(),
            )
        };

        // Built-in array forms expand structurally.
        if (name == "Array" || name == "ReadonlyArray") && arg_nodes.len() == 1 {
            let elem = self.lower_type(program, file, arg_nodes[0]);
            let array = self.types.intern(TypeData::Array(elem));
            return if name == "ReadonlyArray" {
                self.types.intern(TypeData::Readonly(array))
            } else {
                array
            };
        }

        let resolved = program
            .file(file)
            .binder
            .local(&name)
            .and_then(|symbol| resolve_alias(program, file, symbol));

        let Some((decl_file, decl_symbol)) = resolved else {
            return self.unexpanded_reference(program, file, &name, &arg_nodes);
        };

        let (declaration, type_param_count) = {
            let source = program.file(decl_file);
            let sym = source.binder.symbol(decl_symbol);
            let declaration = sym.declaration;
            let arena = &source.arena;
            let count = arena
                .get(declaration)
                .and_then(|node| {
                    arena
                        .get_interface(node)
                        .map(|iface| iface.type_param_count)
                        .or_else(|| {
                            arena
                                .get_type_alias(node)
                                .map(|alias| alias.type_param_count)
                        })
                })
                .unwrap_or(0);
            (declaration, count)
        };

        // Generic declarations are not instantiated; the application renders
        // by name with its arguments.
        if type_param_count > 0 && !arg_nodes.is_empty() {
            return self.unexpanded_reference(program, file, &name, &arg_nodes);
        }

        let key = (decl_file, declaration);
        if self.expansion_stack.contains(&key) || self.expansion_stack.len() >= MAX_EXPANSION_DEPTH
        {
            // Self-referential alias: keep the name instead of diverging.
            return self.unexpanded_reference(program, file, &name, &arg_nodes);
        }

        self.expansion_stack.push(key);
        let lowered = self.lower_symbol_declaration(program, decl_file, decl_symbol);
        self.expansion_stack.pop();
        lowered
    }

    fn unexpanded_reference(
        &mut self,
        program: &Program,
        file: usize,
        name: &str,
        arg_nodes: &[NodeIndex],
    ) -> TypeId {
        let args: Vec<TypeId> = arg_nodes
            .iter()
            .map(|&arg| self.lower_type(program, file, arg))
            .collect();
        let atom = self.strings.intern(name);
        let args = self.types.intern_list(args);
        self.types.intern(TypeData::Reference { name: atom, args })
    }

    fn lower_indexed_access(&mut self, program: &Program, file: usize, idx: NodeIndex) -> TypeId {
        let parts = {
            let arena = &program.file(file).arena;
            arena
                .get(idx)
                .and_then(|node| arena.get_composite_type(node))
                .map(|composite| composite.types.nodes.clone())
                .unwrap_or_default()
        };
        if parts.len() != 2 {
            return TypeId::ANY;
        }

        let object = self.lower_type(program, file, parts[0]);
        let index = self.lower_type(program, file, parts[1]);

        // `O['k']` with a literal key resolves to the property type.
        let literal_key = match self.types.lookup(index) {
            TypeData::StringLiteral(key) => Some(*key),
            _ => None,
        };
        if let Some(key) = literal_key {
            let key_text = self.strings.resolve(key).to_string();
            if let Some(found) = self.property_type(object, key_text) {
                return found;
            }
        }

        let text = {
            let formatter = TypeFormatter::new(&self.types, &self.strings);
            format!("{}[{}]", formatter.format(object), formatter.format(index))
        };
        let atom = self.strings.intern(&text);
        self.types.intern(TypeData::Opaque(atom))
    }

    fn lower_type_operator(&mut self, program: &Program, file: usize, idx: NodeIndex) -> TypeId {
        let (operator, operand) = {
            let arena = &program.file(file).arena;
            let Some(op) = arena.get(idx).and_then(|node| arena.get_type_operator(node)) else {
                return TypeId::ANY;
            };
            (op.operator, op.operand)
        };

        match operator {
            SyntaxKind::KeyofKeyword => {
                let target = self.lower_type(program, file, operand);
                let shape = match self.types.lookup(target) {
                    TypeData::Object(id) => Some(*id),
                    _ => None,
                };
                match shape {
                    Some(shape) => {
                        let names: Vec<_> = self
                            .types
                            .object_shape(shape)
                            .properties
                            .iter()
                            .map(|prop| prop.name)
                            .collect();
                        let members: Vec<TypeId> = names
                            .into_iter()
                            .map(|name| self.types.intern(TypeData::StringLiteral(name)))
                            .collect();
                        self.types.union(members)
                    }
                    None => {
                        let text = {
                            let formatter = TypeFormatter::new(&self.types, &self.strings);
                            format!("keyof {}", formatter.format(target))
                        };
                        let atom = self.strings.intern(&text);
                        self.types.intern(TypeData::Opaque(atom))
                    }
                }
            }
            SyntaxKind::TypeofKeyword => {
                // `typeof x` refers to a value's type, which the declaration
                // subset does not model; carried verbatim.
                let name = {
                    let arena = &program.file(file).arena;
                    arena
                        .get(operand)
                        .and_then(|node| arena.get_type_ref(node))
                        .map(|type_ref| arena.interner().resolve(type_ref.name).to_string())
                };
                let text = match name {
                    Some(name) => format!("typeof {name}"),
                    None => "typeof".to_string(),
                };
                let atom = self.strings.intern(&text);
                self.types.intern(TypeData::Opaque(atom))
            }
            SyntaxKind::ReadonlyKeyword => {
                let inner = self.lower_type(program, file, operand);
                self.types.intern(TypeData::Readonly(inner))
            }
            _ => TypeId::ANY,
        }
    }

    // =========================================================================
    // Property extraction
    // =========================================================================

    /// Look up a property by exact name. On unions the property must exist
    /// on every member; the result is the union of the member types.
    pub fn property_type(&mut self, type_id: TypeId, property: String) -> Option<TypeId> {
        let data = self.types.lookup(type_id).clone();
        match data {
            TypeData::Object(shape_id) => {
                let shape = self.types.object_shape(shape_id);
                shape
                    .properties
                    .iter()
                    .find(|prop| self.strings.resolve(prop.name) == property)
                    .map(|prop| prop.type_id)
            }
            TypeData::Intersection(list) => {
                let members = self.types.type_list(list).to_vec();
                members
                    .into_iter()
                    .find_map(|member| self.property_type(member, property.clone()))
            }
            TypeData::Union(list) => {
                let members = self.types.type_list(list).to_vec();
                let mut collected = Vec::with_capacity(members.len());
                for member in members {
                    collected.push(self.property_type(member, property.clone())?);
                }
                Some(self.types.union(collected))
            }
            _ => None,
        }
    }

    /// Render one property's type as source text.
    ///
    /// Missing properties are a hard error: the designated type surface is
    /// expected to be stable, and a renamed property upstream must stop the
    /// build instead of silently emitting `any`.
    pub fn property_type_text(
        &mut self,
        type_id: TypeId,
        property: &str,
        type_name: &str,
    ) -> Result<String> {
        let Some(found) = self.property_type(type_id, property.to_string()) else {
            return Err(ResolveError::PropertyNotFound {
                property: property.to_string(),
                type_name: type_name.to_string(),
            });
        };
        let formatter = TypeFormatter::new(&self.types, &self.strings);
        Ok(formatter.format(found))
    }
}

// =============================================================================
// Alias resolution
// =============================================================================

/// Follow an alias symbol to the declaration it ultimately refers to.
fn resolve_alias(
    program: &Program,
    file: usize,
    symbol: SymbolId,
) -> Option<(usize, SymbolId)> {
    let mut current = (file, symbol);
    for _ in 0..MAX_ALIAS_HOPS {
        let sym = program.file(current.0).binder.symbol(current.1);
        if !sym.is_alias() {
            return Some(current);
        }
        let module = sym.import_module.as_deref()?;
        let import_name = sym.import_name.as_deref().unwrap_or(&sym.name);
        let target_file = program.resolve_module(module, current.0)?;
        let mut visited = FxHashSet::default();
        current = resolve_export(program, target_file, import_name, &mut visited)?;
    }
    None
}

/// Find an export by name, looking through `export * from` chains.
fn resolve_export(
    program: &Program,
    file: usize,
    name: &str,
    visited: &mut FxHashSet<(usize, String)>,
) -> Option<(usize, SymbolId)> {
    if !visited.insert((file, name.to_string())) {
        return None;
    }
    if let Some(symbol) = program.file(file).binder.export(name) {
        return Some((file, symbol));
    }
    for specifier in &program.file(file).binder.star_exports {
        if let Some(target) = program.resolve_module(specifier, file)
            && let Some(found) = resolve_export(program, target, name, visited)
        {
            return Some(found);
        }
    }
    None
}
