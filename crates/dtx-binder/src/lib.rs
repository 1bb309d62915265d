//! Name binder for the dtx declaration tool.
//!
//! Walks a parsed source file and produces symbols: interface and type-alias
//! declarations, plus alias symbols for import and re-export specifiers.
//! Alias symbols carry the module specifier and the original exported name
//! so the checker can resolve them across files.

use dtx_parser::{NodeArena, NodeIndex};
use dtx_scanner::SyntaxKind;
use rustc_hash::FxHashMap;

/// Symbol classification flags.
pub mod symbol_flags {
    pub const ALIAS: u32 = 1 << 0;
    pub const INTERFACE: u32 = 1 << 1;
    pub const TYPE_ALIAS: u32 = 1 << 2;
}

/// Index of a symbol inside its `BinderState`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SymbolId(pub u32);

/// A semantic binding from a name to its declaration site.
#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: String,
    pub flags: u32,
    /// Declaring node: the interface/alias declaration, or the specifier for
    /// import aliases.
    pub declaration: NodeIndex,
    pub is_exported: bool,
    pub is_type_only: bool,
    /// Module specifier this alias imports from, if any.
    pub import_module: Option<String>,
    /// Original exported name in the source module (`foo` in
    /// `import { foo as bar }`).
    pub import_name: Option<String>,
}

impl Symbol {
    #[must_use]
    pub fn is_alias(&self) -> bool {
        self.flags & symbol_flags::ALIAS != 0
    }
}

/// Per-file binder output.
#[derive(Debug, Default)]
pub struct BinderState {
    symbols: Vec<Symbol>,
    /// All file-level bindings by local name (declarations and imports).
    pub file_locals: FxHashMap<String, SymbolId>,
    /// Exported bindings by exported name.
    pub exports: FxHashMap<String, SymbolId>,
    /// Module specifiers of `export * from '...'` declarations, source order.
    pub star_exports: Vec<String>,
    /// Node index -> symbol, for declaring nodes and import specifiers.
    pub node_symbols: FxHashMap<u32, SymbolId>,
}

impl BinderState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    #[must_use]
    pub fn local(&self, name: &str) -> Option<SymbolId> {
        self.file_locals.get(name).copied()
    }

    #[must_use]
    pub fn export(&self, name: &str) -> Option<SymbolId> {
        self.exports.get(name).copied()
    }

    fn declare_symbol(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        // First declaration wins, matching the first-match import scan:
        // duplicates are not expected and not specially handled.
        self.file_locals
            .entry(symbol.name.clone())
            .or_insert(id);
        if symbol.is_exported {
            self.exports.entry(symbol.name.clone()).or_insert(id);
        }
        self.symbols.push(symbol);
        id
    }

    /// Bind every statement of a parsed source file.
    pub fn bind_source_file(&mut self, arena: &NodeArena, root: NodeIndex) {
        let Some(root_node) = arena.get(root) else {
            return;
        };
        let Some(file) = arena.get_source_file(root_node) else {
            return;
        };

        // Declarations and imports hoist: bind them before export clauses so
        // `export { Foo }` works regardless of where Foo is declared.
        for &stmt_idx in &file.statements.nodes {
            let Some(stmt) = arena.get(stmt_idx) else {
                continue;
            };
            match stmt.kind {
                SyntaxKind::ImportDeclaration => self.bind_import_declaration(arena, stmt),
                SyntaxKind::InterfaceDeclaration => {
                    self.bind_interface_declaration(arena, stmt, stmt_idx);
                }
                SyntaxKind::TypeAliasDeclaration => {
                    self.bind_type_alias_declaration(arena, stmt, stmt_idx);
                }
                _ => {}
            }
        }
        for &stmt_idx in &file.statements.nodes {
            let Some(stmt) = arena.get(stmt_idx) else {
                continue;
            };
            if stmt.kind == SyntaxKind::ExportDeclaration {
                self.bind_export_declaration(arena, stmt);
            }
        }
        tracing::debug!(
            symbols = self.symbols.len(),
            exports = self.exports.len(),
            "bound source file"
        );
    }

    fn bind_import_declaration(&mut self, arena: &NodeArena, node: &dtx_parser::Node) {
        let Some(import) = arena.get_import_decl(node) else {
            return;
        };
        let module_specifier = arena
            .get(import.module_specifier)
            .and_then(|spec_node| arena.get_literal(spec_node))
            .map(|lit| lit.text.clone());

        for &spec_idx in &import.specifiers.nodes {
            let Some(spec_node) = arena.get(spec_idx) else {
                continue;
            };
            let Some(spec) = arena.get_specifier(spec_node) else {
                continue;
            };
            let Some(local_name) = arena.identifier_text(spec.name) else {
                continue;
            };
            // For renamed imports (import { foo as bar }), track the original
            // name; otherwise the local name doubles as the imported name.
            let import_name = if spec.property_name.is_none() {
                Some(local_name.to_string())
            } else {
                arena.identifier_text(spec.property_name).map(str::to_string)
            };

            let sym_id = self.declare_symbol(Symbol {
                name: local_name.to_string(),
                flags: symbol_flags::ALIAS,
                declaration: spec_idx,
                is_exported: false,
                is_type_only: import.is_type_only || spec.is_type_only,
                import_module: module_specifier.clone(),
                import_name,
            });
            self.node_symbols.insert(spec_idx.0, sym_id);
        }
    }

    fn bind_export_declaration(&mut self, arena: &NodeArena, node: &dtx_parser::Node) {
        let Some(export) = arena.get_export_decl(node) else {
            return;
        };
        let module_specifier = arena
            .get(export.module_specifier)
            .and_then(|spec_node| arena.get_literal(spec_node))
            .map(|lit| lit.text.clone());

        if export.is_star {
            if let Some(specifier) = module_specifier {
                self.star_exports.push(specifier);
            }
            return;
        }

        for &spec_idx in &export.specifiers.nodes {
            let Some(spec_node) = arena.get(spec_idx) else {
                continue;
            };
            let Some(spec) = arena.get_specifier(spec_node) else {
                continue;
            };
            let Some(exported_name) = arena.identifier_text(spec.name) else {
                continue;
            };

            if let Some(specifier) = module_specifier.clone() {
                // Re-export: alias into another module under the exported name.
                let import_name = if spec.property_name.is_none() {
                    Some(exported_name.to_string())
                } else {
                    arena.identifier_text(spec.property_name).map(str::to_string)
                };
                let id = SymbolId(self.symbols.len() as u32);
                self.exports.entry(exported_name.to_string()).or_insert(id);
                self.symbols.push(Symbol {
                    name: exported_name.to_string(),
                    flags: symbol_flags::ALIAS,
                    declaration: spec_idx,
                    is_exported: true,
                    is_type_only: spec.is_type_only,
                    import_module: Some(specifier),
                    import_name,
                });
            } else {
                // Local export clause: mark the existing local as exported.
                let local_name = if spec.property_name.is_none() {
                    exported_name
                } else {
                    arena.identifier_text(spec.property_name).unwrap_or(exported_name)
                };
                if let Some(&local_id) = self.file_locals.get(local_name) {
                    self.exports.entry(exported_name.to_string()).or_insert(local_id);
                }
            }
        }
    }

    fn bind_interface_declaration(
        &mut self,
        arena: &NodeArena,
        node: &dtx_parser::Node,
        idx: NodeIndex,
    ) {
        let Some(iface) = arena.get_interface(node) else {
            return;
        };
        let Some(name) = arena.identifier_text(iface.name) else {
            return;
        };
        self.declare_symbol(Symbol {
            name: name.to_string(),
            flags: symbol_flags::INTERFACE,
            declaration: idx,
            is_exported: iface.is_exported,
            is_type_only: false,
            import_module: None,
            import_name: None,
        });
    }

    fn bind_type_alias_declaration(
        &mut self,
        arena: &NodeArena,
        node: &dtx_parser::Node,
        idx: NodeIndex,
    ) {
        let Some(alias) = arena.get_type_alias(node) else {
            return;
        };
        let Some(name) = arena.identifier_text(alias.name) else {
            return;
        };
        self.declare_symbol(Symbol {
            name: name.to_string(),
            flags: symbol_flags::TYPE_ALIAS,
            declaration: idx,
            is_exported: alias.is_exported,
            is_type_only: false,
            import_module: None,
            import_name: None,
        });
    }
}
