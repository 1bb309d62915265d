//! Parser state - token management and statement-level parsing.
//!
//! The parser is deliberately tolerant: the entry file and the external
//! package's declarations may contain constructs the tool has no use for
//! (classes, functions, const declarations). Anything unrecognized is
//! skipped at a statement boundary rather than failing the run.

use crate::node::*;
use crate::node_arena::NodeArena;
use dtx_scanner::{ScannerState, SyntaxKind};

pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub(crate) arena: NodeArena,
    pub(crate) current_token: SyntaxKind,
    file_name: String,
    errors: Vec<(u32, String)>,
}

impl ParserState {
    #[must_use]
    pub fn new(file_name: String, source: String) -> Self {
        let mut scanner = ScannerState::new(source);
        let current_token = scanner.scan();
        Self {
            scanner,
            arena: NodeArena::new(),
            current_token,
            file_name,
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn get_arena(&self) -> &NodeArena {
        &self.arena
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn errors(&self) -> &[(u32, String)] {
        &self.errors
    }

    /// Consume the parser, yielding the arena for long-term storage.
    #[must_use]
    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.current_token = self.scanner.scan();
        self.current_token
    }

    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.current_token == kind
    }

    pub(crate) fn token_pos(&self) -> u32 {
        self.scanner.token_pos()
    }

    pub(crate) fn token_end(&self) -> u32 {
        self.scanner.token_end()
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            self.error(format!(
                "expected {kind:?}, found {:?}",
                self.current_token
            ));
            false
        }
    }

    pub(crate) fn error(&mut self, message: String) {
        self.errors.push((self.token_pos(), message));
    }

    pub(crate) fn is_identifier_or_keyword(&self) -> bool {
        self.current_token == SyntaxKind::Identifier || self.current_token.is_keyword()
    }

    /// Parse an identifier, accepting keywords in identifier position.
    pub(crate) fn parse_identifier_name(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let end = self.token_end();
        if self.is_identifier_or_keyword() {
            let text = self.scanner.token_value_ref().to_string();
            self.next_token();
            self.arena.add_identifier(pos, end, &text)
        } else {
            self.error(format!("expected identifier, found {:?}", self.current_token));
            self.arena.add_identifier(pos, pos, "")
        }
    }

    /// Parse a dotted entity name (`A.B.C`), returning the joined text.
    pub(crate) fn parse_entity_name_text(&mut self) -> String {
        let mut text = String::new();
        if self.is_identifier_or_keyword() {
            text.push_str(self.scanner.token_value_ref());
            self.next_token();
        }
        while self.is_token(SyntaxKind::DotToken) {
            self.next_token();
            if self.is_identifier_or_keyword() {
                text.push('.');
                text.push_str(self.scanner.token_value_ref());
                self.next_token();
            } else {
                break;
            }
        }
        text
    }

    // =========================================================================
    // Recovery
    // =========================================================================

    /// Skip to the end of the current statement: past the next `;` at brace
    /// depth zero, or past a top-level `{...}` block.
    pub(crate) fn skip_statement(&mut self) {
        let mut depth: u32 = 0;
        loop {
            match self.current_token {
                SyntaxKind::EndOfFileToken => return,
                SyntaxKind::OpenBraceToken => {
                    depth += 1;
                    self.next_token();
                }
                SyntaxKind::CloseBraceToken => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    self.next_token();
                    if depth == 0 {
                        self.parse_optional(SyntaxKind::SemicolonToken);
                        return;
                    }
                }
                SyntaxKind::SemicolonToken => {
                    self.next_token();
                    if depth == 0 {
                        return;
                    }
                }
                _ => {
                    self.next_token();
                }
            }
        }
    }

    /// Skip a balanced `<...>` section (type parameter lists), returning the
    /// number of top-level entries.
    pub(crate) fn skip_type_parameters(&mut self) -> u32 {
        if !self.is_token(SyntaxKind::LessThanToken) {
            return 0;
        }
        self.next_token();
        let mut depth: u32 = 1;
        let mut count: u32 = 1;
        loop {
            match self.current_token {
                SyntaxKind::EndOfFileToken => return count,
                SyntaxKind::LessThanToken => {
                    depth += 1;
                    self.next_token();
                }
                SyntaxKind::GreaterThanToken => {
                    depth -= 1;
                    self.next_token();
                    if depth == 0 {
                        return count;
                    }
                }
                SyntaxKind::CommaToken => {
                    if depth == 1 {
                        count += 1;
                    }
                    self.next_token();
                }
                _ => {
                    self.next_token();
                }
            }
        }
    }

    // =========================================================================
    // Source file and statements
    // =========================================================================

    pub fn parse_source_file(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let mut statements = NodeList::new();
        while !self.is_token(SyntaxKind::EndOfFileToken) {
            let before = self.token_pos();
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            // Guarantee forward progress on malformed input.
            if self.token_pos() == before && !self.is_token(SyntaxKind::EndOfFileToken) {
                self.next_token();
            }
        }
        let end = self.token_end();
        tracing::debug!(
            file = %self.file_name,
            statements = statements.len(),
            errors = self.errors.len(),
            "parsed source file"
        );
        self.arena
            .add_source_file(SyntaxKind::SourceFile, pos, end, SourceFileData { statements })
    }

    fn parse_statement(&mut self) -> Option<NodeIndex> {
        match self.current_token {
            SyntaxKind::ImportKeyword => Some(self.parse_import_declaration()),
            SyntaxKind::ExportKeyword => self.parse_export_statement(),
            SyntaxKind::InterfaceKeyword => Some(self.parse_interface_declaration(false)),
            SyntaxKind::TypeKeyword => Some(self.parse_type_alias_declaration(false)),
            SyntaxKind::DeclareKeyword => {
                // `declare` prefixes are transparent for the declarations we
                // model; ambient module/namespace bodies are skipped whole.
                self.next_token();
                match self.current_token {
                    SyntaxKind::InterfaceKeyword => Some(self.parse_interface_declaration(false)),
                    SyntaxKind::TypeKeyword => Some(self.parse_type_alias_declaration(false)),
                    _ => {
                        self.skip_statement();
                        None
                    }
                }
            }
            SyntaxKind::SemicolonToken => {
                self.next_token();
                None
            }
            _ => {
                self.skip_statement();
                None
            }
        }
    }

    // =========================================================================
    // Imports / exports
    // =========================================================================

    fn parse_import_declaration(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token(); // import

        // Side-effect import: `import 'mod';`
        if self.is_token(SyntaxKind::StringLiteral) {
            let module_specifier = self.parse_module_specifier();
            let end = self.token_end();
            self.parse_optional(SyntaxKind::SemicolonToken);
            return self.arena.add_import_decl(
                SyntaxKind::ImportDeclaration,
                pos,
                end,
                ImportDeclData {
                    is_type_only: false,
                    specifiers: NodeList::new(),
                    module_specifier,
                },
            );
        }

        let is_type_only = self.is_token(SyntaxKind::TypeKeyword) && {
            self.next_token();
            true
        };

        let mut specifiers = NodeList::new();

        // Default binding: `import Foo from ...` / `import Foo, { ... } from ...`
        if self.is_token(SyntaxKind::Identifier) {
            self.parse_identifier_name();
            self.parse_optional(SyntaxKind::CommaToken);
        }

        if self.is_token(SyntaxKind::AsteriskToken) {
            // Namespace binding: `import * as ns from ...`
            self.next_token();
            self.parse_expected(SyntaxKind::AsKeyword);
            self.parse_identifier_name();
        } else if self.is_token(SyntaxKind::OpenBraceToken) {
            self.next_token();
            while !self.is_token(SyntaxKind::CloseBraceToken)
                && !self.is_token(SyntaxKind::EndOfFileToken)
            {
                let spec = self.parse_import_specifier();
                specifiers.push(spec);
                if !self.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            self.parse_expected(SyntaxKind::CloseBraceToken);
        }

        self.parse_expected(SyntaxKind::FromKeyword);
        let module_specifier = self.parse_module_specifier();
        let end = self.token_end();
        self.parse_optional(SyntaxKind::SemicolonToken);

        self.arena.add_import_decl(
            SyntaxKind::ImportDeclaration,
            pos,
            end,
            ImportDeclData {
                is_type_only,
                specifiers,
                module_specifier,
            },
        )
    }

    fn parse_import_specifier(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        // `{ type Foo }` inline type-only specifier. `type` followed by `,`,
        // `}` or `as` is a binding named "type", not a modifier.
        let is_type_only = if self.is_token(SyntaxKind::TypeKeyword) {
            let snapshot = self.scanner.save_state();
            let current = self.current_token;
            self.next_token();
            if self.is_identifier_or_keyword() {
                true
            } else {
                self.scanner.restore_state(snapshot);
                self.current_token = current;
                false
            }
        } else {
            false
        };

        let first = self.parse_identifier_name();
        let (property_name, name) = if self.parse_optional(SyntaxKind::AsKeyword) {
            (first, self.parse_identifier_name())
        } else {
            (NodeIndex::NONE, first)
        };
        let end = self.token_end();

        self.arena.add_specifier(
            SyntaxKind::ImportSpecifier,
            pos,
            end,
            SpecifierData {
                property_name,
                name,
                is_type_only,
            },
        )
    }

    fn parse_module_specifier(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::StringLiteral) {
            let pos = self.token_pos();
            let end = self.token_end();
            let text = self.scanner.token_value_ref().to_string();
            self.next_token();
            self.arena
                .add_literal(SyntaxKind::StringLiteral, pos, end, LiteralData { text })
        } else {
            self.error("expected module specifier string".to_string());
            NodeIndex::NONE
        }
    }

    fn parse_export_statement(&mut self) -> Option<NodeIndex> {
        let pos = self.token_pos();
        self.next_token(); // export

        match self.current_token {
            SyntaxKind::InterfaceKeyword => Some(self.parse_interface_declaration(true)),
            SyntaxKind::TypeKeyword => {
                // `export type { ... } from` vs `export type X = ...`
                let snapshot = self.scanner.save_state();
                let current = self.current_token;
                self.next_token();
                if self.is_token(SyntaxKind::OpenBraceToken) {
                    Some(self.parse_export_clause(pos))
                } else {
                    self.scanner.restore_state(snapshot);
                    self.current_token = current;
                    Some(self.parse_type_alias_declaration(true))
                }
            }
            SyntaxKind::OpenBraceToken => Some(self.parse_export_clause(pos)),
            SyntaxKind::AsteriskToken => {
                // `export * from 'mod'` (with optional `as ns`, which the
                // tool does not model and skips).
                self.next_token();
                if self.parse_optional(SyntaxKind::AsKeyword) {
                    self.parse_identifier_name();
                    self.skip_statement();
                    return None;
                }
                self.parse_expected(SyntaxKind::FromKeyword);
                let module_specifier = self.parse_module_specifier();
                let end = self.token_end();
                self.parse_optional(SyntaxKind::SemicolonToken);
                Some(self.arena.add_export_decl(
                    SyntaxKind::ExportDeclaration,
                    pos,
                    end,
                    ExportDeclData {
                        specifiers: NodeList::new(),
                        module_specifier,
                        is_star: true,
                    },
                ))
            }
            SyntaxKind::DeclareKeyword => {
                self.next_token();
                match self.current_token {
                    SyntaxKind::InterfaceKeyword => Some(self.parse_interface_declaration(true)),
                    SyntaxKind::TypeKeyword => Some(self.parse_type_alias_declaration(true)),
                    _ => {
                        self.skip_statement();
                        None
                    }
                }
            }
            _ => {
                self.skip_statement();
                None
            }
        }
    }

    fn parse_export_clause(&mut self, pos: u32) -> NodeIndex {
        // current token is `{`
        self.next_token();
        let mut specifiers = NodeList::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let spec = self.parse_import_specifier();
            specifiers.push(spec);
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);

        let module_specifier = if self.parse_optional(SyntaxKind::FromKeyword) {
            self.parse_module_specifier()
        } else {
            NodeIndex::NONE
        };
        let end = self.token_end();
        self.parse_optional(SyntaxKind::SemicolonToken);

        self.arena.add_export_decl(
            SyntaxKind::ExportDeclaration,
            pos,
            end,
            ExportDeclData {
                specifiers,
                module_specifier,
                is_star: false,
            },
        )
    }

    // =========================================================================
    // Interface and type alias declarations
    // =========================================================================

    fn parse_interface_declaration(&mut self, is_exported: bool) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token(); // interface
        let name = self.parse_identifier_name();
        let type_param_count = self.skip_type_parameters();

        let mut heritage = NodeList::new();
        if self.parse_optional(SyntaxKind::ExtendsKeyword) {
            loop {
                let type_ref = self.parse_type_reference();
                heritage.push(type_ref);
                if !self.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
        }

        self.parse_expected(SyntaxKind::OpenBraceToken);
        let members = self.parse_type_members();
        let end = self.token_end();
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.parse_optional(SyntaxKind::SemicolonToken);

        self.arena.add_interface(
            SyntaxKind::InterfaceDeclaration,
            pos,
            end,
            InterfaceData {
                name,
                type_param_count,
                heritage,
                members,
                is_exported,
            },
        )
    }

    fn parse_type_alias_declaration(&mut self, is_exported: bool) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token(); // type
        let name = self.parse_identifier_name();
        let type_param_count = self.skip_type_parameters();
        self.parse_expected(SyntaxKind::EqualsToken);
        let type_node = self.parse_type();
        let end = self.token_end();
        self.parse_optional(SyntaxKind::SemicolonToken);

        self.arena.add_type_alias(
            SyntaxKind::TypeAliasDeclaration,
            pos,
            end,
            TypeAliasData {
                name,
                type_param_count,
                type_node,
                is_exported,
            },
        )
    }
}
