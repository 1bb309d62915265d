//! Parser state - type expression and type member parsing.

use crate::node::*;
use crate::state::ParserState;
use dtx_scanner::SyntaxKind;

impl ParserState {
    /// Parse a type (handles unions, intersections, postfix forms, and the
    /// primary type grammar of the declaration subset).
    pub(crate) fn parse_type(&mut self) -> NodeIndex {
        self.parse_union_type()
    }

    fn parse_union_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        // Leading `|` is allowed: `type T = | 'a' | 'b'`.
        self.parse_optional(SyntaxKind::BarToken);
        let first = self.parse_intersection_type();
        if !self.is_token(SyntaxKind::BarToken) {
            return first;
        }

        let mut types = NodeList::new();
        types.push(first);
        while self.parse_optional(SyntaxKind::BarToken) {
            types.push(self.parse_intersection_type());
        }
        let end = self.token_end();
        self.arena
            .add_composite_type(SyntaxKind::UnionType, pos, end, CompositeTypeData { types })
    }

    fn parse_intersection_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let first = self.parse_postfix_type();
        if !self.is_token(SyntaxKind::AmpersandToken) {
            return first;
        }

        let mut types = NodeList::new();
        types.push(first);
        while self.parse_optional(SyntaxKind::AmpersandToken) {
            types.push(self.parse_postfix_type());
        }
        let end = self.token_end();
        self.arena.add_composite_type(
            SyntaxKind::IntersectionType,
            pos,
            end,
            CompositeTypeData { types },
        )
    }

    /// Postfix forms: `T[]` (array) and `T[K]` (indexed access).
    fn parse_postfix_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let mut result = self.parse_primary_type();
        while self.is_token(SyntaxKind::OpenBracketToken) {
            self.next_token();
            if self.parse_optional(SyntaxKind::CloseBracketToken) {
                let end = self.token_end();
                result = self.arena.add_wrapped_type(
                    SyntaxKind::ArrayType,
                    pos,
                    end,
                    WrappedTypeData { inner: result },
                );
            } else {
                let index = self.parse_type();
                self.parse_expected(SyntaxKind::CloseBracketToken);
                let end = self.token_end();
                let mut types = NodeList::new();
                types.push(result);
                types.push(index);
                result = self.arena.add_composite_type(
                    SyntaxKind::IndexedAccessType,
                    pos,
                    end,
                    CompositeTypeData { types },
                );
            }
        }
        result
    }

    fn parse_primary_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let end = self.token_end();
        match self.current_token {
            kind if kind.is_intrinsic_type_keyword() => {
                self.next_token();
                self.arena.add_token(kind, pos, end)
            }
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                let text = if self.is_token(SyntaxKind::TrueKeyword) {
                    "true"
                } else {
                    "false"
                };
                self.next_token();
                self.arena.add_literal_type(
                    SyntaxKind::LiteralType,
                    pos,
                    end,
                    LiteralTypeData {
                        literal_kind: LiteralTypeKind::Boolean,
                        text: text.to_string(),
                    },
                )
            }
            SyntaxKind::StringLiteral => {
                let text = self.scanner.token_value_ref().to_string();
                self.next_token();
                self.arena.add_literal_type(
                    SyntaxKind::LiteralType,
                    pos,
                    end,
                    LiteralTypeData {
                        literal_kind: LiteralTypeKind::String,
                        text,
                    },
                )
            }
            SyntaxKind::NumericLiteral => {
                let text = self.scanner.token_value_ref().to_string();
                self.next_token();
                self.arena.add_literal_type(
                    SyntaxKind::LiteralType,
                    pos,
                    end,
                    LiteralTypeData {
                        literal_kind: LiteralTypeKind::Number,
                        text,
                    },
                )
            }
            SyntaxKind::MinusToken => {
                self.next_token();
                let mut text = String::from("-");
                if self.is_token(SyntaxKind::NumericLiteral) {
                    text.push_str(self.scanner.token_value_ref());
                    self.next_token();
                } else {
                    self.error("expected numeric literal after '-'".to_string());
                }
                let end = self.token_end();
                self.arena.add_literal_type(
                    SyntaxKind::LiteralType,
                    pos,
                    end,
                    LiteralTypeData {
                        literal_kind: LiteralTypeKind::Number,
                        text,
                    },
                )
            }
            SyntaxKind::KeyofKeyword | SyntaxKind::TypeofKeyword | SyntaxKind::ReadonlyKeyword => {
                let operator = self.current_token;
                self.next_token();
                let operand = if operator == SyntaxKind::TypeofKeyword {
                    self.parse_type_reference()
                } else {
                    self.parse_postfix_type()
                };
                let end = self.token_end();
                self.arena.add_type_operator(
                    SyntaxKind::TypeOperator,
                    pos,
                    end,
                    TypeOperatorData { operator, operand },
                )
            }
            SyntaxKind::OpenParenToken => {
                if self.is_function_type_start() {
                    self.parse_function_type(false)
                } else {
                    self.next_token();
                    let inner = self.parse_type();
                    self.parse_expected(SyntaxKind::CloseParenToken);
                    let end = self.token_end();
                    self.arena.add_wrapped_type(
                        SyntaxKind::ParenthesizedType,
                        pos,
                        end,
                        WrappedTypeData { inner },
                    )
                }
            }
            SyntaxKind::NewKeyword => {
                self.next_token();
                self.parse_function_type(true)
            }
            SyntaxKind::LessThanToken => {
                // Generic function type `<T>(x: T) => T`: type parameters are
                // skipped, the signature itself is kept.
                self.skip_type_parameters();
                self.parse_function_type(false)
            }
            SyntaxKind::OpenBraceToken => self.parse_type_literal(),
            SyntaxKind::OpenBracketToken => self.parse_tuple_type(),
            SyntaxKind::BacktickToken => self.parse_opaque_until_backtick(),
            _ if self.is_identifier_or_keyword() => self.parse_type_reference(),
            _ => {
                self.error(format!("expected type, found {:?}", self.current_token));
                let end = self.token_end();
                self.next_token();
                self.arena.add_token(SyntaxKind::Unknown, pos, end)
            }
        }
    }

    pub(crate) fn parse_type_reference(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let text = self.parse_entity_name_text();
        let name = self.arena.intern(&text);

        let mut type_args = NodeList::new();
        if self.is_token(SyntaxKind::LessThanToken) {
            self.next_token();
            while !self.is_token(SyntaxKind::GreaterThanToken)
                && !self.is_token(SyntaxKind::EndOfFileToken)
            {
                type_args.push(self.parse_type());
                if !self.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            self.parse_expected(SyntaxKind::GreaterThanToken);
        }

        let end = self.token_end();
        self.arena.add_type_ref(
            SyntaxKind::TypeReference,
            pos,
            end,
            TypeRefData { name, type_args },
        )
    }

    /// Decide whether `(` opens a function type header rather than a
    /// parenthesized type, by one-token lookahead past the paren.
    fn is_function_type_start(&mut self) -> bool {
        let snapshot = self.scanner.save_state();
        let current = self.current_token;

        self.next_token(); // past `(`
        let result = match self.current_token {
            SyntaxKind::CloseParenToken | SyntaxKind::DotDotDotToken => true,
            _ if self.is_identifier_or_keyword() => {
                self.next_token();
                matches!(
                    self.current_token,
                    SyntaxKind::ColonToken
                        | SyntaxKind::QuestionToken
                        | SyntaxKind::CommaToken
                        | SyntaxKind::CloseParenToken
                )
            }
            _ => false,
        };

        self.scanner.restore_state(snapshot);
        self.current_token = current;
        result
    }

    /// Parse `(params) => ReturnType`, assuming the caller positioned us at `(`.
    fn parse_function_type(&mut self, is_constructor: bool) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenParenToken);

        let mut params = NodeList::new();
        while !self.is_token(SyntaxKind::CloseParenToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            params.push(self.parse_parameter());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.parse_expected(SyntaxKind::EqualsGreaterThanToken);
        let return_type = self.parse_type();
        let end = self.token_end();

        self.arena.add_function_type(
            SyntaxKind::FunctionType,
            pos,
            end,
            FunctionTypeData {
                params,
                return_type,
                is_constructor,
            },
        )
    }

    fn parse_parameter(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let rest = self.parse_optional(SyntaxKind::DotDotDotToken);
        let name = self.parse_identifier_name();
        let optional = self.parse_optional(SyntaxKind::QuestionToken);
        let type_node = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        let end = self.token_end();

        self.arena.add_parameter(
            SyntaxKind::Parameter,
            pos,
            end,
            ParameterData {
                name,
                type_node,
                optional,
                rest,
            },
        )
    }

    fn parse_tuple_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token(); // [
        let mut elements = NodeList::new();
        while !self.is_token(SyntaxKind::CloseBracketToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.is_token(SyntaxKind::DotDotDotToken) {
                let rest_pos = self.token_pos();
                self.next_token();
                let inner = self.parse_type();
                let rest_end = self.token_end();
                elements.push(self.arena.add_wrapped_type(
                    SyntaxKind::RestType,
                    rest_pos,
                    rest_end,
                    WrappedTypeData { inner },
                ));
            } else {
                elements.push(self.parse_type());
            }
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        let end = self.token_end();
        self.parse_expected(SyntaxKind::CloseBracketToken);

        self.arena
            .add_tuple_type(SyntaxKind::TupleType, pos, end, TupleTypeData { elements })
    }

    fn parse_type_literal(&mut self) -> NodeIndex {
        let pos = self.token_pos();

        // Mapped types (`{ [K in T]: U }`) are outside the subset; capture
        // them verbatim so rendering stays faithful.
        if self.is_mapped_type_start() {
            return self.parse_opaque_braced();
        }

        self.next_token(); // {
        let members = self.parse_type_members();
        let end = self.token_end();
        self.parse_expected(SyntaxKind::CloseBraceToken);

        self.arena
            .add_type_literal(SyntaxKind::TypeLiteral, pos, end, TypeLiteralData { members })
    }

    fn is_mapped_type_start(&mut self) -> bool {
        let snapshot = self.scanner.save_state();
        let current = self.current_token;

        self.next_token(); // past `{`
        let mut result = false;
        if self.is_token(SyntaxKind::OpenBracketToken) {
            self.next_token();
            if self.is_identifier_or_keyword() {
                self.next_token();
                result = self.is_token(SyntaxKind::InKeyword);
            }
        }

        self.scanner.restore_state(snapshot);
        self.current_token = current;
        result
    }

    /// Capture a balanced `{...}` construct verbatim as an opaque type.
    fn parse_opaque_braced(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let mut end = self.token_end();
        let mut depth: u32 = 0;
        loop {
            match self.current_token {
                SyntaxKind::EndOfFileToken => break,
                SyntaxKind::OpenBraceToken => {
                    depth += 1;
                    self.next_token();
                }
                SyntaxKind::CloseBraceToken => {
                    depth -= 1;
                    end = self.token_end();
                    self.next_token();
                    if depth == 0 {
                        break;
                    }
                }
                _ => {
                    self.next_token();
                }
            }
        }
        let text = self.scanner.text_slice(pos, end).to_string();
        self.arena.add_literal_type(
            SyntaxKind::OpaqueType,
            pos,
            end,
            LiteralTypeData {
                literal_kind: LiteralTypeKind::String,
                text,
            },
        )
    }

    /// Capture a template literal type verbatim as an opaque type.
    fn parse_opaque_until_backtick(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token(); // `
        while !self.is_token(SyntaxKind::BacktickToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            self.next_token();
        }
        let end = self.token_end();
        self.parse_expected(SyntaxKind::BacktickToken);
        let text = self.scanner.text_slice(pos, end).to_string();
        self.arena.add_literal_type(
            SyntaxKind::OpaqueType,
            pos,
            end,
            LiteralTypeData {
                literal_kind: LiteralTypeKind::String,
                text,
            },
        )
    }

    // =========================================================================
    // Type members (interface bodies and type literals)
    // =========================================================================

    pub(crate) fn parse_type_members(&mut self) -> NodeList {
        let mut members = NodeList::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let before = self.token_pos();
            if let Some(member) = self.parse_type_member() {
                members.push(member);
            }
            if self.token_pos() == before
                && !self.is_token(SyntaxKind::CloseBraceToken)
                && !self.is_token(SyntaxKind::EndOfFileToken)
            {
                self.next_token();
            }
        }
        members
    }

    fn parse_type_member(&mut self) -> Option<NodeIndex> {
        let pos = self.token_pos();

        // `readonly` modifier, unless it is a property literally named
        // "readonly" (followed by `?`, `:`, `;`, `(` or `}`).
        let mut readonly = false;
        if self.is_token(SyntaxKind::ReadonlyKeyword) {
            let snapshot = self.scanner.save_state();
            let current = self.current_token;
            self.next_token();
            if self.is_identifier_or_keyword()
                || self.is_token(SyntaxKind::OpenBracketToken)
                || self.is_token(SyntaxKind::StringLiteral)
            {
                readonly = true;
            } else {
                self.scanner.restore_state(snapshot);
                self.current_token = current;
            }
        }

        if self.is_token(SyntaxKind::OpenBracketToken) {
            return Some(self.parse_index_signature(pos));
        }

        // Call signature `(): T` — parsed, not modeled.
        if self.is_token(SyntaxKind::OpenParenToken) || self.is_token(SyntaxKind::LessThanToken) {
            self.skip_member();
            return None;
        }

        let name = self.parse_property_name()?;
        let optional = self.parse_optional(SyntaxKind::QuestionToken);

        // Method signature: store as a property whose type is a function.
        if self.is_token(SyntaxKind::OpenParenToken) || self.is_token(SyntaxKind::LessThanToken) {
            if self.is_token(SyntaxKind::LessThanToken) {
                self.skip_type_parameters();
            }
            let method_type = self.parse_method_signature_type();
            let end = self.token_end();
            self.parse_member_separator();
            return Some(self.arena.add_property_signature(
                SyntaxKind::PropertySignature,
                pos,
                end,
                PropertySignatureData {
                    name,
                    optional,
                    readonly,
                    type_node: method_type,
                },
            ));
        }

        let type_node = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        let end = self.token_end();
        self.parse_member_separator();

        Some(self.arena.add_property_signature(
            SyntaxKind::PropertySignature,
            pos,
            end,
            PropertySignatureData {
                name,
                optional,
                readonly,
                type_node,
            },
        ))
    }

    fn parse_property_name(&mut self) -> Option<NodeIndex> {
        if self.is_identifier_or_keyword() {
            return Some(self.parse_identifier_name());
        }
        if self.is_token(SyntaxKind::StringLiteral) || self.is_token(SyntaxKind::NumericLiteral) {
            let pos = self.token_pos();
            let end = self.token_end();
            let text = self.scanner.token_value_ref().to_string();
            self.next_token();
            return Some(self.arena.add_identifier(pos, end, &text));
        }
        self.error(format!(
            "expected property name, found {:?}",
            self.current_token
        ));
        self.skip_member();
        None
    }

    /// Method signature params + return type, represented as a function type.
    fn parse_method_signature_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let mut params = NodeList::new();
        while !self.is_token(SyntaxKind::CloseParenToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            params.push(self.parse_parameter_in_method());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken);
        let return_type = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        let end = self.token_end();

        self.arena.add_function_type(
            SyntaxKind::FunctionType,
            pos,
            end,
            FunctionTypeData {
                params,
                return_type,
                is_constructor: false,
            },
        )
    }

    fn parse_parameter_in_method(&mut self) -> NodeIndex {
        // Same grammar as function-type parameters.
        let pos = self.token_pos();
        let rest = self.parse_optional(SyntaxKind::DotDotDotToken);
        let name = self.parse_identifier_name();
        let optional = self.parse_optional(SyntaxKind::QuestionToken);
        let type_node = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        let end = self.token_end();
        self.arena.add_parameter(
            SyntaxKind::Parameter,
            pos,
            end,
            ParameterData {
                name,
                type_node,
                optional,
                rest,
            },
        )
    }

    fn parse_index_signature(&mut self, pos: u32) -> NodeIndex {
        self.next_token(); // [
        let parameter_name = self.parse_identifier_name();
        self.parse_expected(SyntaxKind::ColonToken);
        let key_type = self.parse_type();
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.parse_expected(SyntaxKind::ColonToken);
        let value_type = self.parse_type();
        let end = self.token_end();
        self.parse_member_separator();

        self.arena.add_index_signature(
            SyntaxKind::IndexSignature,
            pos,
            end,
            IndexSignatureData {
                parameter_name,
                key_type,
                value_type,
            },
        )
    }

    fn parse_member_separator(&mut self) {
        if !self.parse_optional(SyntaxKind::SemicolonToken) {
            self.parse_optional(SyntaxKind::CommaToken);
        }
    }

    /// Skip an unmodeled member up to its separator.
    fn skip_member(&mut self) {
        let mut angle_depth: u32 = 0;
        let mut paren_depth: u32 = 0;
        let mut brace_depth: u32 = 0;
        loop {
            match self.current_token {
                SyntaxKind::EndOfFileToken => return,
                SyntaxKind::LessThanToken => {
                    angle_depth += 1;
                    self.next_token();
                }
                SyntaxKind::GreaterThanToken => {
                    angle_depth = angle_depth.saturating_sub(1);
                    self.next_token();
                }
                SyntaxKind::OpenParenToken => {
                    paren_depth += 1;
                    self.next_token();
                }
                SyntaxKind::CloseParenToken => {
                    paren_depth = paren_depth.saturating_sub(1);
                    self.next_token();
                }
                SyntaxKind::OpenBraceToken => {
                    brace_depth += 1;
                    self.next_token();
                }
                SyntaxKind::CloseBraceToken => {
                    if brace_depth == 0 {
                        return;
                    }
                    brace_depth -= 1;
                    self.next_token();
                }
                SyntaxKind::SemicolonToken | SyntaxKind::CommaToken => {
                    self.next_token();
                    if angle_depth == 0 && paren_depth == 0 && brace_depth == 0 {
                        return;
                    }
                }
                _ => {
                    self.next_token();
                }
            }
        }
    }
}
