//! Token and node kinds for the declaration subset.

/// Kinds of tokens produced by the scanner and of nodes built by the parser.
///
/// One flat enum covers both, the way the upstream TypeScript grammar numbers
/// its `SyntaxKind`: token kinds first, node kinds after `FirstNode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Unknown,
    EndOfFileToken,

    // Literals
    Identifier,
    StringLiteral,
    NumericLiteral,

    // Punctuation
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    LessThanToken,
    GreaterThanToken,
    CommaToken,
    SemicolonToken,
    ColonToken,
    QuestionToken,
    BarToken,
    AmpersandToken,
    EqualsToken,
    DotToken,
    DotDotDotToken,
    MinusToken,
    EqualsGreaterThanToken,
    AsteriskToken,
    BacktickToken,

    // Keywords
    ImportKeyword,
    ExportKeyword,
    TypeKeyword,
    InterfaceKeyword,
    FromKeyword,
    AsKeyword,
    DeclareKeyword,
    ModuleKeyword,
    NamespaceKeyword,
    ExtendsKeyword,
    ReadonlyKeyword,
    KeyofKeyword,
    TypeofKeyword,
    InKeyword,
    NewKeyword,
    DefaultKeyword,
    ConstKeyword,

    // Intrinsic type keywords
    AnyKeyword,
    UnknownKeyword,
    NeverKeyword,
    VoidKeyword,
    UndefinedKeyword,
    NullKeyword,
    BooleanKeyword,
    NumberKeyword,
    StringKeyword,
    ObjectKeyword,
    SymbolKeyword,
    BigIntKeyword,
    TrueKeyword,
    FalseKeyword,

    // Node kinds (parser-built)
    SourceFile,
    ImportDeclaration,
    ImportSpecifier,
    ExportDeclaration,
    InterfaceDeclaration,
    TypeAliasDeclaration,
    PropertySignature,
    IndexSignature,
    Parameter,
    UnionType,
    IntersectionType,
    TypeReference,
    ArrayType,
    TupleType,
    ParenthesizedType,
    TypeLiteral,
    FunctionType,
    LiteralType,
    TypeOperator,
    RestType,
    IndexedAccessType,
    OpaqueType,
}

impl SyntaxKind {
    /// Map identifier text to a keyword kind, if it is one.
    #[must_use]
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        let kind = match text {
            "import" => SyntaxKind::ImportKeyword,
            "export" => SyntaxKind::ExportKeyword,
            "type" => SyntaxKind::TypeKeyword,
            "interface" => SyntaxKind::InterfaceKeyword,
            "from" => SyntaxKind::FromKeyword,
            "as" => SyntaxKind::AsKeyword,
            "declare" => SyntaxKind::DeclareKeyword,
            "module" => SyntaxKind::ModuleKeyword,
            "namespace" => SyntaxKind::NamespaceKeyword,
            "extends" => SyntaxKind::ExtendsKeyword,
            "readonly" => SyntaxKind::ReadonlyKeyword,
            "keyof" => SyntaxKind::KeyofKeyword,
            "typeof" => SyntaxKind::TypeofKeyword,
            "in" => SyntaxKind::InKeyword,
            "new" => SyntaxKind::NewKeyword,
            "default" => SyntaxKind::DefaultKeyword,
            "const" => SyntaxKind::ConstKeyword,
            "any" => SyntaxKind::AnyKeyword,
            "unknown" => SyntaxKind::UnknownKeyword,
            "never" => SyntaxKind::NeverKeyword,
            "void" => SyntaxKind::VoidKeyword,
            "undefined" => SyntaxKind::UndefinedKeyword,
            "null" => SyntaxKind::NullKeyword,
            "boolean" => SyntaxKind::BooleanKeyword,
            "number" => SyntaxKind::NumberKeyword,
            "string" => SyntaxKind::StringKeyword,
            "object" => SyntaxKind::ObjectKeyword,
            "symbol" => SyntaxKind::SymbolKeyword,
            "bigint" => SyntaxKind::BigIntKeyword,
            "true" => SyntaxKind::TrueKeyword,
            "false" => SyntaxKind::FalseKeyword,
            _ => return None,
        };
        Some(kind)
    }

    /// Keywords that are also valid identifier positions (property names,
    /// import specifiers). Everything alphabetic qualifies in this subset.
    #[must_use]
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::ImportKeyword
                | SyntaxKind::ExportKeyword
                | SyntaxKind::TypeKeyword
                | SyntaxKind::InterfaceKeyword
                | SyntaxKind::FromKeyword
                | SyntaxKind::AsKeyword
                | SyntaxKind::DeclareKeyword
                | SyntaxKind::ModuleKeyword
                | SyntaxKind::NamespaceKeyword
                | SyntaxKind::ExtendsKeyword
                | SyntaxKind::ReadonlyKeyword
                | SyntaxKind::KeyofKeyword
                | SyntaxKind::TypeofKeyword
                | SyntaxKind::InKeyword
                | SyntaxKind::NewKeyword
                | SyntaxKind::DefaultKeyword
                | SyntaxKind::ConstKeyword
                | SyntaxKind::AnyKeyword
                | SyntaxKind::UnknownKeyword
                | SyntaxKind::NeverKeyword
                | SyntaxKind::VoidKeyword
                | SyntaxKind::UndefinedKeyword
                | SyntaxKind::NullKeyword
                | SyntaxKind::BooleanKeyword
                | SyntaxKind::NumberKeyword
                | SyntaxKind::StringKeyword
                | SyntaxKind::ObjectKeyword
                | SyntaxKind::SymbolKeyword
                | SyntaxKind::BigIntKeyword
                | SyntaxKind::TrueKeyword
                | SyntaxKind::FalseKeyword
        )
    }

    /// Intrinsic type keywords (`string`, `number`, ...).
    #[must_use]
    pub fn is_intrinsic_type_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::AnyKeyword
                | SyntaxKind::UnknownKeyword
                | SyntaxKind::NeverKeyword
                | SyntaxKind::VoidKeyword
                | SyntaxKind::UndefinedKeyword
                | SyntaxKind::NullKeyword
                | SyntaxKind::BooleanKeyword
                | SyntaxKind::NumberKeyword
                | SyntaxKind::StringKeyword
                | SyntaxKind::ObjectKeyword
                | SyntaxKind::SymbolKeyword
                | SyntaxKind::BigIntKeyword
        )
    }
}
