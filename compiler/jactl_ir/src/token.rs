//! Lexical tokens.
//!
//! Tokens are produced by the lexer with full fidelity: whitespace, newlines
//! and comments are kept as trivia tokens so that concatenating every token's
//! text reproduces the source exactly. The stream always ends with a
//! zero-width [`TokenKind::Eof`] token.

use crate::Span;

/// Token kind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    // Trivia
    Whitespace,
    Newline,
    LineComment,
    BlockComment,

    // Literals and names
    Ident,
    IntLiteral,
    DecimalLiteral,
    StringLiteral,

    // Keywords
    Package,
    Import,
    As,
    Class,
    Extends,
    Def,
    Var,
    If,
    Else,
    While,
    Return,
    New,
    True,
    False,
    Null,

    // Builtin type keywords
    BooleanType,
    IntType,
    LongType,
    DoubleType,
    DecimalType,
    StringType,
    ListType,
    MapType,

    // Punctuation
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftSquare,
    RightSquare,
    Comma,
    Semicolon,
    Dot,
    Colon,
    Question,
    Arrow,

    // Operators
    Equal,
    EqualEqual,
    BangEqual,
    Bang,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    AmpAmp,
    PipePipe,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    /// Unrecognised input.
    Error,
    /// Zero-width end of input marker.
    Eof,
}

impl TokenKind {
    /// Whitespace, newlines and comments.
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::Newline
                | TokenKind::LineComment
                | TokenKind::BlockComment
        )
    }

    /// Whitespace and newlines (merged into one leaf by the tree materializer).
    #[inline]
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Newline)
    }

    /// Keywords that name a builtin type (`def` and `var` included).
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Def
                | TokenKind::Var
                | TokenKind::BooleanType
                | TokenKind::IntType
                | TokenKind::LongType
                | TokenKind::DoubleType
                | TokenKind::DecimalType
                | TokenKind::StringType
                | TokenKind::ListType
                | TokenKind::MapType
        )
    }

    /// Fixed spelling of punctuation, operators and keywords.
    pub fn spelling(self) -> Option<&'static str> {
        use TokenKind::*;
        Some(match self {
            Package => "package",
            Import => "import",
            As => "as",
            Class => "class",
            Extends => "extends",
            Def => "def",
            Var => "var",
            If => "if",
            Else => "else",
            While => "while",
            Return => "return",
            New => "new",
            True => "true",
            False => "false",
            Null => "null",
            BooleanType => "boolean",
            IntType => "int",
            LongType => "long",
            DoubleType => "double",
            DecimalType => "Decimal",
            StringType => "String",
            ListType => "List",
            MapType => "Map",
            LeftParen => "(",
            RightParen => ")",
            LeftBrace => "{",
            RightBrace => "}",
            LeftSquare => "[",
            RightSquare => "]",
            Comma => ",",
            Semicolon => ";",
            Dot => ".",
            Colon => ":",
            Question => "?",
            Arrow => "->",
            Equal => "=",
            EqualEqual => "==",
            BangEqual => "!=",
            Bang => "!",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            AmpAmp => "&&",
            PipePipe => "||",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            _ => return None,
        })
    }
}

/// A token with its source span.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    /// Byte offset of the first character.
    #[inline]
    pub const fn offset(&self) -> u32 {
        self.span.start
    }

    #[inline]
    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }

    /// Source text of this token.
    #[inline]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.slice(source)
    }
}
