//! Lexer for Jactl using logos.
//!
//! Unlike a compiler lexer this one keeps every byte: trivia is emitted as
//! tokens and unrecognised characters become [`TokenKind::Error`] tokens. The
//! stream always ends with a zero-width [`TokenKind::Eof`] token at
//! `source.len()`, which is not trivia, so a marker opened anywhere in the
//! stream always has a significant token after it.

mod raw_token;

use jactl_ir::{Span, Token, TokenKind};
use logos::Logos;

use crate::raw_token::RawToken;

/// Source of tokens for the parser.
pub trait Lexer: Send + Sync {
    /// Tokenize `text`. Concatenating the token texts reproduces `text`.
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

/// The default logos-backed lexer.
#[derive(Copy, Clone, Debug, Default)]
pub struct JactlLexer;

impl Lexer for JactlLexer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        lex(text)
    }
}

/// Lex `source` into a full-fidelity token list.
///
/// # Panics
/// Panics if `source` is longer than `u32::MAX` bytes.
pub fn lex(source: &str) -> Vec<Token> {
    let mut result = Vec::with_capacity(source.len() / 4 + 1);
    let mut logos = RawToken::lexer(source);
    let mut covered = 0;

    while let Some(token_result) = logos.next() {
        let range = logos.span();
        // Keep the stream gapless even if the lexer skipped input.
        if range.start > covered {
            result.push(Token::new(
                TokenKind::Error,
                Span::from_range(covered..range.start),
            ));
        }
        covered = range.end;

        let kind = match token_result {
            Ok(raw) => convert_token(raw),
            Err(()) => TokenKind::Error,
        };
        result.push(Token::new(kind, Span::from_range(range)));
    }

    if covered < source.len() {
        result.push(Token::new(
            TokenKind::Error,
            Span::from_range(covered..source.len()),
        ));
    }

    let eof_pos = u32::try_from(source.len())
        .unwrap_or_else(|_| panic!("source file exceeds {} bytes", u32::MAX));
    result.push(Token::new(TokenKind::Eof, Span::point(eof_pos)));

    result
}

fn convert_token(raw: RawToken) -> TokenKind {
    match raw {
        RawToken::Whitespace => TokenKind::Whitespace,
        RawToken::Newline => TokenKind::Newline,
        RawToken::LineComment => TokenKind::LineComment,
        RawToken::BlockComment => TokenKind::BlockComment,

        RawToken::Package => TokenKind::Package,
        RawToken::Import => TokenKind::Import,
        RawToken::As => TokenKind::As,
        RawToken::Class => TokenKind::Class,
        RawToken::Extends => TokenKind::Extends,
        RawToken::Def => TokenKind::Def,
        RawToken::Var => TokenKind::Var,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::While => TokenKind::While,
        RawToken::Return => TokenKind::Return,
        RawToken::New => TokenKind::New,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Null => TokenKind::Null,

        RawToken::BooleanType => TokenKind::BooleanType,
        RawToken::IntType => TokenKind::IntType,
        RawToken::LongType => TokenKind::LongType,
        RawToken::DoubleType => TokenKind::DoubleType,
        RawToken::DecimalType => TokenKind::DecimalType,
        RawToken::StringType => TokenKind::StringType,
        RawToken::ListType => TokenKind::ListType,
        RawToken::MapType => TokenKind::MapType,

        RawToken::LeftParen => TokenKind::LeftParen,
        RawToken::RightParen => TokenKind::RightParen,
        RawToken::LeftBrace => TokenKind::LeftBrace,
        RawToken::RightBrace => TokenKind::RightBrace,
        RawToken::LeftSquare => TokenKind::LeftSquare,
        RawToken::RightSquare => TokenKind::RightSquare,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Question => TokenKind::Question,
        RawToken::Arrow => TokenKind::Arrow,

        RawToken::Equal => TokenKind::Equal,
        RawToken::EqualEqual => TokenKind::EqualEqual,
        RawToken::BangEqual => TokenKind::BangEqual,
        RawToken::Bang => TokenKind::Bang,
        RawToken::Less => TokenKind::Less,
        RawToken::LessEqual => TokenKind::LessEqual,
        RawToken::Greater => TokenKind::Greater,
        RawToken::GreaterEqual => TokenKind::GreaterEqual,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,

        RawToken::Int => TokenKind::IntLiteral,
        RawToken::Decimal => TokenKind::DecimalLiteral,
        RawToken::String => TokenKind::StringLiteral,
        RawToken::Ident => TokenKind::Ident,
        RawToken::Unknown => TokenKind::Error,
    }
}

#[cfg(test)]
mod tests;
