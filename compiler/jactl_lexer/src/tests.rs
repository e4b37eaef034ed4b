use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).iter().map(|t| t.kind).collect()
}

fn rebuild(source: &str) -> String {
    lex(source).iter().map(|t| t.text(source)).collect()
}

#[test]
fn function_declaration() {
    use TokenKind::*;
    assert_eq!(
        kinds("def f() {\n}\n"),
        vec![
            Def, Whitespace, Ident, LeftParen, RightParen, Whitespace, LeftBrace, Newline,
            RightBrace, Newline, Eof
        ]
    );
}

#[test]
fn eof_is_zero_width_at_end() {
    let tokens = lex("x");
    let eof = tokens.last().copied();
    assert_eq!(eof, Some(Token::new(TokenKind::Eof, Span::point(1))));
    assert_eq!(lex(""), vec![Token::new(TokenKind::Eof, Span::point(0))]);
}

#[test]
fn comments_are_trivia() {
    let tokens = lex("// hi\n/* a\n * b */x");
    assert_eq!(tokens[0].kind, TokenKind::LineComment);
    assert_eq!(tokens[1].kind, TokenKind::Newline);
    assert_eq!(tokens[2].kind, TokenKind::BlockComment);
    assert_eq!(tokens[2].text("// hi\n/* a\n * b */x"), "/* a\n * b */");
    assert_eq!(tokens[3].kind, TokenKind::Ident);
}

#[test]
fn block_comment_ends_at_first_close() {
    use TokenKind::*;
    assert_eq!(kinds("/* a */x"), vec![BlockComment, Ident, Eof]);
    assert_eq!(kinds("/***/ /**/"), vec![BlockComment, Whitespace, BlockComment, Eof]);
    assert_eq!(
        kinds("/* a */ */"),
        vec![BlockComment, Whitespace, Star, Slash, Eof]
    );
}

#[test]
fn unterminated_block_comment_is_error_to_end() {
    let source = "x /* never\nclosed";
    let tokens = lex(source);
    assert_eq!(tokens[2].kind, TokenKind::Error);
    assert_eq!(tokens[2].text(source), "/* never\nclosed");
    assert_eq!(tokens.len(), 4);
}

#[test]
fn keywords_and_types() {
    use TokenKind::*;
    assert_eq!(
        kinds("int x = 1"),
        vec![IntType, Whitespace, Ident, Whitespace, Equal, Whitespace, IntLiteral, Eof]
    );
    assert_eq!(kinds("classy"), vec![Ident, Eof]);
    assert_eq!(kinds("Decimal"), vec![DecimalType, Eof]);
}

#[test]
fn literals() {
    use TokenKind::*;
    assert_eq!(
        kinds(r#"1 2.5 "a\"b" 'c'"#),
        vec![
            IntLiteral, Whitespace, DecimalLiteral, Whitespace, StringLiteral, Whitespace,
            StringLiteral, Eof
        ]
    );
}

#[test]
fn operators_prefer_longest_match() {
    use TokenKind::*;
    assert_eq!(
        kinds("a->b==c<=d"),
        vec![Ident, Arrow, Ident, EqualEqual, Ident, LessEqual, Ident, Eof]
    );
}

#[test]
fn unknown_characters_are_errors() {
    let source = "x # é";
    let tokens = lex(source);
    assert!(tokens.iter().any(|t| t.kind == TokenKind::Error));
    assert_eq!(rebuild(source), source);
}

#[test]
fn unterminated_string_round_trips() {
    let source = "\"abc\ndef";
    assert_eq!(rebuild(source), source);
}

#[test]
fn trait_object_delegates() {
    let lexer: &dyn Lexer = &JactlLexer;
    assert_eq!(lexer.tokenize("a b"), lex("a b"));
}

proptest! {
    #[test]
    fn lexing_round_trips(source in "\\PC*") {
        prop_assert_eq!(rebuild(&source), source);
    }

    #[test]
    fn spans_are_contiguous(source in "[ -~\\n\\t]{0,64}") {
        let tokens = lex(&source);
        let mut offset = 0;
        for token in &tokens {
            prop_assert_eq!(token.span.start, offset);
            offset = token.span.end;
        }
        prop_assert_eq!(offset as usize, source.len());
    }
}
