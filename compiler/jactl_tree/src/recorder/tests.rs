use jactl_ir::{NameKind, NodeData};
use jactl_lexer::lex;
use pretty_assertions::assert_eq;

use super::*;

fn name(ast: &mut Ast, text: &str, kind: NameKind) -> NodeId {
    ast.alloc(
        NodeData::Name {
            text: text.into(),
            kind,
        },
        Span::point(0),
    )
}

fn noop(ast: &mut Ast) -> NodeId {
    ast.alloc(NodeData::Noop, Span::point(0))
}

fn shape(recorder: &Recorder<'_>) -> Vec<String> {
    recorder
        .events()
        .iter()
        .map(|event| match event {
            Event::Token(token) => format!("{:?}", token.kind),
            Event::Start(id) => format!("<{}", id.index()),
            Event::End(id) => format!("{}>", id.index()),
        })
        .collect()
}

#[test]
fn bump_pushes_pending_trivia_with_token() {
    let tokens = lex("a  b");
    let mut rec = Recorder::new(&tokens, CancellationToken::new());
    rec.bump();
    let m = rec.mark().unwrap();
    rec.bump();
    rec.done_list(m);
    assert_eq!(shape(&rec), vec!["Ident", "<0", "Whitespace", "Ident", "0>"]);
    assert_eq!(rec.marker(m).offset, Some(3));
}

#[test]
fn offset_skips_leading_trivia_and_comments() {
    let tokens = lex("  // c\n  x");
    let mut rec = Recorder::new(&tokens, CancellationToken::new());
    let m = rec.mark().unwrap();
    rec.bump();
    rec.done_list(m);
    assert_eq!(rec.marker(m).offset, Some(9));
}

#[test]
fn lookahead_skips_trivia() {
    let tokens = lex("a /* x */ ( b");
    let rec = Recorder::new(&tokens, CancellationToken::new());
    assert_eq!(rec.current(), TokenKind::Ident);
    assert_eq!(rec.nth(1), TokenKind::LeftParen);
    assert_eq!(rec.nth(2), TokenKind::Ident);
    assert_eq!(rec.nth(3), TokenKind::Eof);
    assert_eq!(rec.nth(9), TokenKind::Eof);
}

#[test]
fn precede_inserts_start_before_existing() {
    let tokens = lex("a+b");
    let mut ast = Ast::new();
    let mut rec = Recorder::new(&tokens, CancellationToken::new());
    let lhs = rec.mark().unwrap();
    rec.bump();
    let id = noop(&mut ast);
    rec.done(lhs, id, NodeKind::Identifier);
    let bin = rec.precede(lhs);
    rec.bump();
    let rhs = rec.mark().unwrap();
    rec.bump();
    rec.done(rhs, id, NodeKind::Identifier);
    rec.done(bin, id, NodeKind::BinaryExpr);

    assert_eq!(
        shape(&rec),
        vec!["<1", "<0", "Ident", "0>", "Plus", "<2", "Ident", "2>", "1>"]
    );
    assert_eq!(rec.marker(bin).offset, Some(0));
}

#[test]
fn precede_open_marker_closes_after_it() {
    let tokens = lex("x");
    let mut ast = Ast::new();
    let id = noop(&mut ast);
    let mut rec = Recorder::new(&tokens, CancellationToken::new());
    let inner = rec.mark().unwrap();
    let outer = rec.precede(inner);
    rec.bump();
    rec.done(inner, id, NodeKind::Identifier);
    rec.done(outer, id, NodeKind::ExprStmt);
    assert_eq!(shape(&rec), vec!["<1", "<0", "Ident", "0>", "1>"]);
}

#[test]
#[should_panic(expected = "still open")]
fn completing_outer_before_inner_panics() {
    let tokens = lex("x");
    let mut rec = Recorder::new(&tokens, CancellationToken::new());
    let outer = rec.mark().unwrap();
    let _inner = rec.mark().unwrap();
    rec.bump();
    rec.done_list(outer);
}

#[test]
#[should_panic(expected = "marker is Done")]
fn completing_twice_panics() {
    let tokens = lex("x");
    let mut rec = Recorder::new(&tokens, CancellationToken::new());
    let m = rec.mark().unwrap();
    rec.bump();
    rec.done_list(m);
    rec.drop(m);
}

#[test]
fn rollback_truncates_and_rewinds() {
    let tokens = lex("a b c");
    let mut rec = Recorder::new(&tokens, CancellationToken::new());
    rec.bump();
    let attempt = rec.mark().unwrap();
    rec.bump();
    let inner = rec.mark().unwrap();
    rec.bump();
    rec.done_list(inner);
    assert_eq!(rec.current(), TokenKind::Eof);

    rec.rollback(attempt);
    assert_eq!(shape(&rec), vec!["Ident"]);
    assert_eq!(rec.marker(attempt).state, MarkerState::RolledBack);
    assert_eq!(rec.marker(inner).state, MarkerState::RolledBack);
    assert_eq!(rec.current_token().offset(), 2);

    let again = rec.mark().unwrap();
    assert_eq!(again.index(), 2);
    rec.bump();
    rec.drop(again);
}

#[test]
fn duplicate_error_message_drops_marker() {
    let tokens = lex("x y");
    let mut rec = Recorder::new(&tokens, CancellationToken::new());
    let first = rec.mark().unwrap();
    rec.bump();
    rec.error(first, Diagnostic::syntax("Unexpected token", Span::new(0, 1)));
    let second = rec.mark().unwrap();
    rec.bump();
    rec.error(second, Diagnostic::syntax("Unexpected token", Span::new(2, 3)));

    assert_eq!(rec.marker(first).state, MarkerState::Error);
    assert_eq!(rec.marker(second).state, MarkerState::Dropped);
    assert!(rec.marker(second).diagnostic.is_none());
}

#[test]
fn rolled_back_error_message_can_be_reported_again() {
    let tokens = lex("x y");
    let mut rec = Recorder::new(&tokens, CancellationToken::new());
    let attempt = rec.mark().unwrap();
    let err = rec.mark().unwrap();
    rec.bump();
    rec.error(err, Diagnostic::syntax("oops", Span::new(0, 1)));
    rec.rollback(attempt);

    let again = rec.mark().unwrap();
    rec.bump();
    rec.error(again, Diagnostic::syntax("oops", Span::new(0, 1)));
    assert_eq!(rec.marker(again).state, MarkerState::Error);
}

#[test]
fn function_declaration_gets_name_key() {
    let tokens = lex("def f() {}");
    let mut ast = Ast::new();
    let mut rec = Recorder::new(&tokens, CancellationToken::new());
    let decl = rec.mark().unwrap();
    rec.bump();
    let n = rec.mark().unwrap();
    rec.bump();
    let name_node = name(&mut ast, "f", NameKind::Function);
    rec.done(n, name_node, NodeKind::FunctionName);
    while !rec.at_eof() {
        rec.bump();
    }
    let body = noop(&mut ast);
    rec.done(decl, body, NodeKind::FunDecl);

    assert_eq!(rec.marker(decl).name_key, Some(n));
    assert_eq!(rec.marker(n).offset, Some(4));
}

#[test]
fn class_name_key_ignores_nested_class_names() {
    let tokens = lex("class A { class B {} }");
    let mut ast = Ast::new();
    let mut rec = Recorder::new(&tokens, CancellationToken::new());
    // Script-like wrapper without a name of its own.
    let script = rec.mark().unwrap();
    let inner_class = rec.mark().unwrap();
    rec.bump();
    let a = rec.mark().unwrap();
    rec.bump();
    let a_node = name(&mut ast, "A", NameKind::Class);
    rec.done(a, a_node, NodeKind::ClassName);
    rec.bump();
    let nested = rec.mark().unwrap();
    rec.bump();
    let b = rec.mark().unwrap();
    rec.bump();
    let b_node = name(&mut ast, "B", NameKind::Class);
    rec.done(b, b_node, NodeKind::ClassName);
    rec.bump();
    rec.bump();
    let decl = noop(&mut ast);
    rec.done(nested, decl, NodeKind::ClassDecl);
    rec.bump();
    rec.done(inner_class, decl, NodeKind::ClassDecl);
    rec.bump();
    rec.done(script, decl, NodeKind::ClassDecl);

    assert_eq!(rec.marker(nested).name_key, Some(b));
    assert_eq!(rec.marker(inner_class).name_key, Some(a));
    assert_eq!(rec.marker(script).name_key, None);
}

#[test]
fn complete_drops_noop_nodes() {
    let tokens = lex(";");
    let mut ast = Ast::new();
    let id = noop(&mut ast);
    let mut rec = Recorder::new(&tokens, CancellationToken::new());
    let m = rec.mark().unwrap();
    rec.bump();
    rec.complete(m, id, &ast);
    assert_eq!(rec.marker(m).state, MarkerState::Dropped);
    assert_eq!(rec.marker(m).kind, None);
}

#[test]
fn cancelled_mark_fails() {
    let tokens = lex("x");
    let cancel = CancellationToken::new();
    let mut rec = Recorder::new(&tokens, cancel.clone());
    assert!(rec.mark().is_ok());
    cancel.cancel();
    assert_eq!(rec.mark(), Err(TreeError::Cancelled));
}

#[test]
fn finish_requires_balanced_markers() {
    let tokens = lex("x");
    let mut rec = Recorder::new(&tokens, CancellationToken::new());
    let m = rec.mark().unwrap();
    assert_eq!(
        rec.finish().map(|r| r.events.len()).unwrap_err(),
        TreeError::Unbalanced { marker: m }
    );
}

#[test]
fn finish_pushes_remaining_tokens() {
    let tokens = lex("x y");
    let mut rec = Recorder::new(&tokens, CancellationToken::new());
    rec.bump();
    let recording = rec.finish().unwrap();
    assert_eq!(recording.events.len(), tokens.len());
}
