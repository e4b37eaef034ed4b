use jactl_ir::{NodeData, NodeKind, TypeRef, VarRole};
use pretty_assertions::assert_eq;

use crate::tests::parse;

#[test]
fn braces_become_block_statement() {
    let p = parse("{ int x = 1 }");
    assert!(p.has(NodeKind::Block, 0));
    assert!(!p.has(NodeKind::Closure, 0));
    assert!(p.has(NodeKind::VarDecl, 2));
    let closure_flagged = p
        .ast
        .iter()
        .any(|(_, n)| matches!(n.data, NodeData::Closure { is_block: true, .. }));
    assert!(closure_flagged);
}

#[test]
fn closure_with_params_is_expression_statement() {
    let p = parse("{ x -> x }");
    assert!(p.has(NodeKind::ExprStmt, 0));
    assert!(p.has(NodeKind::Closure, 0));
    assert!(p.has(NodeKind::ParameterName, 2));
    match p.node(NodeKind::Closure, 0) {
        NodeData::Closure { params, .. } => assert_eq!(params.len(), 1),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn control_flow() {
    let p = parse("if (a) { b } else c\nwhile (d) e\nreturn");
    assert!(p.has(NodeKind::IfStmt, 0));
    assert!(p.has(NodeKind::WhileStmt, 20));
    assert!(p.has(NodeKind::ReturnStmt, 32));
    assert_eq!(p.stmts().len(), 3);
    match p.node(NodeKind::IfStmt, 0) {
        NodeData::If { else_branch, .. } => assert!(else_branch.is_some()),
        other => panic!("unexpected {other:?}"),
    }
    assert!(p.out.syntax_errors.is_empty(), "{:?}", p.messages());
}

#[test]
fn function_parameters() {
    let p = parse("def f(a, int b = 2) { a }");
    let fun = p.ast.fun_decl(p.stmts()[0]).unwrap();
    assert_eq!(fun.name, "f");
    assert_eq!(fun.name_offset, 4);
    assert_eq!(fun.params.len(), 2);
    let a = p.ast.var_decl(fun.params[0]).unwrap();
    let b = p.ast.var_decl(fun.params[1]).unwrap();
    assert_eq!(a.ty, TypeRef::Any);
    assert_eq!(a.role, VarRole::Parameter);
    assert_eq!(b.ty, TypeRef::Int);
    assert!(b.init.is_some());
    assert!(!p.has(NodeKind::List, 5));
}

#[test]
fn class_typed_variable() {
    let p = parse("a.B x = null");
    let decl = p.ast.var_decl(p.stmts()[0]).unwrap();
    assert_eq!(decl.ty, TypeRef::Class("a.B".into()));
    assert!(p.has(NodeKind::ClassType, 0));
    assert!(p.has(NodeKind::VariableName, 4));
}

#[test]
fn lone_semicolon_produces_no_node() {
    let p = parse(";;x");
    assert_eq!(p.stmts().len(), 1);
}

#[test]
fn missing_name_is_reported() {
    let p = parse("class { }");
    assert_eq!(p.messages(), vec!["Unexpected token '{': expected name"]);
}

#[test]
fn stray_closer_is_not_a_statement() {
    let p = parse("if (x) )\n)");
    assert_eq!(p.stmts().len(), 1);
    assert!(!p.has(NodeKind::ExprStmt, 7));
    assert_eq!(
        p.messages(),
        vec!["Unexpected token ')': expected expression"]
    );
    assert_eq!(p.out.syntax_errors[0].offset(), 7);
}

#[test]
fn stray_brace_left_for_enclosing_block() {
    let p = parse("{ if (x) }\ny");
    assert!(p.has(NodeKind::Block, 0));
    assert!(p.has(NodeKind::ExprStmt, 11));
    assert_eq!(
        p.messages(),
        vec!["Unexpected token '}': expected expression"]
    );
}

#[test]
fn missing_then_branch_keeps_else() {
    let p = parse("if (x) else y");
    assert_eq!(p.stmts().len(), 1);
    match p.node(NodeKind::IfStmt, 0) {
        NodeData::If { else_branch, .. } => assert!(else_branch.is_some()),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(
        p.messages(),
        vec!["Unexpected token 'else': expected expression"]
    );
}
