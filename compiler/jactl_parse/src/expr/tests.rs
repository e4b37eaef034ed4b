use jactl_ir::{BinaryOp, Literal, NodeData, NodeKind, UnaryOp};
use pretty_assertions::assert_eq;

use crate::tests::{parse, Parsed};

fn expr(p: &Parsed) -> &NodeData {
    match &p.ast[p.stmts()[0]].data {
        NodeData::ExprStmt { expr } => &p.ast[*expr].data,
        other => panic!("not an expression statement: {other:?}"),
    }
}

#[test]
fn multiplication_binds_tighter() {
    let p = parse("1 + 2 * 3");
    let NodeData::Binary { op, right, .. } = expr(&p) else {
        panic!("not binary");
    };
    assert_eq!(*op, BinaryOp::Add);
    assert!(matches!(
        p.ast[*right].data,
        NodeData::Binary {
            op: BinaryOp::Mul,
            ..
        }
    ));
    assert!(p.has(NodeKind::BinaryExpr, 0));
    assert!(p.has(NodeKind::BinaryExpr, 4));
}

#[test]
fn parentheses_group() {
    let p = parse("(1 + 2) * 3");
    let NodeData::Binary { op, left, .. } = expr(&p) else {
        panic!("not binary");
    };
    assert_eq!(*op, BinaryOp::Mul);
    assert!(matches!(
        p.ast[*left].data,
        NodeData::Binary {
            op: BinaryOp::Add,
            ..
        }
    ));
    assert!(matches!(
        p.node(NodeKind::BinaryExpr, 0),
        NodeData::Binary {
            op: BinaryOp::Mul,
            ..
        }
    ));
    assert!(p.has(NodeKind::BinaryExpr, 1));
}

#[test]
fn comparison_and_logic() {
    let p = parse("a < 1 && !b || c == d");
    let NodeData::Binary { op, left, .. } = expr(&p) else {
        panic!("not binary");
    };
    assert_eq!(*op, BinaryOp::Or);
    let NodeData::Binary { op, right, .. } = &p.ast[*left].data else {
        panic!("not binary");
    };
    assert_eq!(*op, BinaryOp::And);
    assert!(matches!(
        p.ast[*right].data,
        NodeData::PrefixUnary {
            op: UnaryOp::Not,
            ..
        }
    ));
}

#[test]
fn method_call_chain() {
    let p = parse("a.b(1).c");
    let NodeData::MethodCall { target, name, args } = expr(&p) else {
        panic!("not a method call");
    };
    assert_eq!(name, "c");
    assert!(args.is_none());
    assert!(matches!(
        &p.ast[*target].data,
        NodeData::MethodCall { name, args: Some(args), .. } if name == "b" && args.len() == 1
    ));
}

#[test]
fn call_and_assignment() {
    let p = parse("x = f(1, 2)");
    let NodeData::VarAssign { name, value } = expr(&p) else {
        panic!("not an assignment");
    };
    assert_eq!(name, "x");
    assert!(matches!(&p.ast[*value].data, NodeData::Call { args, .. } if args.len() == 2));
    assert!(p.has(NodeKind::CallExpr, 4));
}

#[test]
fn new_and_lists() {
    let p = parse("new Foo(1)\n[1, 'a\\nb', 2.5, true, null]");
    assert!(matches!(
        expr(&p),
        NodeData::InvokeNew { class_name, args } if class_name == "Foo" && args.len() == 1
    ));
    assert!(p.has(NodeKind::ClassType, 4));
    let NodeData::ExprStmt { expr } = &p.ast[p.stmts()[1]].data else {
        panic!("not an expression statement");
    };
    let NodeData::ListLiteral { items } = &p.ast[*expr].data else {
        panic!("not a list");
    };
    assert_eq!(items.len(), 5);
    assert_eq!(
        p.ast[items[1]].data,
        NodeData::Literal(Literal::Str("a\nb".into()))
    );
    assert_eq!(
        p.ast[items[2]].data,
        NodeData::Literal(Literal::Decimal("2.5".into()))
    );
}

#[test]
fn speculative_closure_params_leave_no_errors() {
    let p = parse("{ foo(1) }\n{ x = 1 }");
    assert!(p.out.syntax_errors.is_empty(), "{:?}", p.messages());
    assert!(!p.has(NodeKind::ParameterName, 2));
}

#[test]
fn oversized_integer() {
    let p = parse("99999999999999999999");
    assert_eq!(p.messages(), vec!["Integer literal too large"]);
}
