use jactl_ir::{FileId, NodeData};
use jactl_lexer::lex;
use jactl_parse::ScriptGrammar;
use jactl_tree::{CancellationToken, Grammar, Recorder};
use pretty_assertions::assert_eq;

use super::*;

pub(crate) const FILE: FileId = FileId::new(7);

pub(crate) struct Script {
    pub ast: Ast,
    pub root: NodeId,
}

impl Script {
    /// First identifier expression named `name`.
    pub fn ident(&self, name: &str) -> NodeId {
        self.ast
            .iter()
            .find(|(_, n)| matches!(&n.data, NodeData::Identifier { name: found } if found == name))
            .map(|(id, _)| id)
            .unwrap()
    }
}

pub(crate) fn parse(source: &str) -> Script {
    let tokens = lex(source);
    let mut ast = Ast::new();
    let mut rec = Recorder::new(&tokens, CancellationToken::new());
    let root = ScriptGrammar.parse(source, &mut rec, &mut ast).unwrap();
    Script { ast, root }
}

/// Classes of other files, described from their source.
pub(crate) struct Fixed(pub Vec<ClassDescriptor>);

impl Fixed {
    pub fn from_source(script_name: &str, source: &str) -> Self {
        let script = parse(source);
        Fixed(describe_classes(
            FileId::new(99),
            script_name,
            &script.ast,
            script.root,
        ))
    }
}

impl ClassLookup for Fixed {
    fn lookup(&self, fq_name: &str) -> Option<ClassDescriptor> {
        self.0.iter().find(|c| c.fq_name == fq_name).cloned()
    }

    fn package_classes(&self, package: &str) -> Vec<ClassDescriptor> {
        self.0
            .iter()
            .filter(|c| c.package.as_deref() == Some(package) && c.enclosing.is_none())
            .cloned()
            .collect()
    }
}

pub(crate) fn resolve_with(
    source: &str,
    globals: &Globals,
    classes: &dyn ClassLookup,
) -> (Script, Resolution) {
    let script = parse(source);
    let res = ScopeResolver.resolve(ResolveInput {
        file: FILE,
        script_name: "Script",
        ast: &script.ast,
        root: script.root,
        globals,
        classes,
    });
    (script, res)
}

pub(crate) fn resolve(source: &str) -> (Script, Resolution) {
    resolve_with(source, &Globals::new(), &NoClasses)
}

fn errors(source: &str) -> Vec<(u32, String)> {
    let (_, res) = resolve(source);
    res.diagnostics
        .iter()
        .map(|d| (d.offset(), d.message.clone()))
        .collect()
}

fn err(offset: u32, message: &str) -> (u32, String) {
    (offset, message.to_owned())
}

#[test]
fn clean_script_has_no_diagnostics() {
    assert_eq!(
        errors("int x = 1\nint y = x + 2\ndef f(a) { a * y }\nf(x)\n"),
        vec![]
    );
}

#[test]
fn unknown_variable() {
    assert_eq!(
        errors("int a = b\n"),
        vec![err(8, "Unknown variable 'b'")]
    );
}

#[test]
fn variable_is_not_visible_in_its_own_initialiser() {
    assert_eq!(
        errors("int x = x\n"),
        vec![err(8, "Unknown variable 'x'")]
    );
}

#[test]
fn redeclaration_in_same_scope() {
    assert_eq!(
        errors("int x = 1\nint x = 2\n"),
        vec![err(14, "Variable 'x' already declared")]
    );
}

#[test]
fn nested_block_may_shadow() {
    assert_eq!(errors("int x = 1\nif (true) { int x = 2 }\n"), vec![]);
}

#[test]
fn functions_are_hoisted() {
    assert_eq!(errors("f()\ndef f() { 1 }\n"), vec![]);
    assert_eq!(
        errors("def f() {}\ndef f() {}\n"),
        vec![err(15, "Function 'f' already declared")]
    );
}

#[test]
fn closure_parameters_stay_inside() {
    assert_eq!(
        errors("def c = { a -> a + 1 }\na\n"),
        vec![err(23, "Unknown variable 'a'")]
    );
}

#[test]
fn literal_type_mismatches() {
    assert_eq!(
        errors("int x = 'a'\nString s = 1\n"),
        vec![
            err(8, "Cannot convert from String to int"),
            err(23, "Cannot convert from int to String"),
        ]
    );
    assert_eq!(errors("long l = 1\ndouble d = 2.5\ndef v = 'x'\n"), vec![]);
}

#[test]
fn non_numeric_operands() {
    assert_eq!(
        errors("String s = 'a'\nint n = s * 2\n"),
        vec![err(23, "Non-numeric operand for '*' of type String")]
    );
    assert_eq!(
        errors("-'x'\n"),
        vec![err(1, "Non-numeric operand for '-' of type String")]
    );
}

#[test]
fn unknown_classes() {
    assert_eq!(
        errors("Foo f = new Foo()\n"),
        vec![err(0, "Unknown class 'Foo'"), err(8, "Unknown class 'Foo'")]
    );
    assert_eq!(
        errors("class B extends Missing { }\n"),
        vec![err(0, "Unknown class 'Missing'")]
    );
}

#[test]
fn class_members_bind_as_fields() {
    let source = "class A { int x\n def get() { x } }\nA a = new A()\n";
    let (script, res) = resolve(source);
    assert!(res.diagnostics.is_empty(), "{:?}", res.diagnostics);
    assert_eq!(
        res.bindings.get(&script.ident("x")),
        Some(&Binding::Field {
            class: "A".into(),
            name: "x".into()
        })
    );
    let names: Vec<_> = res.classes.iter().map(|c| c.fq_name.as_str()).collect();
    assert_eq!(names, vec!["Script", "A"]);
}

#[test]
fn imports_resolve_through_lookup() {
    let other = Fixed::from_source("Other", "package x.y\nclass Z { int f }\n");
    let source = "import x.y.Z\nZ z = new Z()\n";
    let (_, res) = resolve_with(source, &Globals::new(), &other);
    assert!(res.diagnostics.is_empty(), "{:?}", res.diagnostics);
    assert!(res.is_imported("Z"));

    let (_, res) = resolve(source);
    let messages: Vec<_> = res.diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Unknown class 'x.y.Z'",
            "Unknown class 'Z'",
            "Unknown class 'Z'"
        ]
    );
}

#[test]
fn globals_bind_at_script_level() {
    let globals: Globals = [("count", "int")].into_iter().collect();
    let (script, res) = resolve_with("int n = count + 1\n", &globals, &NoClasses);
    assert!(res.diagnostics.is_empty());
    assert_eq!(
        res.bindings.get(&script.ident("count")),
        Some(&Binding::Global("count".into()))
    );
}

#[test]
fn identifier_binds_to_declaration() {
    let (script, res) = resolve("int x = 1\nx + 1\n");
    let Some(Binding::Local(decl)) = res.bindings.get(&script.ident("x")) else {
        panic!("x is not bound locally");
    };
    assert_eq!(script.ast.var_decl(*decl).unwrap().name, "x");
    assert!(matches!(script.ast[*decl].data, NodeData::VarDeclExpr(_)));
}
