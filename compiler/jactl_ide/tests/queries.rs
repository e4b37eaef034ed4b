//! Position queries across one or more files.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use jactl_ide::{Analyzer, CacheConfig, Frontend, SourceFile, OUTSIDE_SOURCE_ROOTS};
use jactl_ir::{AstKey, FileId, NodeData, NodeKind};
use jactl_resolve::{Globals, GlobalsError, GlobalsSource, StaticGlobals};
use pretty_assertions::assert_eq;

const MAIN: FileId = FileId::new(1);

fn key(file: FileId, kind: NodeKind, offset: u32) -> AstKey {
    AstKey::new(file, kind, offset)
}

fn names(analyzer: &Analyzer, text: &str, at: AstKey) -> Vec<String> {
    analyzer
        .variables_and_functions_visible(MAIN, text, &at)
        .unwrap()
        .iter()
        .map(|d| d.name().to_owned())
        .collect()
}

struct Failing;

impl GlobalsSource for Failing {
    fn load(&self) -> Result<Globals, GlobalsError> {
        Err(GlobalsError::Script {
            path: "/proj/globals.jactl".into(),
            message: "Unexpected token".into(),
        })
    }
}

#[test]
fn lookup_node_returns_semantic_node() {
    let analyzer = Analyzer::default();
    let text = "def f() {\n}\n";
    let node = analyzer
        .lookup_node(MAIN, text, &key(MAIN, NodeKind::FunDecl, 0))
        .unwrap()
        .unwrap();
    assert!(matches!(node.data(), NodeData::FunDecl { .. }));
    assert!(analyzer
        .lookup_node(MAIN, text, &key(MAIN, NodeKind::FunDecl, 1))
        .unwrap()
        .is_none());
}

#[test]
fn visible_variables_and_functions() {
    let analyzer = Analyzer::default();
    let text = "int a = 1\ndef f(p) {\n  int b = 2\n  b\n}\nint c = 3\n";
    assert_eq!(
        names(&analyzer, text, key(MAIN, NodeKind::Identifier, 35)),
        vec!["p", "b", "a", "f"]
    );
}

#[test]
fn declared_variable_hidden_in_own_initialiser() {
    let analyzer = Analyzer::default();
    let text = "int x = 1\nint y = x\n";
    assert_eq!(
        names(&analyzer, text, key(MAIN, NodeKind::Identifier, 18)),
        vec!["x"]
    );
}

#[test]
fn globals_failure_reported_at_first_offset() {
    let analyzer = Analyzer::new(CacheConfig::default(), Frontend::new(Failing));
    let text = "\nint x = 1\n";
    let script = analyzer.put(MAIN, text).unwrap();
    assert_eq!(script.first_offset(), Some(1));
    let errors = analyzer.errors_at(MAIN, text, 1).unwrap();
    let messages: Vec<_> = errors.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec!["Error in globals script '/proj/globals.jactl': Unexpected token"]
    );
}

#[test]
fn globals_are_script_variables() {
    let globals: Globals = [("limit", "int")].into_iter().collect();
    let analyzer = Analyzer::new(CacheConfig::default(), Frontend::new(StaticGlobals::new(globals)));
    let script = analyzer.put(MAIN, "int n = limit * 2\n").unwrap();
    assert!(script.diagnostics().is_empty());
}

#[test]
fn outside_source_roots() {
    let analyzer = Analyzer::default();
    let text = "int y = nothing\n";
    analyzer
        .sources()
        .insert(MAIN, SourceFile::new("Loose", None, text));
    let errors = analyzer.errors_at(MAIN, text, 0).unwrap();
    let messages: Vec<_> = errors.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec![OUTSIDE_SOURCE_ROOTS]);
    assert_eq!(analyzer.put(MAIN, text).unwrap().diagnostics().len(), 1);
}

fn project() -> (Analyzer, &'static str) {
    let analyzer = Analyzer::default();
    let sources = analyzer.sources();
    sources.insert(
        FileId::new(2),
        SourceFile::new("Helpers", Some("app"), "package app\nclass Helper { int n }\n"),
    );
    sources.insert(
        FileId::new(3),
        SourceFile::new("Utils", Some("lib"), "package lib\nclass Util {}\n"),
    );
    let main = "package app\nimport lib.Util\nHelper h = new Helper()\n";
    sources.insert(MAIN, SourceFile::new("Main", Some("app"), main));
    (analyzer, main)
}

#[test]
fn classes_resolve_across_files() {
    let (analyzer, main) = project();
    let script = analyzer.put(MAIN, main).unwrap();
    assert!(script.diagnostics().is_empty(), "{:?}", script.diagnostics());
    assert!(analyzer.is_imported(MAIN, main, "Util").unwrap());
    assert!(!analyzer.is_imported(MAIN, main, "Helper").unwrap());
}

#[test]
fn classes_visible_in_script() {
    let (analyzer, main) = project();
    let visible: Vec<_> = analyzer
        .classes_visible(MAIN, main, &key(MAIN, NodeKind::InvokeNew, 39))
        .unwrap()
        .into_iter()
        .map(|c| c.fq_name)
        .collect();
    assert_eq!(visible, vec!["lib.Util", "app.Helper"]);
}

#[test]
fn go_to_class_in_other_file() {
    let (analyzer, main) = project();
    let target = analyzer
        .declaration_of(MAIN, main, &key(MAIN, NodeKind::InvokeNew, 39))
        .unwrap();
    assert_eq!(target, Some(key(FileId::new(2), NodeKind::ClassName, 18)));

    let (script, class) = analyzer.class_decl_by_name("lib.Util").unwrap().unwrap();
    assert_eq!(script.file(), FileId::new(3));
    assert_eq!(class.name, "Util");
    assert!(analyzer.class_decl_by_name("lib.Missing").unwrap().is_none());
}

#[test]
fn go_to_local_variable() {
    let analyzer = Analyzer::default();
    let text = "int x = 1\nx + 2\n";
    assert_eq!(
        analyzer
            .declaration_of(MAIN, text, &key(MAIN, NodeKind::Identifier, 10))
            .unwrap(),
        Some(key(MAIN, NodeKind::VarDecl, 0))
    );
}

#[test]
fn go_to_field() {
    let analyzer = Analyzer::default();
    let text = "class A {\n int count\n def get() { count }\n}\n";
    let at = key(MAIN, NodeKind::Identifier, 34);
    assert_eq!(
        analyzer.declaration_of(MAIN, text, &at).unwrap(),
        Some(key(MAIN, NodeKind::VarDecl, 11))
    );
}

#[test]
fn owning_class_of_method_body() {
    let analyzer = Analyzer::default();
    let text = "class A {\n def m() { 1 }\n}\n";
    let owner = analyzer
        .owning_class(MAIN, text, &key(MAIN, NodeKind::Literal, 21))
        .unwrap()
        .unwrap();
    assert_eq!(owner.fq_name, "A");
    let members = names(&analyzer, text, key(MAIN, NodeKind::Literal, 21));
    assert_eq!(members, vec!["m"]);
}

#[test]
fn class_declaration_by_relative_name() {
    let analyzer = Analyzer::default();
    let text = "package p\nclass A { class B {} }\n";
    let class = analyzer.class_decl(MAIN, text, "A.B").unwrap().unwrap();
    assert_eq!(class.fq_name, "p.A.B");
    assert_eq!(class.enclosing.as_deref(), Some("p.A"));
}

#[test]
fn go_to_class_without_caching_declaring_file() {
    let analyzer = Analyzer::new(CacheConfig::unbounded().with_capacity(0), Frontend::default());
    let sources = analyzer.sources();
    sources.insert(
        FileId::new(2),
        SourceFile::new("Helpers", Some("app"), "package app\nclass Helper { int n }\n"),
    );
    let main = "package app\nHelper h = new Helper()\n";
    sources.insert(MAIN, SourceFile::new("Main", Some("app"), main));
    assert!(analyzer.cache().is_empty());
    let target = analyzer
        .declaration_of(MAIN, main, &key(MAIN, NodeKind::InvokeNew, 23))
        .unwrap();
    assert_eq!(target, Some(key(FileId::new(2), NodeKind::ClassName, 18)));
}

#[test]
fn commented_script_has_no_diagnostics() {
    let analyzer = Analyzer::default();
    let text = "/* header */\nint x = 1 /* one */\n// done\nx + 1\n";
    let script = analyzer.put(MAIN, text).unwrap();
    assert!(script.diagnostics().is_empty(), "{:?}", script.diagnostics());
    assert_eq!(script.first_offset(), Some(13));
    assert!(script.lookup(&key(MAIN, NodeKind::VarDecl, 13)).is_some());
}
