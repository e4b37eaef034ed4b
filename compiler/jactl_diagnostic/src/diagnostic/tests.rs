use super::*;

#[test]
fn offset_is_span_start() {
    let diag = Diagnostic::syntax("Unexpected token", Span::new(4, 7));
    assert_eq!(diag.offset(), 4);
    assert_eq!(diag.kind, DiagnosticKind::Syntax);
    assert_eq!(diag.to_string(), "Unexpected token");
}

#[test]
fn configuration_is_a_point() {
    let diag = Diagnostic::configuration("bad globals", 12);
    assert_eq!(diag.span, Span::point(12));
    assert_eq!(diag.kind.to_string(), "configuration");
}

#[test]
fn anchored_at_keeps_length() {
    let diag = Diagnostic::resolution("Unknown variable 'x'", Span::new(10, 11)).anchored_at(0);
    assert_eq!(diag.span, Span::new(0, 1));
}
