use jactl_ir::Span;
use pretty_assertions::assert_eq;

use super::*;

fn diag(message: &str, offset: u32) -> Diagnostic {
    Diagnostic::resolution(message, Span::new(offset, offset + 1))
}

#[test]
fn buckets_by_offset() {
    let index: DiagnosticIndex = [diag("a", 7), diag("b", 2), diag("c", 7)]
        .into_iter()
        .collect();

    assert_eq!(index.offsets(), vec![2, 7]);
    assert_eq!(index.bucket_count(), 2);
    assert_eq!(index.len(), 3);
    let messages: Vec<&str> = index.at(7).iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec!["a", "c"]);
}

#[test]
fn missing_offset_is_empty() {
    let index = DiagnosticIndex::new();
    assert!(index.at(3).is_empty());
    assert!(index.is_empty());
}

#[test]
fn iter_is_offset_ordered() {
    let index: DiagnosticIndex = [diag("late", 9), diag("early", 1)].into_iter().collect();
    let messages: Vec<&str> = index.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec!["early", "late"]);
}
