use super::*;

#[test]
fn second_insert_is_rejected() {
    let mut set = MessageSet::new();
    assert!(set.insert("Unexpected token ')'"));
    assert!(!set.insert("Unexpected token ')'"));
    assert_eq!(set.len(), 1);
}

#[test]
fn removed_message_can_be_reported_again() {
    let mut set = MessageSet::new();
    set.insert("oops");
    assert!(set.remove("oops"));
    assert!(!set.contains("oops"));
    assert!(set.insert("oops"));
    assert!(!set.remove("never seen"));
}
