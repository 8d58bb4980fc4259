use super::*;

#[test]
fn intern_and_lookup() {
    let interner = StringInterner::new();

    let hello = interner.intern("hello");
    let world = interner.intern("world");
    let hello2 = interner.intern("hello");

    assert_eq!(hello, hello2);
    assert_ne!(hello, world);

    assert_eq!(interner.lookup(hello), "hello");
    assert_eq!(interner.lookup(world), "world");
}

#[test]
fn empty_string_is_pre_interned() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.lookup(Name::EMPTY), "");
    assert!(interner.is_empty());
}

#[test]
fn get_does_not_intern() {
    let interner = StringInterner::new();
    assert_eq!(interner.get("maxint"), None);
    let name = interner.intern("maxint");
    assert_eq!(interner.get("maxint"), Some(name));
    assert_eq!(interner.len(), 2);
}

#[test]
fn shared_interner_clones_share_names() {
    let interner = SharedInterner::new();
    let clone = interner.clone();

    let a = interner.intern("INT");
    let b = clone.intern("INT");
    assert_eq!(a, b);
    assert_eq!(clone.lookup(a), "INT");
}

#[test]
fn unknown_name_looks_up_empty() {
    let interner = StringInterner::new();
    assert_eq!(interner.lookup(Name::from_raw(99)), "");
}
