use super::*;

#[test]
fn membership_spans_words() {
    let set = AttributeSet::new()
        .with(Attribute::OpenSymbol)
        .with(Attribute::Voiding);
    assert!(set.contains(Attribute::OpenSymbol));
    assert!(set.contains(Attribute::Voiding));
    assert!(!set.contains(Attribute::CloseSymbol));
    assert!(PHRASE_END.contains(Attribute::ExitSymbol));
    assert!(!LOOP_START.contains(Attribute::OdSymbol));
}
