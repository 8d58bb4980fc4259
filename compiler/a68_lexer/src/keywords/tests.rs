use pretty_assertions::assert_eq;

use super::*;

#[test]
fn reserved_words() {
    assert_eq!(lookup_bold("BEGIN"), Some(Attribute::BeginSymbol));
    assert_eq!(lookup_bold("ANDTH"), Some(Attribute::AndfSymbol));
    assert_eq!(lookup_bold("OREL"), Some(Attribute::OrfSymbol));
    assert_eq!(lookup_bold("INT"), None);
    assert_eq!(lookup_bold("GO"), None);
    assert_eq!(lookup_bold("ABS"), None);
}

#[test]
fn delimiters() {
    assert_eq!(delimiter("COMMENT"), Some(Delimiter::Comment));
    assert_eq!(delimiter("PR"), Some(Delimiter::Pragmat));
    assert_eq!(delimiter("PROC"), None);
}

#[test]
fn braces_need_option() {
    assert_eq!(punctuation('{', false), None);
    assert_eq!(punctuation('{', true), Some(Attribute::OpenSymbol));
}
