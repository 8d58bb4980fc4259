use pretty_assertions::assert_eq;

use super::*;

#[test]
fn pragmat_items_fold_into_options() {
    let mut options = Options::default();
    assert!(options.apply_pragmat_item("quote-stropping"));
    assert!(options.apply_pragmat_item("--unused"));
    assert!(options.apply_pragmat_item("NOWARNINGS"));
    assert_eq!(options.stropping, Stropping::Quote);
    assert!(options.unused);
    assert!(options.no_warnings);

    assert!(options.apply_pragmat_item("upper-stropping"));
    assert_eq!(options.stropping, Stropping::Bold);
}

#[test]
fn unknown_item_is_rejected() {
    let mut options = Options::default();
    assert!(!options.apply_pragmat_item("optimise"));
    assert_eq!(options, Options::default());
}
