use a68_ir::{MoidId, Name, NodeId, StringInterner};
use pretty_assertions::assert_eq;

use super::*;

fn table() -> (ModeTable, StringInterner) {
    let interner = StringInterner::new();
    (ModeTable::new(&interner), interner)
}

#[test]
fn standard_modes_sit_at_fixed_ids() {
    let (modes, interner) = table();
    assert_eq!(modes.len(), MoidId::PRIMITIVE_COUNT);
    assert_eq!(modes.kind(MoidId::INT), ModeKind::Standard);
    assert_eq!(interner.lookup(modes[MoidId::LONG_REAL].name), "LONG REAL");
    assert_eq!(modes.kind(MoidId::STRING), ModeKind::Flex);
    assert_eq!(modes.sub(MoidId::STRING), Some(MoidId::ROW_CHAR));
    assert_eq!(modes.kind(MoidId::VOID), ModeKind::Void);
    assert_eq!(modes.kind(MoidId::ROWS), ModeKind::Rows);
}

#[test]
fn identical_descriptors_are_shared() {
    let (mut modes, _) = table();
    let a = modes.ref_to(MoidId::INT);
    let b = modes.intern(Moid::with_sub(ModeKind::Ref, MoidId::INT));
    assert_eq!(a, b);
    assert_eq!(modes.row_of(MoidId::CHAR, 1), MoidId::ROW_CHAR);
}

#[test]
fn flags_are_inherited_from_components() {
    let (mut modes, _) = table();
    let r = modes.ref_to(MoidId::STRING);
    let flags = modes[r].flags;
    assert!(flags.contains(MoidFlags::HAS_REF));
    assert!(flags.contains(MoidFlags::HAS_FLEX));
    assert!(flags.contains(MoidFlags::HAS_ROWS));
    assert!(!modes[MoidId::INT].flags.contains(MoidFlags::HAS_ROWS));
}

#[test]
fn finalise_merges_equivalent_modes() {
    let (mut modes, interner) = table();
    // MODE A = STRUCT (INT x, REF A next); MODE B = STRUCT (INT x, REF B next)
    let x = interner.intern("x");
    let next = interner.intern("next");
    let a = modes.indicant(interner.intern("A"), NodeId::new(1));
    let b = modes.indicant(interner.intern("B"), NodeId::new(2));
    let ref_a = modes.ref_to(a);
    let ref_b = modes.ref_to(b);
    let sa = modes.struct_of(&[(MoidId::INT, x), (ref_a, next)]);
    let sb = modes.struct_of(&[(MoidId::INT, x), (ref_b, next)]);
    assert_ne!(sa, sb);
    modes.define_indicant(a, sa);
    modes.define_indicant(b, sb);

    modes.finalise();
    assert!(modes.is_finalised());
    assert_eq!(modes.resolve(a), modes.resolve(b));
    assert_eq!(modes.resolve(ref_a), modes.resolve(ref_b));
    assert_eq!(modes.resolve(sb), sa);

    // After finalising, a fresh equivalent descriptor merges on entry.
    let again = modes.struct_of(&[(MoidId::INT, x), (ref_a, next)]);
    assert_eq!(again, sa);
}

#[test]
fn finalise_names_recursive_modes() {
    let (mut modes, interner) = table();
    let node = interner.intern("NODE");
    let a = modes.indicant(node, NodeId::new(1));
    let ref_a = modes.ref_to(a);
    let s = modes.struct_of(&[(ref_a, interner.intern("next"))]);
    modes.define_indicant(a, s);
    modes.finalise();
    assert_eq!(modes[s].name, node);
    assert_eq!(
        modes.describe(ref_a, &interner),
        "REF NODE"
    );
    assert_eq!(
        modes.describe(s, &interner),
        "STRUCT (REF NODE next)"
    );
}

#[test]
fn slices_and_names() {
    let (mut modes, _) = table();
    let matrix = modes.row_of(MoidId::REAL, 2);
    let row = modes.row_of(MoidId::REAL, 1);
    assert_eq!(modes.slice(matrix), Some(row));
    assert_eq!(modes.slice(row), Some(MoidId::REAL));
    assert_eq!(modes.slice(MoidId::STRING), Some(MoidId::CHAR));
    assert_eq!(modes.slice(MoidId::INT), None);

    let ref_string = modes.ref_to(MoidId::STRING);
    let ref_char = modes.ref_to(MoidId::CHAR);
    assert_eq!(modes.name_of(ref_string), Some(ref_char));
    assert_eq!(modes.multiple(MoidId::BOOL), MoidId::ROW_BOOL);
}

#[test]
fn fields_and_parameters() {
    let (mut modes, interner) = table();
    let re = interner.intern("re");
    let im = interner.intern("im");
    let compl = modes.struct_of(&[(MoidId::REAL, re), (MoidId::REAL, im)]);
    assert_eq!(modes.field(compl, im), Some(MoidId::REAL));
    assert_eq!(modes.field(compl, Name::EMPTY), None);
    assert_eq!(modes.field(MoidId::INT, re), None);

    let p = modes.proc_of(&[MoidId::INT, compl], MoidId::BOOL);
    assert_eq!(modes.parameters(p), vec![MoidId::INT, compl]);
    assert_eq!(modes.sub(p), Some(MoidId::BOOL));
    assert_eq!(modes[p].dim, 2);
}
