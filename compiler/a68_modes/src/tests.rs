use a68_ir::{MoidId, NodeId, StringInterner};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn table() -> (ModeTable, StringInterner) {
    let interner = StringInterner::new();
    (ModeTable::new(&interner), interner)
}

fn coercions(path: Option<Vec<Step>>) -> Option<Vec<Coercion>> {
    path.map(|steps| steps.into_iter().map(|s| s.coercion).collect())
}

// === Equivalence ===

#[test]
fn self_referential_struct_is_equivalent_to_its_twin() {
    let (mut modes, interner) = table();
    let next = interner.intern("next");
    let a = modes.indicant(interner.intern("A"), NodeId::new(1));
    let b = modes.indicant(interner.intern("B"), NodeId::new(2));
    let ref_a = modes.ref_to(a);
    let ref_b = modes.ref_to(b);
    let sa = modes.struct_of(&[(ref_a, next)]);
    let sb = modes.struct_of(&[(ref_b, next)]);
    modes.define_indicant(a, sa);
    modes.define_indicant(b, sb);

    assert!(modes.equivalent(a, b));
    assert!(modes.equivalent(ref_a, ref_b));
}

#[test]
fn mutually_recursive_struct_and_union_intern_to_one_mode() {
    let (mut modes, interner) = table();
    let (v, l) = (interner.intern("v"), interner.intern("link"));
    // MODE S = STRUCT (INT v, U link), U = UNION (VOID, REF S)
    let mut build = |s_name: &str, u_name: &str, base: u32| {
        let s = modes.indicant(interner.intern(s_name), NodeId::new(base));
        let u = modes.indicant(interner.intern(u_name), NodeId::new(base + 1));
        let ref_s = modes.ref_to(s);
        let body_s = modes.struct_of(&[(MoidId::INT, v), (u, l)]);
        let body_u = modes.union_of(&[MoidId::VOID, ref_s]);
        modes.define_indicant(s, body_s);
        modes.define_indicant(u, body_u);
        (s, u)
    };
    let (s1, u1) = build("S", "U", 10);
    let (s2, u2) = build("T", "W", 20);
    assert!(modes.check_indicants().is_empty());
    modes.finalise();

    assert_eq!(modes.resolve(s1), modes.resolve(s2));
    assert_eq!(modes.resolve(u1), modes.resolve(u2));
    assert_ne!(modes.resolve(s1), modes.resolve(u1));
}

#[test]
fn different_field_names_are_different_modes() {
    let (mut modes, interner) = table();
    let a = modes.struct_of(&[(MoidId::INT, interner.intern("a"))]);
    let b = modes.struct_of(&[(MoidId::INT, interner.intern("b"))]);
    assert!(!modes.equivalent(a, b));
}

#[test]
fn unions_compare_as_sets() {
    let (mut modes, _) = table();
    let ab = modes.union_of(&[MoidId::INT, MoidId::REAL]);
    let ba = modes.union_of(&[MoidId::REAL, MoidId::INT]);
    let aab = modes.union_of(&[MoidId::INT, MoidId::REAL, MoidId::INT]);
    assert!(modes.equivalent(ab, ba));
    assert!(modes.equivalent(ab, aab));
}

// === Uniting ===

#[test]
fn unite_absorbs_and_deduplicates() {
    let (mut modes, _) = table();
    let inner = modes.union_of(&[MoidId::INT, MoidId::CHAR]);
    let u = modes.unite(&[inner, MoidId::REAL, MoidId::INT]);
    assert_eq!(modes.members(u), vec![MoidId::INT, MoidId::CHAR, MoidId::REAL]);
    assert_eq!(modes.unite(&[MoidId::INT, MoidId::INT]), MoidId::INT);
}

// === Deflexing ===

#[test]
fn deflexing_kinds() {
    let (mut modes, _) = table();
    let ref_string = modes.ref_to(MoidId::STRING);
    let ref_row_char = modes.ref_to(MoidId::ROW_CHAR);
    let row_string = modes.row_of(MoidId::STRING, 1);
    let row_row_char = modes.row_of(MoidId::ROW_CHAR, 1);

    assert_eq!(modes.deflex(MoidId::STRING, Deflexing::No), MoidId::STRING);
    assert_eq!(modes.deflex(MoidId::STRING, Deflexing::Safe), MoidId::ROW_CHAR);
    assert_eq!(modes.deflex(ref_string, Deflexing::Safe), ref_string);
    assert_eq!(modes.deflex(ref_string, Deflexing::Alias), ref_row_char);
    assert_eq!(modes.deflex(ref_string, Deflexing::Force), ref_row_char);
    assert_eq!(modes.deflex(row_string, Deflexing::Safe), row_row_char);
    assert_eq!(modes.deflex(MoidId::INT, Deflexing::Force), MoidId::INT);
}

#[test]
fn deflexing_is_memoised() {
    let (mut modes, _) = table();
    let first = modes.deflex(MoidId::STRING, Deflexing::Force);
    let count = modes.len();
    let second = modes.deflex(MoidId::STRING, Deflexing::Force);
    assert_eq!(first, second);
    assert_eq!(modes.len(), count);
    assert_eq!(modes[MoidId::STRING].derived.deflexed[2], Some(first));
}

// === Coercion ladder ===

#[test]
fn dereferencing_needs_weak_or_stronger() {
    let (mut modes, _) = table();
    let ref_int = modes.ref_to(MoidId::INT);
    let ref_ref_int = modes.ref_to(ref_int);
    assert!(!modes.is_coercible(ref_int, MoidId::INT, Sort::Soft, Deflexing::No));
    // Weak dereferencing must leave a name.
    assert!(!modes.is_coercible(ref_int, MoidId::INT, Sort::Weak, Deflexing::No));
    assert!(modes.is_coercible(ref_ref_int, ref_int, Sort::Weak, Deflexing::No));
    assert_eq!(
        coercions(modes.coercion_path(ref_ref_int, MoidId::INT, Sort::Meek, Deflexing::No)),
        Some(vec![Coercion::Dereference, Coercion::Dereference])
    );
}

#[test]
fn deproceduring_is_soft() {
    let (mut modes, _) = table();
    let proc_int = modes.proc_of(&[], MoidId::INT);
    assert_eq!(
        coercions(modes.coercion_path(proc_int, MoidId::INT, Sort::Soft, Deflexing::No)),
        Some(vec![Coercion::Deprocedure])
    );
    let proc_of_int = modes.proc_of(&[MoidId::INT], MoidId::INT);
    assert!(!modes.is_coercible(proc_of_int, MoidId::INT, Sort::Strong, Deflexing::No));
}

#[test]
fn uniting_is_firm() {
    let (mut modes, _) = table();
    let u = modes.union_of(&[MoidId::INT, MoidId::CHAR]);
    let ref_int = modes.ref_to(MoidId::INT);
    assert!(!modes.is_coercible(MoidId::INT, u, Sort::Meek, Deflexing::No));
    assert_eq!(
        coercions(modes.coercion_path(ref_int, u, Sort::Firm, Deflexing::No)),
        Some(vec![Coercion::Dereference, Coercion::Unite])
    );
    assert!(!modes.is_coercible(MoidId::REAL, u, Sort::Strong, Deflexing::No));
    assert!(modes.is_coercible(MoidId::ROW_CHAR, MoidId::ROWS, Sort::Firm, Deflexing::No));
}

#[test]
fn strong_conversions() {
    let (mut modes, _) = table();
    let row_real = modes.row_of(MoidId::REAL, 1);
    let ref_int = modes.ref_to(MoidId::INT);
    let row_int = modes.row_of(MoidId::INT, 1);
    let ref_row_int = modes.ref_to(row_int);

    assert!(!modes.is_coercible(MoidId::INT, MoidId::REAL, Sort::Firm, Deflexing::No));
    assert_eq!(
        coercions(modes.coercion_path(ref_int, MoidId::REAL, Sort::Strong, Deflexing::No)),
        Some(vec![Coercion::Dereference, Coercion::Widen])
    );
    assert_eq!(
        coercions(modes.coercion_path(MoidId::INT, row_real, Sort::Strong, Deflexing::No)),
        Some(vec![Coercion::Widen, Coercion::Row])
    );
    assert_eq!(
        coercions(modes.coercion_path(ref_int, ref_row_int, Sort::Strong, Deflexing::No)),
        Some(vec![Coercion::Row])
    );
    assert_eq!(
        coercions(modes.coercion_path(MoidId::BITS, MoidId::ROW_BOOL, Sort::Strong, Deflexing::No)),
        Some(vec![Coercion::Widen])
    );
    assert_eq!(
        coercions(modes.coercion_path(ref_int, MoidId::VOID, Sort::Strong, Deflexing::No)),
        Some(vec![Coercion::Void])
    );
    assert!(!modes.is_coercible(MoidId::REAL, MoidId::INT, Sort::Strong, Deflexing::No));
}

#[test]
fn voiding_calls_parameterless_procedures() {
    let (mut modes, _) = table();
    let proc_int = modes.proc_of(&[], MoidId::INT);
    let proc_void = modes.proc_of(&[], MoidId::VOID);
    assert_eq!(
        coercions(modes.coercion_path(proc_int, MoidId::VOID, Sort::Strong, Deflexing::No)),
        Some(vec![Coercion::Deprocedure, Coercion::Void])
    );
    assert_eq!(
        coercions(modes.coercion_path(proc_void, MoidId::VOID, Sort::Strong, Deflexing::No)),
        Some(vec![Coercion::Deprocedure])
    );
}

#[test]
fn special_modes() {
    let (mut modes, _) = table();
    let row_int = modes.row_of(MoidId::INT, 1);
    assert!(modes.is_coercible(MoidId::HIP, MoidId::INT, Sort::Strong, Deflexing::No));
    assert!(!modes.is_coercible(MoidId::HIP, MoidId::INT, Sort::Firm, Deflexing::No));
    assert!(modes.is_coercible(MoidId::VACUUM, row_int, Sort::Strong, Deflexing::No));
    assert!(modes.is_coercible(MoidId::VACUUM, MoidId::STRING, Sort::Strong, Deflexing::No));
    assert!(!modes.is_coercible(MoidId::VACUUM, MoidId::INT, Sort::Strong, Deflexing::No));
    for sort in Sort::LADDER {
        assert!(modes.is_coercible(MoidId::ERROR, MoidId::INT, sort, Deflexing::No));
        assert!(modes.is_coercible(MoidId::REAL, MoidId::ERROR, sort, Deflexing::No));
    }
}

#[test]
fn flex_rows_need_deflexing() {
    let (mut modes, _) = table();
    assert!(!modes.is_coercible(MoidId::STRING, MoidId::ROW_CHAR, Sort::Meek, Deflexing::No));
    assert!(modes.is_coercible(MoidId::STRING, MoidId::ROW_CHAR, Sort::NoSort, Deflexing::Safe));
}

// === Balancing ===

#[test]
fn balancing_prefers_earlier_alternatives() {
    let (mut modes, _) = table();
    let ref_int = modes.ref_to(MoidId::INT);
    assert_eq!(modes.balance(&[MoidId::INT, MoidId::REAL]), Some(MoidId::REAL));
    assert_eq!(modes.balance(&[ref_int, MoidId::INT]), Some(MoidId::INT));
    assert_eq!(modes.balance(&[ref_int, ref_int]), Some(ref_int));
    assert_eq!(modes.balance(&[MoidId::HIP, MoidId::CHAR]), Some(MoidId::CHAR));
    assert_eq!(modes.balance(&[MoidId::INT, MoidId::BOOL]), None);
    assert_eq!(modes.balance(&[MoidId::ERROR, MoidId::BOOL]), Some(MoidId::ERROR));
}

// === Well-formedness ===

#[test]
fn ill_formed_indicants_are_found() {
    let (mut modes, interner) = table();
    // MODE A = REF A: no STRUCT or PROC on the cycle.
    let a = modes.indicant(interner.intern("A"), NodeId::new(1));
    let ref_a = modes.ref_to(a);
    modes.define_indicant(a, ref_a);
    // MODE B = STRUCT (B b): no REF or PROC on the cycle.
    let b = modes.indicant(interner.intern("B"), NodeId::new(2));
    let sb = modes.struct_of(&[(b, interner.intern("b"))]);
    modes.define_indicant(b, sb);
    // MODE C = PROC C: fine.
    let c = modes.indicant(interner.intern("C"), NodeId::new(3));
    let pc = modes.proc_of(&[], c);
    modes.define_indicant(c, pc);

    assert!(!modes.is_well_formed(a));
    assert!(!modes.is_well_formed(b));
    assert!(modes.is_well_formed(c));

    assert_eq!(modes.check_indicants(), vec![a, b]);
    assert_eq!(modes.resolve(a), MoidId::ERROR);
    assert!(!modes[a].flags.contains(MoidFlags::WELL_FORMED));
}

// === Describe ===

#[test]
fn describe_modes() {
    let (mut modes, interner) = table();
    let ref_int = modes.ref_to(MoidId::INT);
    let matrix = modes.row_of(MoidId::REAL, 2);
    let p = modes.proc_of(&[MoidId::INT, MoidId::STRING], MoidId::BOOL);
    let u = modes.union_of(&[MoidId::INT, MoidId::VOID]);
    let s = modes.struct_of(&[(MoidId::REAL, interner.intern("re"))]);

    assert_eq!(modes.describe(ref_int, &interner), "REF INT");
    assert_eq!(modes.describe(matrix, &interner), "[,] REAL");
    assert_eq!(modes.describe(p, &interner), "PROC (INT, STRING) BOOL");
    assert_eq!(modes.describe(u, &interner), "UNION (INT, VOID)");
    assert_eq!(modes.describe(s, &interner), "STRUCT (REAL re)");
    assert_eq!(modes.describe(MoidId::ROW_CHAR, &interner), "[] CHAR");
    assert_eq!(modes.describe(MoidId::STRING, &interner), "STRING");
}

// === Properties ===

/// A small pool of modes built from the standard ones.
fn pool(modes: &mut ModeTable) -> Vec<MoidId> {
    let mut pool = vec![
        MoidId::INT,
        MoidId::REAL,
        MoidId::BOOL,
        MoidId::CHAR,
        MoidId::BITS,
        MoidId::VOID,
        MoidId::HIP,
        MoidId::STRING,
        MoidId::ROW_CHAR,
        MoidId::ROW_BOOL,
        MoidId::VACUUM,
        MoidId::ROWS,
    ];
    for base in [MoidId::INT, MoidId::REAL, MoidId::STRING] {
        let r = modes.ref_to(base);
        let rr = modes.ref_to(r);
        let row = modes.row_of(base, 1);
        let ref_row = modes.ref_to(row);
        let proc = modes.proc_of(&[], base);
        let proc_ref = modes.proc_of(&[], r);
        pool.extend([r, rr, row, ref_row, proc, proc_ref]);
    }
    let u = modes.union_of(&[MoidId::INT, MoidId::CHAR]);
    let wide = modes.union_of(&[MoidId::INT, MoidId::CHAR, MoidId::REAL]);
    pool.extend([u, wide]);
    pool
}

proptest! {
    #[test]
    fn ladder_is_monotone(p in 0usize..40, q in 0usize..40, deflex in 0usize..4) {
        let (mut modes, _) = table();
        let pool = pool(&mut modes);
        let (p, q) = (pool[p % pool.len()], pool[q % pool.len()]);
        let deflexing = [Deflexing::No, Deflexing::Safe, Deflexing::Alias, Deflexing::Force][deflex];
        let mut seen = false;
        for sort in Sort::LADDER {
            let ok = modes.is_coercible(p, q, sort, deflexing);
            prop_assert!(!seen || ok, "coercible below {:?} but not at it", sort);
            seen |= ok;
        }
    }

    #[test]
    fn equivalence_is_symmetric(p in 0usize..40, q in 0usize..40) {
        let (mut modes, _) = table();
        let pool = pool(&mut modes);
        let (p, q) = (pool[p % pool.len()], pool[q % pool.len()]);
        prop_assert_eq!(modes.equivalent(p, q), modes.equivalent(q, p));
        prop_assert!(modes.equivalent(p, p));
    }
}
