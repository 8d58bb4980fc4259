use pretty_assertions::assert_eq;

use super::*;

fn identifier(table: TableId, name: Name) -> Tag {
    Tag::new(table, TagKind::NormalIdentifier, name)
}

#[test]
fn nested_levels() {
    let mut tables = Tables::new();
    let program = tables.open(TableId::STANDARD, None, false);
    let routine = tables.open(program, None, true);
    let block = tables.open(routine, None, false);

    assert_eq!(tables[program].level, 1);
    assert_eq!(tables[block].level, 3);
    assert_eq!(tables[block].proc_level, 1);
    assert_eq!(
        tables.scopes(block).collect::<Vec<_>>(),
        vec![block, routine, program, TableId::STANDARD]
    );
    assert!(tables.is_within(block, program));
    assert!(!tables.is_within(program, block));
}

#[test]
fn nearest_declaration_shadows() {
    let x = Name::from_raw(1);
    let mut tables = Tables::new();
    let l0 = tables.open(TableId::STANDARD, None, false);
    let l1 = tables.open(l0, None, false);
    let l2 = tables.open(l1, None, false);

    let outer = tables.add_tag(identifier(l0, x));
    let middle = tables.add_tag(identifier(l1, x));
    assert!(outer.is_ok());

    assert_eq!(tables.lookup(l2, Namespace::Identifier, x), middle.ok());
    assert_eq!(tables.lookup(l0, Namespace::Identifier, x), outer.ok());
    assert_eq!(tables.lookup(l2, Namespace::Label, x), None);
}

#[test]
fn duplicate_declaration_is_rejected() {
    let x = Name::from_raw(1);
    let mut tables = Tables::new();
    let program = tables.open(TableId::STANDARD, None, false);

    let first = tables.add_tag(identifier(program, x));
    let second = tables.add_tag(identifier(program, x));
    assert_eq!(second, Err(first.unwrap_or(TagId::new(u32::MAX))));
    assert_eq!(tables[program].identifiers.len(), 1);

    // A label of the same name lives in another namespace.
    assert!(tables.add_tag(Tag::new(program, TagKind::Label, x)).is_ok());
}

#[test]
fn operators_overload() {
    let plus = Name::from_raw(2);
    let mut tables = Tables::new();
    let program = tables.open(TableId::STANDARD, None, false);

    let a = tables.add_tag(Tag::new(program, TagKind::Operator, plus));
    let b = tables.add_tag(Tag::new(program, TagKind::Operator, plus));
    assert!(a.is_ok() && b.is_ok());
    assert_eq!(tables.operators_in(program, plus).len(), 2);
}

#[test]
fn priority_lookup_walks_outward() {
    let plus = Name::from_raw(2);
    let mut tables = Tables::new();
    let mut prio = Tag::new(TableId::STANDARD, TagKind::Priority, plus);
    prio.priority = 6;
    assert!(tables.add_tag(prio).is_ok());
    let program = tables.open(TableId::STANDARD, None, false);

    assert_eq!(tables.priority_of(program, plus), Some(6));
    assert_eq!(tables.priority_of(program, Name::from_raw(3)), None);
}
