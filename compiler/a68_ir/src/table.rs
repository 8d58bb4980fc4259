//! Symbol tables and tags.
//!
//! One [`SymbolTable`] exists per lexical range. It holds independent tag
//! chains per namespace and a link to the enclosing table. Lookup searches
//! the local chain first and then walks `previous` links outward, ending at
//! the standard environment ([`TableId::STANDARD`]).

use std::ops::{Index, IndexMut};

use crate::{MoidId, Name, NodeId, TableId, TagId};

/// Level of the primal scope: the standard environment and anything
/// allocated on the heap.
pub const PRIMAL_SCOPE: u32 = 0;

/// Tag namespace; each has its own chain per table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Namespace {
    Identifier,
    Operator,
    Priority,
    Indicant,
    Label,
    Anonymous,
}

/// What kind of declaration a tag records.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TagKind {
    NormalIdentifier,
    LoopIdentifier,
    ParameterIdentifier,
    SpecifierIdentifier,
    Operator,
    Priority,
    Indicant,
    Label,
    /// Compiler-synthesised, e.g. generator temporaries.
    Anonymous,
}

impl TagKind {
    /// Namespace whose chain holds tags of this kind.
    pub const fn namespace(self) -> Namespace {
        match self {
            TagKind::NormalIdentifier
            | TagKind::LoopIdentifier
            | TagKind::ParameterIdentifier
            | TagKind::SpecifierIdentifier => Namespace::Identifier,
            TagKind::Operator => Namespace::Operator,
            TagKind::Priority => Namespace::Priority,
            TagKind::Indicant => Namespace::Indicant,
            TagKind::Label => Namespace::Label,
            TagKind::Anonymous => Namespace::Anonymous,
        }
    }
}

/// Where a declaration comes from.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Access {
    /// Declared in the program.
    #[default]
    Public,
    /// Declared by the standard environment before the program.
    Prelude,
    /// Declared by the standard environment after the program.
    Postlude,
}

/// A declared name binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub table: TableId,
    pub kind: TagKind,
    pub name: Name,
    pub mode: Option<MoidId>,
    /// Defining occurrence; `None` for standard environment tags.
    pub node: Option<NodeId>,
    /// Operator priority (1..=9) for priority tags.
    pub priority: u8,
    pub heap: bool,
    pub access: Access,
    /// Scope level of the value the tag denotes.
    pub scope: u32,
    /// Set once an applied occurrence binds to this tag.
    pub used: bool,
    /// Frame offset, assigned by a later layout pass.
    pub offset: u32,
}

impl Tag {
    pub fn new(table: TableId, kind: TagKind, name: Name) -> Self {
        Tag {
            table,
            kind,
            name,
            mode: None,
            node: None,
            priority: 0,
            heap: false,
            access: Access::Public,
            scope: PRIMAL_SCOPE,
            used: false,
            offset: 0,
        }
    }
}

/// The tags visible at one lexical level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolTable {
    /// Lexical depth; the standard environment is 0.
    pub level: u32,
    /// Number of enclosing routine texts.
    pub proc_level: u32,
    pub previous: Option<TableId>,
    /// Node that opened this range.
    pub node: Option<NodeId>,
    pub identifiers: Vec<TagId>,
    pub operators: Vec<TagId>,
    pub priorities: Vec<TagId>,
    pub indicants: Vec<TagId>,
    pub labels: Vec<TagId>,
    pub anonymous: Vec<TagId>,
}

impl SymbolTable {
    /// The chain for `namespace`.
    pub fn chain(&self, namespace: Namespace) -> &[TagId] {
        match namespace {
            Namespace::Identifier => &self.identifiers,
            Namespace::Operator => &self.operators,
            Namespace::Priority => &self.priorities,
            Namespace::Indicant => &self.indicants,
            Namespace::Label => &self.labels,
            Namespace::Anonymous => &self.anonymous,
        }
    }

    fn chain_mut(&mut self, namespace: Namespace) -> &mut Vec<TagId> {
        match namespace {
            Namespace::Identifier => &mut self.identifiers,
            Namespace::Operator => &mut self.operators,
            Namespace::Priority => &mut self.priorities,
            Namespace::Indicant => &mut self.indicants,
            Namespace::Label => &mut self.labels,
            Namespace::Anonymous => &mut self.anonymous,
        }
    }
}

/// Arena of symbol tables and their tags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tables {
    tables: Vec<SymbolTable>,
    tags: Vec<Tag>,
}

impl Default for Tables {
    fn default() -> Self {
        Self::new()
    }
}

impl Tables {
    /// Create an arena holding only the (empty) standard environment table.
    pub fn new() -> Self {
        Tables {
            tables: vec![SymbolTable::default()],
            tags: Vec::new(),
        }
    }

    /// Open a range nested in `previous`.
    ///
    /// `routine` marks the range of a routine text, which raises the
    /// procedure level.
    pub fn open(&mut self, previous: TableId, node: Option<NodeId>, routine: bool) -> TableId {
        let outer = &self[previous];
        let table = SymbolTable {
            level: outer.level + 1,
            proc_level: outer.proc_level + u32::from(routine),
            previous: Some(previous),
            node,
            ..SymbolTable::default()
        };
        let id = TableId::from_usize(self.tables.len());
        self.tables.push(table);
        id
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    pub fn tag(&self, id: TagId) -> &Tag {
        &self.tags[id.index()]
    }

    pub fn tag_mut(&mut self, id: TagId) -> &mut Tag {
        &mut self.tags[id.index()]
    }

    /// Iterate over every tag with its handle.
    pub fn tags(&self) -> impl Iterator<Item = (TagId, &Tag)> {
        self.tags
            .iter()
            .enumerate()
            .map(|(i, tag)| (TagId::from_usize(i), tag))
    }

    /// Enter `tag` into its table's chain.
    ///
    /// Returns `Err(existing)` when the table already binds the name in the
    /// same namespace; the existing tag is left untouched. Operators are
    /// exempt because they overload on operand modes.
    pub fn add_tag(&mut self, tag: Tag) -> Result<TagId, TagId> {
        let namespace = tag.kind.namespace();
        if namespace != Namespace::Operator && namespace != Namespace::Anonymous {
            if let Some(existing) = self.find_local(tag.table, namespace, tag.name) {
                return Err(existing);
            }
        }
        let id = TagId::from_usize(self.tags.len());
        let table = tag.table;
        self.tags.push(tag);
        self[table].chain_mut(namespace).push(id);
        Ok(id)
    }

    /// Find `name` in the chain of `table` only.
    pub fn find_local(&self, table: TableId, namespace: Namespace, name: Name) -> Option<TagId> {
        self[table]
            .chain(namespace)
            .iter()
            .copied()
            .find(|&t| self.tag(t).name == name)
    }

    /// Find `name` in `table` or the nearest enclosing table that binds it.
    pub fn lookup(&self, table: TableId, namespace: Namespace, name: Name) -> Option<TagId> {
        self.scopes(table)
            .find_map(|t| self.find_local(t, namespace, name))
    }

    /// All operator tags named `name` declared directly in `table`.
    pub fn operators_in(&self, table: TableId, name: Name) -> Vec<TagId> {
        self[table]
            .operators
            .iter()
            .copied()
            .filter(|&t| self.tag(t).name == name)
            .collect()
    }

    /// Priority of dyadic operator `name` as seen from `table`.
    pub fn priority_of(&self, table: TableId, name: Name) -> Option<u8> {
        self.lookup(table, Namespace::Priority, name)
            .map(|t| self.tag(t).priority)
    }

    /// `table` followed by each enclosing table, outward.
    pub fn scopes(&self, table: TableId) -> Scopes<'_> {
        Scopes {
            tables: self,
            cursor: Some(table),
        }
    }

    /// Whether `inner` is `outer` or nested inside it.
    pub fn is_within(&self, inner: TableId, outer: TableId) -> bool {
        self.scopes(inner).any(|t| t == outer)
    }
}

impl Index<TableId> for Tables {
    type Output = SymbolTable;

    fn index(&self, id: TableId) -> &SymbolTable {
        &self.tables[id.index()]
    }
}

impl IndexMut<TableId> for Tables {
    fn index_mut(&mut self, id: TableId) -> &mut SymbolTable {
        &mut self.tables[id.index()]
    }
}

/// Iterator from a table outward through `previous` links.
pub struct Scopes<'a> {
    tables: &'a Tables,
    cursor: Option<TableId>,
}

impl Iterator for Scopes<'_> {
    type Item = TableId;

    fn next(&mut self) -> Option<TableId> {
        let current = self.cursor?;
        self.cursor = self.tables[current].previous;
        Some(current)
    }
}

#[cfg(test)]
mod tests;
