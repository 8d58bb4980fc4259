//! The standard environment.
//!
//! Table 0 holds the standard mode indicants, the priorities of the
//! standard dyadic operators, the standard operators with their modes, and
//! a handful of standard identifiers. It is built once; each compilation
//! clones its tables and mode table as a starting point and never writes
//! back.

use a68_ir::{Access, MoidId, SharedInterner, TableId, Tag, TagKind, Tables, PRIMAL_SCOPE};
use a68_modes::ModeTable;

/// Priorities of the standard dyadic operators.
const PRIORITIES: &[(u8, &[&str])] = &[
    (1, &["+:=", "-:=", "*:=", "/:=", "%:=", "%*:=", "+=:"]),
    (2, &["OR"]),
    (3, &["AND", "&"]),
    (4, &["=", "/="]),
    (5, &["<", "<=", ">", ">="]),
    (6, &["+", "-"]),
    (7, &["*", "/", "%", "%*", "OVER", "MOD", "ELEM"]),
    (8, &["**", "SHL", "SHR", "UP", "DOWN", "LWB", "UPB"]),
];

const COMPARISONS: [&str; 6] = ["=", "/=", "<", "<=", ">", ">="];

/// Table 0 and the modes it refers to.
#[derive(Clone, Debug)]
pub struct StandardEnvironment {
    interner: SharedInterner,
    tables: Tables,
    modes: ModeTable,
}

impl Default for StandardEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardEnvironment {
    #[tracing::instrument(level = "debug")]
    pub fn new() -> Self {
        let interner = SharedInterner::new();
        let modes = ModeTable::new(&interner);
        let mut prelude = Prelude {
            interner: &interner,
            tables: Tables::new(),
            modes,
        };
        prelude.indicants();
        prelude.priorities();
        prelude.operators();
        prelude.identifiers();
        let Prelude { tables, modes, .. } = prelude;
        tracing::debug!(tags = tables.tag_count(), modes = modes.len(), "standard environment");
        StandardEnvironment {
            interner,
            tables,
            modes,
        }
    }

    /// Interner shared by every compilation against this environment.
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn modes(&self) -> &ModeTable {
        &self.modes
    }
}

struct Prelude<'a> {
    interner: &'a SharedInterner,
    tables: Tables,
    modes: ModeTable,
}

impl Prelude<'_> {
    fn enter(&mut self, kind: TagKind, name: &str, mode: Option<MoidId>, priority: u8) {
        let tag = Tag {
            mode,
            priority,
            access: Access::Prelude,
            scope: PRIMAL_SCOPE,
            ..Tag::new(TableId::STANDARD, kind, self.interner.intern(name))
        };
        if self.tables.add_tag(tag).is_err() {
            tracing::trace!(name, "standard tag entered twice");
        }
    }

    fn operator(&mut self, symbol: &str, operands: &[MoidId], result: MoidId) {
        let mode = self.modes.proc_of(operands, result);
        self.enter(TagKind::Operator, symbol, Some(mode), 0);
    }

    fn identifier(&mut self, name: &str, mode: MoidId) {
        self.enter(TagKind::NormalIdentifier, name, Some(mode), 0);
    }

    fn indicants(&mut self) {
        let standard = [
            ("INT", MoidId::INT),
            ("LONG INT", MoidId::LONG_INT),
            ("LONG LONG INT", MoidId::LONG_INT),
            ("REAL", MoidId::REAL),
            ("LONG REAL", MoidId::LONG_REAL),
            ("LONG LONG REAL", MoidId::LONG_REAL),
            ("BOOL", MoidId::BOOL),
            ("CHAR", MoidId::CHAR),
            ("BITS", MoidId::BITS),
            ("STRING", MoidId::STRING),
            ("VOID", MoidId::VOID),
        ];
        for (name, mode) in standard {
            self.enter(TagKind::Indicant, name, Some(mode), 0);
        }
        let (re, im) = (self.interner.intern("re"), self.interner.intern("im"));
        let compl = self.modes.struct_of(&[(MoidId::REAL, re), (MoidId::REAL, im)]);
        self.enter(TagKind::Indicant, "COMPL", Some(compl), 0);
    }

    fn priorities(&mut self) {
        for &(priority, symbols) in PRIORITIES {
            for symbol in symbols {
                self.enter(TagKind::Priority, symbol, None, priority);
            }
        }
    }

    fn operators(&mut self) {
        use MoidId as M;

        for m in [M::INT, M::LONG_INT, M::REAL, M::LONG_REAL] {
            for symbol in ["+", "-", "ABS"] {
                self.operator(symbol, &[m], m);
            }
            for symbol in ["+", "-", "*"] {
                self.operator(symbol, &[m, m], m);
            }
            for symbol in COMPARISONS {
                self.operator(symbol, &[m, m], M::BOOL);
            }
            let name = self.modes.ref_to(m);
            for symbol in ["+:=", "-:=", "*:="] {
                self.operator(symbol, &[name, m], name);
            }
            self.operator("SIGN", &[m], M::INT);
        }

        for (int, real) in [(M::INT, M::REAL), (M::LONG_INT, M::LONG_REAL)] {
            self.operator("/", &[int, int], real);
            self.operator("/", &[real, real], real);
            for (left, right) in [(int, real), (real, int)] {
                for symbol in ["+", "-", "*", "/"] {
                    self.operator(symbol, &[left, right], real);
                }
                for symbol in COMPARISONS {
                    self.operator(symbol, &[left, right], M::BOOL);
                }
            }
            for symbol in ["OVER", "%", "MOD", "%*"] {
                self.operator(symbol, &[int, int], int);
            }
            self.operator("**", &[int, int], int);
            self.operator("**", &[real, int], real);
            self.operator("ODD", &[int], M::BOOL);
            self.operator("ENTIER", &[real], int);
            self.operator("ROUND", &[real], int);
            let int_name = self.modes.ref_to(int);
            for symbol in ["%:=", "%*:="] {
                self.operator(symbol, &[int_name, int], int_name);
            }
            let real_name = self.modes.ref_to(real);
            self.operator("/:=", &[real_name, real], real_name);
        }
        self.operator("LENG", &[M::INT], M::LONG_INT);
        self.operator("LENG", &[M::REAL], M::LONG_REAL);
        self.operator("SHORTEN", &[M::LONG_INT], M::INT);
        self.operator("SHORTEN", &[M::LONG_REAL], M::REAL);

        for symbol in ["NOT", "~"] {
            self.operator(symbol, &[M::BOOL], M::BOOL);
            self.operator(symbol, &[M::BITS], M::BITS);
        }
        for symbol in ["AND", "&", "OR"] {
            self.operator(symbol, &[M::BOOL, M::BOOL], M::BOOL);
            self.operator(symbol, &[M::BITS, M::BITS], M::BITS);
        }
        for symbol in ["=", "/="] {
            self.operator(symbol, &[M::BOOL, M::BOOL], M::BOOL);
            self.operator(symbol, &[M::BITS, M::BITS], M::BOOL);
        }
        for symbol in ["SHL", "SHR", "UP", "DOWN"] {
            self.operator(symbol, &[M::BITS, M::INT], M::BITS);
        }
        self.operator("ELEM", &[M::INT, M::BITS], M::BOOL);
        self.operator("BIN", &[M::INT], M::BITS);
        self.operator("ABS", &[M::BITS], M::INT);

        for symbol in COMPARISONS {
            self.operator(symbol, &[M::CHAR, M::CHAR], M::BOOL);
            self.operator(symbol, &[M::STRING, M::STRING], M::BOOL);
        }
        self.operator("ABS", &[M::CHAR], M::INT);
        self.operator("REPR", &[M::INT], M::CHAR);
        self.operator("+", &[M::STRING, M::STRING], M::STRING);
        self.operator("+", &[M::CHAR, M::CHAR], M::STRING);
        self.operator("+", &[M::STRING, M::CHAR], M::STRING);
        self.operator("+", &[M::CHAR, M::STRING], M::STRING);
        self.operator("*", &[M::INT, M::STRING], M::STRING);
        let string_name = self.modes.ref_to(M::STRING);
        self.operator("+:=", &[string_name, M::STRING], string_name);
        self.operator("+:=", &[string_name, M::CHAR], string_name);
        self.operator("+=:", &[M::STRING, string_name], string_name);

        for symbol in ["LWB", "UPB"] {
            self.operator(symbol, &[M::ROWS], M::INT);
            self.operator(symbol, &[M::INT, M::ROWS], M::INT);
        }
    }

    fn identifiers(&mut self) {
        use MoidId as M;

        self.identifier("pi", M::REAL);
        self.identifier("maxint", M::INT);
        self.identifier("maxreal", M::REAL);
        self.identifier("smallreal", M::REAL);
        self.identifier("blank", M::CHAR);

        let real_function = self.modes.proc_of(&[M::REAL], M::REAL);
        for name in ["sqrt", "sin", "cos", "tan", "exp", "ln", "arctan"] {
            self.identifier(name, real_function);
        }
        let random = self.modes.proc_of(&[], M::REAL);
        self.identifier("random", random);

        let layout = self.modes.proc_of(&[], M::VOID);
        for name in ["newline", "newpage", "space"] {
            self.identifier(name, layout);
        }

        let out = self.modes.unite(&[
            M::INT,
            M::LONG_INT,
            M::REAL,
            M::LONG_REAL,
            M::BOOL,
            M::CHAR,
            M::STRING,
            M::BITS,
            layout,
        ]);
        let outs = self.modes.multiple(out);
        let print = self.modes.proc_of(&[outs], M::VOID);
        for name in ["print", "write"] {
            self.identifier(name, print);
        }

        let names: Vec<MoidId> = [M::INT, M::REAL, M::BOOL, M::CHAR, M::STRING]
            .into_iter()
            .map(|m| self.modes.ref_to(m))
            .collect();
        let mut members = names;
        members.push(layout);
        let into = self.modes.unite(&members);
        let ins = self.modes.multiple(into);
        let read = self.modes.proc_of(&[ins], M::VOID);
        self.identifier("read", read);

        let whole = self.modes.proc_of(&[M::INT, M::INT], M::STRING);
        self.identifier("whole", whole);
    }
}
