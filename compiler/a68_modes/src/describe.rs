//! Modes written as Algol 68 text, for diagnostics.

use a68_ir::{MoidId, StringInterner};

use crate::moid::ModeKind;
use crate::ModeTable;

impl ModeTable {
    /// Render `m` as a declarer: `REF [] INT`, `PROC (REAL) BOOL`.
    ///
    /// Named modes inside another mode are shown by name, which also keeps
    /// recursive modes finite.
    pub fn describe(&self, m: MoidId, interner: &StringInterner) -> String {
        let mut buf = String::new();
        self.describe_into(m, interner, 0, &mut buf);
        buf
    }

    fn describe_into(&self, m: MoidId, interner: &StringInterner, depth: usize, buf: &mut String) {
        let id = self.resolve(m);
        let moid = self.moid(id);
        let named = !moid.name.is_empty();
        if named && (id.is_primitive() || depth > 0 || moid.kind == ModeKind::Indicant) {
            buf.push_str(interner.lookup(moid.name));
            return;
        }
        if depth > 16 {
            buf.push_str("...");
            return;
        }
        match moid.kind {
            ModeKind::Ref => {
                buf.push_str("REF ");
                self.describe_sub(moid.sub, interner, depth, buf);
            }
            ModeKind::Row => {
                buf.push('[');
                for _ in 1..moid.dim {
                    buf.push(',');
                }
                buf.push_str("] ");
                self.describe_sub(moid.sub, interner, depth, buf);
            }
            ModeKind::Flex => {
                buf.push_str("FLEX ");
                self.describe_sub(moid.sub, interner, depth, buf);
            }
            ModeKind::Proc => {
                buf.push_str("PROC ");
                if !moid.pack.is_empty() {
                    buf.push('(');
                    for (i, p) in moid.pack.iter().enumerate() {
                        if i > 0 {
                            buf.push_str(", ");
                        }
                        self.describe_into(p.mode, interner, depth + 1, buf);
                    }
                    buf.push_str(") ");
                }
                self.describe_sub(moid.sub, interner, depth, buf);
            }
            ModeKind::Struct | ModeKind::Union => {
                let is_struct = moid.kind == ModeKind::Struct;
                buf.push_str(if is_struct { "STRUCT (" } else { "UNION (" });
                for (i, p) in moid.pack.iter().enumerate() {
                    if i > 0 {
                        buf.push_str(", ");
                    }
                    self.describe_into(p.mode, interner, depth + 1, buf);
                    if is_struct {
                        buf.push(' ');
                        buf.push_str(interner.lookup(p.text));
                    }
                }
                buf.push(')');
            }
            ModeKind::Standard
            | ModeKind::Indicant
            | ModeKind::Void
            | ModeKind::Hip
            | ModeKind::Error
            | ModeKind::Undefined
            | ModeKind::Vacuum
            | ModeKind::Rows => buf.push_str(interner.lookup(moid.name)),
        }
    }

    fn describe_sub(
        &self,
        sub: Option<MoidId>,
        interner: &StringInterner,
        depth: usize,
        buf: &mut String,
    ) {
        match sub {
            Some(sub) => self.describe_into(sub, interner, depth + 1, buf),
            None => buf.push('?'),
        }
    }
}
