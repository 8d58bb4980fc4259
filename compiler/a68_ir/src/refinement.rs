//! Refinements: named token sequences substituted before parsing.

use crate::{LineId, Name};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Refinement {
    pub name: Name,
    pub line_defined: LineId,
    /// Line of the (single) applied occurrence.
    pub line_applied: Option<LineId>,
    pub applications: u32,
}

impl Refinement {
    pub fn new(name: Name, line_defined: LineId) -> Self {
        Refinement {
            name,
            line_defined,
            line_applied: None,
            applications: 0,
        }
    }
}
