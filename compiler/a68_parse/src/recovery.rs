//! Attribute sets for lookahead and error recovery.

use a68_ir::Attribute;

/// A set of attributes with O(1) membership, one bit per attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AttributeSet([u64; 3]);

impl AttributeSet {
    pub(crate) const fn new() -> Self {
        Self([0; 3])
    }

    #[must_use]
    pub(crate) const fn with(self, attribute: Attribute) -> Self {
        let index = attribute as usize;
        let mut words = self.0;
        words[index / 64] |= 1 << (index % 64);
        Self(words)
    }

    #[inline]
    pub(crate) const fn contains(&self, attribute: Attribute) -> bool {
        let index = attribute as usize;
        self.0[index / 64] & (1 << (index % 64)) != 0
    }
}

/// Ends a phrase of a serial clause.
pub(crate) const PHRASE_END: AttributeSet = AttributeSet::new()
    .with(Attribute::SemiSymbol)
    .with(Attribute::ExitSymbol);

/// Starts a loop clause.
pub(crate) const LOOP_START: AttributeSet = AttributeSet::new()
    .with(Attribute::ForSymbol)
    .with(Attribute::FromSymbol)
    .with(Attribute::BySymbol)
    .with(Attribute::ToSymbol)
    .with(Attribute::WhileSymbol)
    .with(Attribute::DoSymbol);

/// Separates the parts of a conditional clause.
pub(crate) const IF_PARTS: AttributeSet = AttributeSet::new()
    .with(Attribute::ThenSymbol)
    .with(Attribute::ElseSymbol)
    .with(Attribute::ElifSymbol);

/// Separates the parts of a case clause.
pub(crate) const CASE_PARTS: AttributeSet = AttributeSet::new()
    .with(Attribute::InSymbol)
    .with(Attribute::OutSymbol)
    .with(Attribute::OuseSymbol);

/// Separates the parts of a brief choice clause.
pub(crate) const BRIEF_PARTS: AttributeSet = AttributeSet::new()
    .with(Attribute::BarSymbol)
    .with(Attribute::ElseBarSymbol);

/// Denotation lexemes that are primaries as they stand.
pub(crate) const DENOTATIONS: AttributeSet = AttributeSet::new()
    .with(Attribute::IntDenotation)
    .with(Attribute::RealDenotation)
    .with(Attribute::BitsDenotation)
    .with(Attribute::RowCharDenotation);

#[cfg(test)]
mod tests;
