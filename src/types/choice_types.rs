use crate::consts::hash_consts::ADDRESS_WIDTH;

/// One entry of a choice vector: composite-hash bit `i` is taken from
/// bit `bit` of the hash of attribute `attr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceBit {
    pub attr: u8,
    pub bit: u8,
}

/// Maps every bit position of a composite bucket address to an
/// (attribute, source bit) pair. Fixed at relation creation and
/// persisted verbatim in the relation header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceVector {
    pub bits: [ChoiceBit; ADDRESS_WIDTH],
}
