use super::{error::DirtyBitsError, MASK_WIDTH};

/// Position of one replicated member in a dirty mask
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitIndex(u8);

impl BitIndex {
    /// Panics if `index` does not fit in the mask. Evaluated in a `const`,
    /// that panic is a compile error.
    pub const fn new(index: u8) -> Self {
        assert!((index as usize) < MASK_WIDTH, "dirty bit index out of range");
        Self(index)
    }

    pub fn try_new(index: usize) -> Result<Self, DirtyBitsError> {
        match u8::try_from(index) {
            Ok(small) if index < MASK_WIDTH => Ok(Self(small)),
            _ => Err(DirtyBitsError::IndexOutOfRange {
                index,
                width: MASK_WIDTH,
            }),
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn mask(self) -> u64 {
        1u64 << self.0
    }
}
