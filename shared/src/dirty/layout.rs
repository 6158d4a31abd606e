use super::{bit_index::BitIndex, error::DirtyBitsError, MASK_WIDTH};

/// Per-type index table: bit `i` of a mask belongs to entry `i`.
/// Assigned once, in declaration order, when the type is woven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicaLayout {
    type_name: &'static str,
    scalars: &'static [&'static str],
    collections: &'static [&'static str],
}

impl ReplicaLayout {
    /// Panics (a compile error in `const` context) if either table is wider than a mask
    pub const fn new(
        type_name: &'static str,
        scalars: &'static [&'static str],
        collections: &'static [&'static str],
    ) -> Self {
        assert!(
            scalars.len() <= MASK_WIDTH,
            "too many replicated fields for one dirty mask"
        );
        assert!(
            collections.len() <= MASK_WIDTH,
            "too many replicated collections for one dirty mask"
        );
        Self {
            type_name,
            scalars,
            collections,
        }
    }

    pub fn try_new(
        type_name: &'static str,
        scalars: &'static [&'static str],
        collections: &'static [&'static str],
    ) -> Result<Self, DirtyBitsError> {
        for (kind, count) in [("fields", scalars.len()), ("collections", collections.len())] {
            if count > MASK_WIDTH {
                return Err(DirtyBitsError::LayoutTooWide {
                    type_name,
                    kind,
                    count,
                    width: MASK_WIDTH,
                });
            }
        }
        Ok(Self {
            type_name,
            scalars,
            collections,
        })
    }

    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub const fn scalars(&self) -> &'static [&'static str] {
        self.scalars
    }

    pub const fn collections(&self) -> &'static [&'static str] {
        self.collections
    }

    pub fn scalar_index(&self, name: &str) -> Option<BitIndex> {
        index_of(self.scalars, name)
    }

    pub fn collection_index(&self, name: &str) -> Option<BitIndex> {
        index_of(self.collections, name)
    }

    pub fn scalar_names(&self, bits: u64) -> Vec<&'static str> {
        names_in(self.scalars, bits)
    }

    pub fn collection_names(&self, bits: u64) -> Vec<&'static str> {
        names_in(self.collections, bits)
    }
}

fn index_of(table: &[&str], name: &str) -> Option<BitIndex> {
    let position = table.iter().position(|entry| *entry == name)?;
    BitIndex::try_new(position).ok()
}

fn names_in(table: &'static [&'static str], bits: u64) -> Vec<&'static str> {
    table
        .iter()
        .enumerate()
        .filter(|(index, _)| bits & (1u64 << index) != 0)
        .map(|(_, name)| *name)
        .collect()
}
