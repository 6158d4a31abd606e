use replica_serde::{ByteReader, ByteWrite, ByteWriter, Serde, SerdeErr, UnsignedVariableInteger};

use crate::{
    delta::Snapshot,
    dirty::{bit_index::BitIndex, dirty_bits::DirtyBits, layout::ReplicaLayout},
};

/// An object whose replicated members can be serialized in full or by
/// dirty bits. Implemented by `replicate!`.
pub trait Replicate {
    /// Member names in bit order
    fn layout() -> &'static ReplicaLayout
    where
        Self: Sized;

    fn dirty_bits(&self) -> &DirtyBits;

    fn dirty_bits_mut(&mut self) -> &mut DirtyBits;

    /// Writes every replicated member in declaration order
    fn write_snapshot(&self, writer: &mut dyn ByteWrite);

    /// Reads state written by `write_snapshot`. Every member is decoded
    /// before any is applied, so on error the object is unchanged. Hooks
    /// fire for each applied field, nothing is marked dirty.
    fn read_snapshot_with(
        &mut self,
        reader: &mut ByteReader,
        remainder: Remainder,
    ) -> Result<(), SerdeErr>;

    /// Writes both masks, then only the members they flag
    fn write_dirty(&self, writer: &mut dyn ByteWrite);

    /// Reads state written by `write_dirty`, decoding everything before
    /// applying anything
    fn read_dirty_with(
        &mut self,
        reader: &mut ByteReader,
        remainder: Remainder,
    ) -> Result<(), SerdeErr>;

    /// Reads one snapshot from a stream that may hold more after it
    fn read_snapshot(&mut self, reader: &mut ByteReader) -> Result<(), SerdeErr> {
        self.read_snapshot_with(reader, Remainder::Allowed)
    }

    /// Reads one dirty update from a stream that may hold more after it
    fn read_dirty(&mut self, reader: &mut ByteReader) -> Result<(), SerdeErr> {
        self.read_dirty_with(reader, Remainder::Allowed)
    }

    fn snapshot(&self) -> Snapshot {
        let mut writer = ByteWriter::new();
        self.write_snapshot(&mut writer);
        Snapshot::from(writer)
    }

    /// Applies a whole snapshot. Leftover input is an error and leaves the
    /// object unchanged.
    fn apply_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), SerdeErr> {
        self.read_snapshot_with(&mut snapshot.reader(), Remainder::Rejected)
    }

    /// Applies a whole dirty update, see `apply_snapshot`
    fn apply_dirty(&mut self, bytes: &[u8]) -> Result<(), SerdeErr> {
        self.read_dirty_with(&mut ByteReader::new(bytes), Remainder::Rejected)
    }
}

/// Whether input may follow the last member of a read
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Remainder {
    Allowed,
    Rejected,
}

impl Remainder {
    /// Checked after decoding and before applying
    pub fn check(self, reader: &ByteReader) -> Result<(), SerdeErr> {
        match self {
            Remainder::Rejected if !reader.is_finished() => Err(SerdeErr::TrailingBytes {
                remaining: reader.remaining(),
            }),
            _ => Ok(()),
        }
    }
}

/// Mask header of a dirty-only update
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirtyHeader {
    pub scalar: u64,
    pub collection: u64,
}

impl DirtyHeader {
    pub fn of(dirty_bits: &DirtyBits) -> Self {
        Self {
            scalar: dirty_bits.scalar_bits(),
            collection: dirty_bits.collection_bits(),
        }
    }

    pub fn write(&self, writer: &mut dyn ByteWrite) {
        UnsignedVariableInteger::new(self.scalar).ser(writer);
        UnsignedVariableInteger::new(self.collection).ser(writer);
    }

    pub fn read(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            scalar: UnsignedVariableInteger::de(reader)?.get(),
            collection: UnsignedVariableInteger::de(reader)?.get(),
        })
    }

    pub fn has_scalar(&self, index: BitIndex) -> bool {
        self.scalar & index.mask() != 0
    }

    pub fn has_collection(&self, index: BitIndex) -> bool {
        self.collection & index.mask() != 0
    }
}
