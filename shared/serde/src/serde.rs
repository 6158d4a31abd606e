use crate::{byte_reader::ByteReader, byte_writer::ByteWrite, error::SerdeErr};

/// A type that can be written to and read back from a byte stream.
/// Implementations must be deterministic: the same value always
/// produces the same bytes.
pub trait Serde: Sized + Clone + PartialEq {
    /// Serialize Self to a ByteWrite
    fn ser(&self, writer: &mut dyn ByteWrite);

    /// Parse Self from a ByteReader
    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr>;

    /// Return length of value in bytes
    fn byte_length(&self) -> u32;
}
