use crate::{byte_reader::ByteReader, byte_writer::ByteWrite, error::SerdeErr, serde::Serde};

/// Upper bound of bytes an encoded u64 can take
pub const MAX_VARINT_BYTES: usize = 10;

/// Unsigned integer written 7 bits at a time, least significant group
/// first, with the high bit of each byte flagging a continuation.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct UnsignedVariableInteger {
    inner: u64,
}

impl UnsignedVariableInteger {
    pub fn new<T: Into<u64>>(value: T) -> Self {
        Self {
            inner: value.into(),
        }
    }

    pub fn get(&self) -> u64 {
        self.inner
    }

    pub fn set<T: Into<u64>>(&mut self, value: T) {
        self.inner = value.into();
    }

    /// Encodes a usize without a detour through an intermediate wrapper
    pub fn write_usize(value: usize, writer: &mut dyn ByteWrite) {
        Self::new(value as u64).ser(writer);
    }

    /// Decodes a length or offset, failing if it does not fit in a usize
    pub fn read_usize(reader: &mut ByteReader) -> Result<usize, SerdeErr> {
        let value = Self::de(reader)?.get();
        usize::try_from(value).map_err(|_| SerdeErr::LengthOverflow { length: value })
    }
}

impl Serde for UnsignedVariableInteger {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        let mut value = self.inner;
        loop {
            let group = (value & 0x7F) as u8;
            value >>= 7;
            if value == 0 {
                writer.write_byte(group);
                return;
            }
            writer.write_byte(group | 0x80);
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let mut output: u64 = 0;
        for index in 0..MAX_VARINT_BYTES {
            let byte = reader.read_byte()?;
            let group = u64::from(byte & 0x7F);
            let shift = 7 * index as u32;
            // the tenth byte may only carry the single remaining bit
            if index == MAX_VARINT_BYTES - 1 && group > 1 {
                return Err(SerdeErr::VarintOverflow);
            }
            output |= group << shift;
            if byte & 0x80 == 0 {
                return Ok(Self { inner: output });
            }
        }
        Err(SerdeErr::VarintOverflow)
    }

    fn byte_length(&self) -> u32 {
        let mut value = self.inner >> 7;
        let mut output = 1;
        while value != 0 {
            output += 1;
            value >>= 7;
        }
        output
    }
}

impl From<u64> for UnsignedVariableInteger {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

/// Maps signed integers onto unsigned ones so small magnitudes stay small
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

pub fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}
