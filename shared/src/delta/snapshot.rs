use std::ops::Deref;

use replica_serde::{ByteReader, ByteWrite, ByteWriter, Serde, SerdeErr, UnsignedVariableInteger};

/// The serialized state of one object at one point in time
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Snapshot(Vec<u8>);

/// Instructions rebuilding one snapshot from another
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Delta(Vec<u8>);

impl Snapshot {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Serializes `value` into a new snapshot
    pub fn of<S: Serde>(value: &S) -> Self {
        let mut writer = ByteWriter::with_capacity(value.byte_length() as usize);
        value.ser(&mut writer);
        Self(writer.to_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn reader(&self) -> ByteReader<'_> {
        ByteReader::new(&self.0)
    }
}

impl Delta {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

macro_rules! impl_byte_blob {
    ($($blob:ident),*) => {
        $(
            impl Deref for $blob {
                type Target = [u8];

                fn deref(&self) -> &Self::Target {
                    &self.0
                }
            }

            impl From<Vec<u8>> for $blob {
                fn from(bytes: Vec<u8>) -> Self {
                    Self(bytes)
                }
            }

            impl From<ByteWriter> for $blob {
                fn from(writer: ByteWriter) -> Self {
                    Self(writer.to_bytes())
                }
            }

            impl Serde for $blob {
                fn ser(&self, writer: &mut dyn ByteWrite) {
                    UnsignedVariableInteger::write_usize(self.0.len(), writer);
                    writer.write_bytes(&self.0);
                }

                fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
                    let length = UnsignedVariableInteger::read_usize(reader)?;
                    Ok(Self(reader.read_bytes(length)?.to_vec()))
                }

                fn byte_length(&self) -> u32 {
                    UnsignedVariableInteger::new(self.0.len() as u64).byte_length()
                        + self.0.len() as u32
                }
            }
        )*
    };
}

impl_byte_blob!(Snapshot, Delta);
