use crate::{
    byte_reader::ByteReader, byte_writer::ByteWrite, error::SerdeErr,
    integer::UnsignedVariableInteger, serde::Serde,
};

// Numbers are fixed width, little endian

macro_rules! impl_serde_for_number {
    ($($impl_type:ty),*) => {
        $(
            impl Serde for $impl_type {
                fn ser(&self, writer: &mut dyn ByteWrite) {
                    writer.write_bytes(&self.to_le_bytes());
                }

                fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
                    let bytes = reader.read_array::<{ std::mem::size_of::<$impl_type>() }>()?;
                    Ok(<$impl_type>::from_le_bytes(bytes))
                }

                fn byte_length(&self) -> u32 {
                    std::mem::size_of::<$impl_type>() as u32
                }
            }
        )*
    };
}

impl_serde_for_number!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl Serde for bool {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(u8::from(*self));
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            tag => Err(SerdeErr::InvalidTag {
                type_name: "bool",
                tag,
            }),
        }
    }

    fn byte_length(&self) -> u32 {
        1
    }
}

impl Serde for String {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        UnsignedVariableInteger::write_usize(self.len(), writer);
        writer.write_bytes(self.as_bytes());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let length = UnsignedVariableInteger::read_usize(reader)?;
        let bytes = reader.read_bytes(length)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| SerdeErr::InvalidUtf8)
    }

    fn byte_length(&self) -> u32 {
        UnsignedVariableInteger::new(self.len() as u64).byte_length() + self.len() as u32
    }
}

impl<T: Serde> Serde for Vec<T> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        UnsignedVariableInteger::write_usize(self.len(), writer);
        for item in self {
            item.ser(writer);
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let length = UnsignedVariableInteger::read_usize(reader)?;
        // never trust a length prefix for the allocation size
        let mut output = Vec::with_capacity(length.min(reader.remaining()));
        for _ in 0..length {
            output.push(T::de(reader)?);
        }
        Ok(output)
    }

    fn byte_length(&self) -> u32 {
        let prefix = UnsignedVariableInteger::new(self.len() as u64).byte_length();
        self.iter().fold(prefix, |acc, item| acc + item.byte_length())
    }
}

impl<T: Serde> Serde for Option<T> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        match self {
            Some(value) => {
                writer.write_byte(1);
                value.ser(writer);
            }
            None => writer.write_byte(0),
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(None),
            1 => Ok(Some(T::de(reader)?)),
            tag => Err(SerdeErr::InvalidTag {
                type_name: "Option",
                tag,
            }),
        }
    }

    fn byte_length(&self) -> u32 {
        match self {
            Some(value) => 1 + value.byte_length(),
            None => 1,
        }
    }
}

impl<A: Serde, B: Serde> Serde for (A, B) {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.0.ser(writer);
        self.1.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let a = A::de(reader)?;
        let b = B::de(reader)?;
        Ok((a, b))
    }

    fn byte_length(&self) -> u32 {
        self.0.byte_length() + self.1.byte_length()
    }
}
