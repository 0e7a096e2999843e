use crate::{ByteReader, ByteWriter, ConstByteLength, Serde, SerdeErr};

// Numbers

macro_rules! impl_serde_for_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Serde for $ty {
                fn ser(&self, writer: &mut ByteWriter) {
                    writer.write_bytes(&self.to_le_bytes());
                }

                fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
                    Ok(<$ty>::from_le_bytes(reader.read_array()?))
                }

                fn byte_length(&self) -> usize {
                    std::mem::size_of::<$ty>()
                }
            }

            impl ConstByteLength for $ty {
                fn const_byte_length() -> usize {
                    std::mem::size_of::<$ty>()
                }
            }
        )*
    };
}

impl_serde_for_number!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

// Bool

impl Serde for bool {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_byte(u8::from(*self));
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(SerdeErr::InvalidBool(other)),
        }
    }

    fn byte_length(&self) -> usize {
        1
    }
}

impl ConstByteLength for bool {
    fn const_byte_length() -> usize {
        1
    }
}

// Text

impl Serde for String {
    fn ser(&self, writer: &mut ByteWriter) {
        (self.len() as u32).ser(writer);
        writer.write_bytes(self.as_bytes());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let len = reader.read_len_prefix(1)?;
        let bytes = reader.read_bytes(len)?;
        let text = std::str::from_utf8(bytes).map_err(|_| SerdeErr::InvalidUtf8)?;
        Ok(text.to_string())
    }

    fn byte_length(&self) -> usize {
        4 + self.len()
    }
}

// Containers

impl<T: Serde> Serde for Option<T> {
    fn ser(&self, writer: &mut ByteWriter) {
        match self {
            Some(value) => {
                true.ser(writer);
                value.ser(writer);
            }
            None => false.ser(writer),
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(None),
            1 => Ok(Some(T::de(reader)?)),
            tag => Err(SerdeErr::InvalidTag {
                type_name: "Option",
                tag: u32::from(tag),
            }),
        }
    }

    fn byte_length(&self) -> usize {
        1 + self.as_ref().map_or(0, Serde::byte_length)
    }
}

impl<T: Serde> Serde for Vec<T> {
    fn ser(&self, writer: &mut ByteWriter) {
        (self.len() as u32).ser(writer);
        for item in self {
            item.ser(writer);
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let len = reader.read_len_prefix(1)?;
        let mut output = Vec::with_capacity(len);
        for _ in 0..len {
            output.push(T::de(reader)?);
        }
        Ok(output)
    }

    fn byte_length(&self) -> usize {
        4 + self.iter().map(Serde::byte_length).sum::<usize>()
    }
}

impl<T: Serde, const N: usize> Serde for [T; N] {
    fn ser(&self, writer: &mut ByteWriter) {
        for item in self {
            item.ser(writer);
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(T::de(reader)?);
        }
        items.try_into().map_err(|_| SerdeErr::InvalidTag {
            type_name: "array",
            tag: N as u32,
        })
    }

    fn byte_length(&self) -> usize {
        self.iter().map(Serde::byte_length).sum()
    }
}

impl<A: Serde, B: Serde> Serde for (A, B) {
    fn ser(&self, writer: &mut ByteWriter) {
        self.0.ser(writer);
        self.1.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok((A::de(reader)?, B::de(reader)?))
    }

    fn byte_length(&self) -> usize {
        self.0.byte_length() + self.1.byte_length()
    }
}
