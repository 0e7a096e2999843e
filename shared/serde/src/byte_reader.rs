use crate::{SerdeErr, MAX_PREFIXED_LEN};

/// Cursor over a borrowed byte slice
pub struct ByteReader<'b> {
    buffer: &'b [u8],
    cursor: usize,
}

impl<'b> ByteReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'b [u8], SerdeErr> {
        let remaining = self.remaining();
        if count > remaining {
            return Err(SerdeErr::UnexpectedEnd {
                needed: count,
                remaining,
            });
        }
        let start = self.cursor;
        self.cursor += count;
        Ok(&self.buffer[start..self.cursor])
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], SerdeErr> {
        let bytes = self.read_bytes(N)?;
        let mut output = [0u8; N];
        output.copy_from_slice(bytes);
        Ok(output)
    }

    /// Read a `u32` length prefix and check it against what is left, so a
    /// corrupted prefix never turns into a huge allocation
    pub fn read_len_prefix(&mut self, min_item_size: usize) -> Result<usize, SerdeErr> {
        let len = u32::from_le_bytes(self.read_array::<4>()?);
        if len > MAX_PREFIXED_LEN {
            return Err(SerdeErr::LengthLimit {
                len,
                max: MAX_PREFIXED_LEN,
            });
        }
        let len = len as usize;
        let remaining = self.remaining();
        if len.saturating_mul(min_item_size) > remaining {
            return Err(SerdeErr::LengthExceedsInput { len, remaining });
        }
        Ok(len)
    }

    /// Split off a reader over the next `len` bytes and advance past them
    pub fn sub_reader(&mut self, len: usize) -> Result<ByteReader<'b>, SerdeErr> {
        let bytes = self.read_bytes(len)?;
        Ok(ByteReader::new(bytes))
    }

    /// Fails if any bytes were left unread
    pub fn finish(&self) -> Result<(), SerdeErr> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(SerdeErr::TrailingBytes { remaining }),
        }
    }
}
