//! Cursor over raw script bytes.

use crate::ScriptError;

/// A cursor-based reader for script binary data.
///
/// Every read either returns exactly the requested bytes or fails with
/// `InsufficientData`; nothing is consumed on failure.
pub struct ScriptReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ScriptReader<'a> {
    /// Create a new reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        ScriptReader { data, pos: 0 }
    }

    /// Read `n` bytes and advance the position.
    ///
    /// # Arguments
    /// * `n` - Number of bytes to read.
    ///
    /// # Returns
    /// A byte slice of length `n`, or `InsufficientData` if fewer remain.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ScriptError> {
        let available = self.remaining();
        if n > available {
            return Err(ScriptError::InsufficientData {
                requested: n,
                available,
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, ScriptError> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    /// Read a little-endian u16.
    pub fn read_u16_le(&mut self) -> Result<u16, ScriptError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Read a little-endian u32.
    pub fn read_u32_le(&mut self) -> Result<u32, ScriptError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whether the whole buffer has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Current read offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }
}
