use super::error::DecodeError;

/// Bounds-checked view over a sensor payload.
pub struct PayloadReader<'a> {
    payload: &'a [u8],
}

impl<'a> PayloadReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn require_len(&self, needed: usize) -> Result<(), DecodeError> {
        if self.payload.len() < needed {
            return Err(DecodeError::BufferTooShort {
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    /// Borrow `width` bytes starting at `offset`.
    pub fn read_span(&self, offset: usize, width: usize) -> Result<&'a [u8], DecodeError> {
        let end = offset
            .checked_add(width)
            .ok_or(DecodeError::BufferTooShort {
                needed: usize::MAX,
                actual: self.payload.len(),
            })?;
        self.payload
            .get(offset..end)
            .ok_or(DecodeError::BufferTooShort {
                needed: end,
                actual: self.payload.len(),
            })
    }
}
