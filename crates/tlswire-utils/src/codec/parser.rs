//! Bounds-checked TLS wire parser.

use tlswire_types::TlsError;

/// A streaming reader over big-endian TLS structures.
///
/// All reads fail with [`TlsError::OutOfData`] rather than panic when the
/// buffer is exhausted. Length-prefixed regions are read through
/// [`Parser::scoped`], which requires the body to consume the declared
/// length exactly.
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser over the given data.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the remaining unread bytes.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Number of unread bytes.
    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Read exactly `n` bytes.
    pub fn read_fixed(&mut self, n: usize) -> Result<&'a [u8], TlsError> {
        let remaining = self.remaining_len();
        if n > remaining {
            return Err(TlsError::OutOfData { need: n, remaining });
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Read all remaining bytes.
    pub fn read_remaining(&mut self) -> &'a [u8] {
        let out = &self.data[self.pos..];
        self.pos = self.data.len();
        out
    }

    pub fn read_u8(&mut self) -> Result<u8, TlsError> {
        Ok(self.read_fixed(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, TlsError> {
        let b = self.read_fixed(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u24(&mut self) -> Result<u32, TlsError> {
        let b = self.read_fixed(3)?;
        Ok(u32::from_be_bytes([0, b[0], b[1], b[2]]))
    }

    /// Read a big-endian unsigned integer of `width` bytes (1..=4).
    pub fn read_uint(&mut self, width: usize) -> Result<usize, TlsError> {
        debug_assert!((1..=4).contains(&width), "unsupported integer width {width}");
        let bytes = self.read_fixed(width)?;
        Ok(bytes.iter().fold(0usize, |acc, &b| (acc << 8) | b as usize))
    }

    /// Read a `len_width`-byte length prefix, then that many bytes.
    pub fn read_var_bytes(&mut self, len_width: usize) -> Result<&'a [u8], TlsError> {
        let len = self.read_uint(len_width)?;
        self.read_fixed(len)
    }

    /// Read `count` integers of `elem_width` bytes each.
    pub fn read_list(&mut self, elem_width: usize, count: usize) -> Result<Vec<u32>, TlsError> {
        let need = elem_width.saturating_mul(count);
        if need > self.remaining_len() {
            return Err(TlsError::OutOfData {
                need,
                remaining: self.remaining_len(),
            });
        }
        (0..count)
            .map(|_| self.read_uint(elem_width).map(|v| v as u32))
            .collect()
    }

    /// Read a length-prefixed list of `elem_width`-byte integers.
    ///
    /// The declared byte length must be a whole number of elements.
    pub fn read_var_list(
        &mut self,
        elem_width: usize,
        len_width: usize,
    ) -> Result<Vec<u32>, TlsError> {
        let len = self.read_uint(len_width)?;
        if len % elem_width != 0 {
            return Err(TlsError::IllegalValue(format!(
                "list length {len} is not a multiple of element size {elem_width}"
            )));
        }
        self.read_list(elem_width, len / elem_width)
    }

    /// Read a `len_width`-byte length prefix and run `body` over exactly
    /// that many bytes.
    ///
    /// Fails with [`TlsError::LengthMismatch`] when the declared length
    /// exceeds the data left in this parser, when `body` tries to read past
    /// the declared region, or when `body` leaves part of it unread.
    pub fn scoped<T, F>(&mut self, len_width: usize, body: F) -> Result<T, TlsError>
    where
        F: FnOnce(&mut Parser<'a>) -> Result<T, TlsError>,
    {
        let declared = self.read_uint(len_width)?;
        self.scoped_len(declared, body)
    }

    /// Like [`Parser::scoped`] with an already known length.
    pub fn scoped_len<T, F>(&mut self, declared: usize, body: F) -> Result<T, TlsError>
    where
        F: FnOnce(&mut Parser<'a>) -> Result<T, TlsError>,
    {
        let available = self.remaining_len();
        if declared > available {
            return Err(TlsError::LengthMismatch {
                declared,
                actual: available,
            });
        }

        let mut sub = Parser::new(&self.data[self.pos..self.pos + declared]);
        let result = body(&mut sub);
        let consumed = sub.pos;
        let value = match result {
            Ok(value) => value,
            Err(TlsError::OutOfData { need, .. }) => {
                return Err(TlsError::LengthMismatch {
                    declared,
                    actual: consumed + need,
                })
            }
            Err(e) => return Err(e),
        };
        if consumed != declared {
            return Err(TlsError::LengthMismatch {
                declared,
                actual: consumed,
            });
        }

        self.pos += declared;
        Ok(value)
    }
}
