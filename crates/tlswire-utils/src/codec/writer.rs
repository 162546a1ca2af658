//! TLS wire builder.

use tlswire_types::{InternalError, TlsError};

use super::max_for_width;

/// A builder for big-endian TLS structures.
///
/// Values that cannot be represented in their length prefix or integer
/// width fail with [`InternalError::ValueOutOfRange`]; those are caller
/// bugs, never peer input.
#[derive(Debug, Default, Clone)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Create a new writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Consume the writer and return the encoded bytes.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn write_u16(&mut self, value: u16) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Write `value` as a big-endian integer of `width` bytes (1..=4).
    pub fn write_uint(&mut self, value: usize, width: usize) -> Result<&mut Self, TlsError> {
        debug_assert!((1..=4).contains(&width), "unsupported integer width {width}");
        let max = max_for_width(width);
        if value > max {
            return Err(InternalError::ValueOutOfRange {
                field: "integer",
                value,
                max,
            }
            .into());
        }
        for shift in (0..width).rev() {
            self.buf.push((value >> (8 * shift)) as u8);
        }
        Ok(self)
    }

    pub fn write_fixed(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Write a `len_width`-byte length prefix followed by `bytes`.
    pub fn write_var_bytes(&mut self, bytes: &[u8], len_width: usize) -> Result<&mut Self, TlsError> {
        self.write_uint(bytes.len(), len_width)?;
        Ok(self.write_fixed(bytes))
    }

    /// Write each value as a `elem_width`-byte integer, without a prefix.
    pub fn write_list(&mut self, values: &[u32], elem_width: usize) -> Result<&mut Self, TlsError> {
        for &value in values {
            self.write_uint(value as usize, elem_width)?;
        }
        Ok(self)
    }

    /// Write a length-prefixed list of `elem_width`-byte integers.
    pub fn write_var_list(
        &mut self,
        values: &[u32],
        elem_width: usize,
        len_width: usize,
    ) -> Result<&mut Self, TlsError> {
        self.write_uint(values.len() * elem_width, len_width)?;
        self.write_list(values, elem_width)
    }

    /// Run `body`, then prefix whatever it wrote with its length.
    pub fn with_length_prefix<F>(&mut self, len_width: usize, body: F) -> Result<&mut Self, TlsError>
    where
        F: FnOnce(&mut Writer) -> Result<(), TlsError>,
    {
        let start = self.buf.len();
        self.buf.resize(start + len_width, 0);
        body(self)?;

        let len = self.buf.len() - start - len_width;
        let max = max_for_width(len_width);
        if len > max {
            return Err(InternalError::ValueOutOfRange {
                field: "length prefix",
                value: len,
                max,
            }
            .into());
        }
        for i in 0..len_width {
            self.buf[start + i] = (len >> (8 * (len_width - 1 - i))) as u8;
        }
        Ok(self)
    }
}
