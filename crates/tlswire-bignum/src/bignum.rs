//! Unsigned big number type and byte conversions.

use std::cmp::Ordering;

use zeroize::Zeroize;

/// Limb type for big number representation.
pub type Limb = u64;
/// Double-width type for multiplication intermediates.
pub type DoubleLimb = u128;

/// Bits per limb.
pub const LIMB_BITS: usize = 64;

/// A heap-allocated non-negative big number that is zeroized on drop.
///
/// Internally a little-endian array of `u64` limbs with no leading zero
/// limbs (zero is a single zero limb).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct BigNum {
    limbs: Vec<Limb>,
}

impl BigNum {
    pub fn zero() -> Self {
        Self { limbs: vec![0] }
    }

    pub fn one() -> Self {
        Self::from_u64(1)
    }

    pub fn from_u64(value: u64) -> Self {
        Self { limbs: vec![value] }
    }

    /// Create a BigNum from a vector of little-endian limbs.
    pub fn from_limbs(limbs: Vec<Limb>) -> Self {
        let mut bn = Self {
            limbs: if limbs.is_empty() { vec![0] } else { limbs },
        };
        bn.normalize();
        bn
    }

    /// Interpret `bytes` as an unsigned big-endian integer.
    ///
    /// Leading zero bytes are accepted; an empty slice is zero.
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self::zero();
        }

        let mut limbs = vec![0u64; bytes.len().div_ceil(8)];
        for (i, &byte) in bytes.iter().rev().enumerate() {
            limbs[i / 8] |= (byte as u64) << ((i % 8) * 8);
        }
        Self::from_limbs(limbs)
    }

    /// Minimal big-endian encoding. Zero encodes as an empty vector.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        self.to_bytes_be_width(None)
    }

    /// Big-endian encoding, optionally at a fixed width.
    ///
    /// With `Some(width)` the result is exactly `width` bytes: shorter values
    /// are left-padded with zeros and longer values keep their low-order
    /// `width` bytes. With `None` the encoding is minimal.
    pub fn to_bytes_be_width(&self, width: Option<usize>) -> Vec<u8> {
        let len = width.unwrap_or_else(|| self.byte_len());
        let mut bytes = vec![0u8; len];
        for (i, out) in bytes.iter_mut().rev().enumerate() {
            let limb_idx = i / 8;
            if limb_idx < self.limbs.len() {
                *out = (self.limbs[limb_idx] >> ((i % 8) * 8)) as u8;
            }
        }
        bytes
    }

    /// Number of significant bits; zero has none.
    pub fn bit_len(&self) -> usize {
        for i in (0..self.limbs.len()).rev() {
            if self.limbs[i] != 0 {
                return i * LIMB_BITS + (LIMB_BITS - self.limbs[i].leading_zeros() as usize);
            }
        }
        0
    }

    /// Number of bytes in the minimal encoding; zero has none.
    pub fn byte_len(&self) -> usize {
        self.bit_len().div_ceil(8)
    }

    pub fn num_limbs(&self) -> usize {
        self.limbs.len()
    }

    pub fn limbs(&self) -> &[Limb] {
        &self.limbs
    }

    pub fn is_zero(&self) -> bool {
        self.limbs.iter().all(|&l| l == 0)
    }

    pub fn is_one(&self) -> bool {
        self.limbs.len() == 1 && self.limbs[0] == 1
    }

    pub fn is_even(&self) -> bool {
        self.limbs[0] & 1 == 0
    }

    pub fn is_odd(&self) -> bool {
        !self.is_even()
    }

    /// Get bit at position `idx` (0-indexed from LSB).
    pub fn get_bit(&self, idx: usize) -> u64 {
        match self.limbs.get(idx / LIMB_BITS) {
            Some(limb) => (limb >> (idx % LIMB_BITS)) & 1,
            None => 0,
        }
    }

    /// Set bit at position `idx` (0-indexed from LSB).
    pub fn set_bit(&mut self, idx: usize) {
        let limb_idx = idx / LIMB_BITS;
        if limb_idx >= self.limbs.len() {
            self.limbs.resize(limb_idx + 1, 0);
        }
        self.limbs[limb_idx] |= 1u64 << (idx % LIMB_BITS);
    }

    /// Remove leading zero limbs.
    pub(crate) fn normalize(&mut self) {
        while self.limbs.len() > 1 && self.limbs.last() == Some(&0) {
            self.limbs.pop();
        }
    }
}

impl From<u64> for BigNum {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl std::fmt::Debug for BigNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hex = self
            .to_bytes_be()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<String>();
        if hex.is_empty() {
            write!(f, "BigNum(0x0)")
        } else {
            write!(f, "BigNum(0x{hex})")
        }
    }
}

impl PartialEq for BigNum {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BigNum {}

impl PartialOrd for BigNum {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigNum {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.limbs.len().max(other.limbs.len());
        for i in (0..len).rev() {
            let a = self.limbs.get(i).copied().unwrap_or(0);
            let b = other.limbs.get(i).copied().unwrap_or(0);
            if a != b {
                return a.cmp(&b);
            }
        }
        Ordering::Equal
    }
}
