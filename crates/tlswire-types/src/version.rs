//! SSL/TLS protocol version pair.

use std::fmt;

/// Protocol version as carried on the wire: `(major, minor)`.
///
/// Ordering is the natural pair ordering, so `SSL3 < TLS1_0 < TLS1_2`.
/// SSLv2 is represented as `(0, 2)` and therefore sorts below every
/// SSLv3+ version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ProtocolVersion {
    pub major: u8,
    pub minor: u8,
}

impl ProtocolVersion {
    pub const SSL2: Self = Self::new(0, 2);
    pub const SSL3: Self = Self::new(3, 0);
    pub const TLS1_0: Self = Self::new(3, 1);
    pub const TLS1_1: Self = Self::new(3, 2);
    pub const TLS1_2: Self = Self::new(3, 3);
    pub const TLS1_3: Self = Self::new(3, 4);

    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Build from the two-byte wire encoding.
    pub const fn from_u16(value: u16) -> Self {
        Self::new((value >> 8) as u8, value as u8)
    }

    /// The two-byte wire encoding.
    pub const fn to_u16(self) -> u16 {
        ((self.major as u16) << 8) | self.minor as u16
    }

    /// True for TLS 1.2 and later, where signatures carry an explicit
    /// (hash, signature) algorithm pair.
    pub fn has_signature_algorithms(self) -> bool {
        self >= Self::TLS1_2
    }
}

impl From<(u8, u8)> for ProtocolVersion {
    fn from((major, minor): (u8, u8)) -> Self {
        Self::new(major, minor)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.major, self.minor)
    }
}
