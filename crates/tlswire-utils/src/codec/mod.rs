//! Big-endian TLS wire encoding and decoding.
//!
//! [`Parser`] reads fixed-width integers and length-prefixed fields out of
//! an untrusted buffer; every read is bounds-checked. [`Writer`] builds the
//! same layouts and back-patches length prefixes.

mod parser;
mod writer;

pub use parser::Parser;
pub use writer::Writer;

/// Largest value representable in a big-endian field of `width` bytes.
pub(crate) fn max_for_width(width: usize) -> usize {
    if width >= std::mem::size_of::<usize>() {
        usize::MAX
    } else {
        (1usize << (8 * width)) - 1
    }
}
