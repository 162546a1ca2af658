#![forbid(unsafe_code)]
#![doc = "Big number arithmetic for tlswire: wire integer conversions, modular exponentiation and primality testing."]

mod bignum;
mod montgomery;
mod ops;
mod prime;
mod rand;

pub use bignum::BigNum;
pub use montgomery::MontgomeryCtx;
