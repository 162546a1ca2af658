//! Random big number generation using OS randomness.

use crate::bignum::BigNum;
use tlswire_types::CryptoError;

fn random_bytes(len: usize) -> Result<Vec<u8>, CryptoError> {
    let mut buf = vec![0u8; len];
    getrandom::getrandom(&mut buf).map_err(|_| CryptoError::BnRandGenFail)?;
    Ok(buf)
}

impl BigNum {
    /// Generate a random BigNum of exactly `bits` bits.
    ///
    /// If `odd` is true, the least significant bit is forced to 1.
    pub fn random(bits: usize, odd: bool) -> Result<BigNum, CryptoError> {
        if bits == 0 {
            return Ok(BigNum::zero());
        }

        let num_bytes = bits.div_ceil(8);
        let mut buf = random_bytes(num_bytes)?;
        buf[0] &= 0xFF >> (num_bytes * 8 - bits);

        let mut result = BigNum::from_bytes_be(&buf);
        result.set_bit(bits - 1);
        if odd {
            result.set_bit(0);
        }
        Ok(result)
    }

    /// Generate a random BigNum uniformly in [1, upper) by rejection sampling.
    pub fn random_range(upper: &BigNum) -> Result<BigNum, CryptoError> {
        if upper.is_zero() || upper.is_one() {
            return Err(CryptoError::InvalidArg);
        }

        let bits = upper.bit_len();
        let num_bytes = bits.div_ceil(8);
        loop {
            let mut buf = random_bytes(num_bytes)?;
            buf[0] &= 0xFF >> (num_bytes * 8 - bits);

            let candidate = BigNum::from_bytes_be(&buf);
            if !candidate.is_zero() && candidate < *upper {
                return Ok(candidate);
            }
        }
    }
}
