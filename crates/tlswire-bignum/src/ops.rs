//! Basic arithmetic operations for BigNum.

use crate::bignum::{BigNum, DoubleLimb, Limb, LIMB_BITS};
use crate::montgomery::MontgomeryCtx;
use tlswire_types::CryptoError;

impl BigNum {
    /// Add two BigNums: self + other.
    pub fn add(&self, other: &BigNum) -> BigNum {
        let (a, b) = (self.limbs(), other.limbs());
        let len = a.len().max(b.len());
        let mut limbs = vec![0u64; len + 1];
        let mut carry: u64 = 0;
        for (i, out) in limbs.iter_mut().take(len).enumerate() {
            let av = a.get(i).copied().unwrap_or(0);
            let bv = b.get(i).copied().unwrap_or(0);
            let sum = av as DoubleLimb + bv as DoubleLimb + carry as DoubleLimb;
            *out = sum as Limb;
            carry = (sum >> LIMB_BITS) as u64;
        }
        limbs[len] = carry;
        BigNum::from_limbs(limbs)
    }

    /// Subtract: self - other, or `None` if the result would be negative.
    pub fn checked_sub(&self, other: &BigNum) -> Option<BigNum> {
        if self < other {
            None
        } else {
            Some(sub_unsigned(self.limbs(), other.limbs()))
        }
    }

    /// Subtract a value known not to exceed `self`.
    pub(crate) fn sub_unchecked(&self, other: &BigNum) -> BigNum {
        debug_assert!(self >= other);
        sub_unsigned(self.limbs(), other.limbs())
    }

    /// Multiply: self * other.
    pub fn mul(&self, other: &BigNum) -> BigNum {
        let (a, b) = (self.limbs(), other.limbs());
        if self.is_zero() || other.is_zero() {
            return BigNum::zero();
        }

        let mut limbs = vec![0u64; a.len() + b.len()];
        for i in 0..a.len() {
            let mut carry: u64 = 0;
            for j in 0..b.len() {
                let prod = a[i] as DoubleLimb * b[j] as DoubleLimb
                    + limbs[i + j] as DoubleLimb
                    + carry as DoubleLimb;
                limbs[i + j] = prod as Limb;
                carry = (prod >> LIMB_BITS) as u64;
            }
            limbs[i + b.len()] = carry;
        }
        BigNum::from_limbs(limbs)
    }

    /// Square: self * self.
    pub fn sqr(&self) -> BigNum {
        self.mul(self)
    }

    /// Shift left by `bits`.
    pub fn shl(&self, bits: usize) -> BigNum {
        let limb_shift = bits / LIMB_BITS;
        let bit_shift = bits % LIMB_BITS;
        let src = self.limbs();
        let mut limbs = vec![0u64; src.len() + limb_shift + 1];
        for (i, &limb) in src.iter().enumerate() {
            limbs[i + limb_shift] |= limb << bit_shift;
            if bit_shift != 0 {
                limbs[i + limb_shift + 1] |= limb >> (LIMB_BITS - bit_shift);
            }
        }
        BigNum::from_limbs(limbs)
    }

    /// Shift right by `bits`.
    pub fn shr(&self, bits: usize) -> BigNum {
        let limb_shift = bits / LIMB_BITS;
        let bit_shift = bits % LIMB_BITS;
        let src = self.limbs();
        if limb_shift >= src.len() {
            return BigNum::zero();
        }
        let mut limbs = vec![0u64; src.len() - limb_shift];
        for (i, out) in limbs.iter_mut().enumerate() {
            let lo = src[i + limb_shift] >> bit_shift;
            let hi = match src.get(i + limb_shift + 1) {
                Some(&next) if bit_shift != 0 => next << (LIMB_BITS - bit_shift),
                _ => 0,
            };
            *out = lo | hi;
        }
        BigNum::from_limbs(limbs)
    }

    /// Division with remainder: returns (quotient, remainder).
    pub fn div_rem(&self, divisor: &BigNum) -> Result<(BigNum, BigNum), CryptoError> {
        if divisor.is_zero() {
            return Err(CryptoError::BnDivisionByZero);
        }
        if self < divisor {
            return Ok((BigNum::zero(), self.clone()));
        }
        Ok(div_rem_unsigned(self, divisor))
    }

    /// Modular reduction: self mod modulus.
    pub fn mod_reduce(&self, modulus: &BigNum) -> Result<BigNum, CryptoError> {
        let (_, r) = self.div_rem(modulus)?;
        Ok(r)
    }

    /// Remainder by a single-limb divisor.
    pub fn rem_u64(&self, divisor: u64) -> Result<u64, CryptoError> {
        if divisor == 0 {
            return Err(CryptoError::BnDivisionByZero);
        }
        let rem = self.limbs().iter().rev().fold(0 as DoubleLimb, |rem, &limb| {
            ((rem << LIMB_BITS) | limb as DoubleLimb) % divisor as DoubleLimb
        });
        Ok(rem as u64)
    }

    /// Modular exponentiation: self^exp mod modulus.
    ///
    /// Odd moduli go through Montgomery multiplication.
    pub fn mod_exp(&self, exp: &BigNum, modulus: &BigNum) -> Result<BigNum, CryptoError> {
        if modulus.is_zero() {
            return Err(CryptoError::BnDivisionByZero);
        }
        if modulus.is_one() {
            return Ok(BigNum::zero());
        }
        if modulus.is_odd() {
            return MontgomeryCtx::new(modulus)?.mont_exp(self, exp);
        }

        let mut result = BigNum::one();
        let mut base = self.mod_reduce(modulus)?;
        for i in 0..exp.bit_len() {
            if exp.get_bit(i) == 1 {
                result = result.mul(&base).mod_reduce(modulus)?;
            }
            base = base.sqr().mod_reduce(modulus)?;
        }
        Ok(result)
    }
}

/// a - b for a >= b.
fn sub_unsigned(a: &[Limb], b: &[Limb]) -> BigNum {
    let mut limbs = vec![0u64; a.len()];
    let mut borrow = false;
    for (i, out) in limbs.iter_mut().enumerate() {
        let bv = b.get(i).copied().unwrap_or(0);
        let (diff, b1) = a[i].overflowing_sub(bv);
        let (diff, b2) = diff.overflowing_sub(borrow as u64);
        *out = diff;
        borrow = b1 || b2;
    }
    BigNum::from_limbs(limbs)
}

/// Shift-and-subtract long division for `a >= b > 0`.
fn div_rem_unsigned(a: &BigNum, b: &BigNum) -> (BigNum, BigNum) {
    let bits = a.bit_len();
    let mut quotient = vec![0u64; bits.div_ceil(LIMB_BITS)];
    let mut remainder = BigNum::zero();

    for i in (0..bits).rev() {
        remainder = remainder.shl(1);
        if a.get_bit(i) == 1 {
            remainder.set_bit(0);
        }
        if remainder >= *b {
            remainder = remainder.sub_unchecked(b);
            quotient[i / LIMB_BITS] |= 1u64 << (i % LIMB_BITS);
        }
    }

    (BigNum::from_limbs(quotient), remainder)
}
