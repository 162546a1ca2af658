//! Montgomery multiplication context for modular exponentiation.

use crate::bignum::{BigNum, DoubleLimb, Limb, LIMB_BITS};
use tlswire_types::CryptoError;

/// Montgomery multiplication context for an odd modulus N, with
/// R = 2^(m_size * LIMB_BITS).
pub struct MontgomeryCtx {
    modulus: BigNum,
    m_size: usize,
    /// N' such that N[0] * N' ≡ -1 (mod 2^64).
    n_prime: u64,
    /// R² mod N, used for encoding into Montgomery form.
    r_squared: BigNum,
}

impl MontgomeryCtx {
    /// Create a new Montgomery context for the given odd modulus.
    pub fn new(modulus: &BigNum) -> Result<Self, CryptoError> {
        if modulus.is_zero() {
            return Err(CryptoError::BnDivisionByZero);
        }
        if modulus.is_even() {
            return Err(CryptoError::InvalidArg);
        }

        let m_size = modulus.num_limbs();
        let r_squared = BigNum::one()
            .shl(2 * m_size * LIMB_BITS)
            .mod_reduce(modulus)?;

        Ok(MontgomeryCtx {
            modulus: modulus.clone(),
            m_size,
            n_prime: compute_n_prime(modulus.limbs()[0]),
            r_squared,
        })
    }

    pub fn modulus(&self) -> &BigNum {
        &self.modulus
    }

    /// Convert a value into Montgomery form: aR mod N.
    pub fn to_mont(&self, a: &BigNum) -> Result<BigNum, CryptoError> {
        let a_reduced = a.mod_reduce(&self.modulus)?;
        Ok(self.mont_reduce(&a_reduced.mul(&self.r_squared)))
    }

    /// Convert from Montgomery form back to normal: a * R^(-1) mod N.
    pub fn from_mont(&self, a_mont: &BigNum) -> BigNum {
        self.mont_reduce(a_mont)
    }

    /// Montgomery multiplication: (a * b * R^(-1)) mod N.
    pub fn mont_mul(&self, a: &BigNum, b: &BigNum) -> BigNum {
        self.mont_reduce(&a.mul(b))
    }

    /// Montgomery squaring: (a² * R^(-1)) mod N.
    pub fn mont_sqr(&self, a: &BigNum) -> BigNum {
        self.mont_reduce(&a.sqr())
    }

    /// Montgomery REDC (HAC 14.32): T * R^(-1) mod N for T < N * R.
    fn mont_reduce(&self, t: &BigNum) -> BigNum {
        let m = self.m_size;
        let mod_limbs = self.modulus.limbs();

        let mut work = vec![0u64; 2 * m + 2];
        let t_limbs = t.limbs();
        let copy_len = t_limbs.len().min(work.len());
        work[..copy_len].copy_from_slice(&t_limbs[..copy_len]);

        for i in 0..m {
            let q = work[i].wrapping_mul(self.n_prime);

            let mut carry: u64 = 0;
            for j in 0..m {
                let prod = q as DoubleLimb * mod_limbs[j] as DoubleLimb
                    + work[i + j] as DoubleLimb
                    + carry as DoubleLimb;
                work[i + j] = prod as Limb;
                carry = (prod >> LIMB_BITS) as u64;
            }
            let mut k = i + m;
            while carry != 0 && k < work.len() {
                let sum = work[k] as DoubleLimb + carry as DoubleLimb;
                work[k] = sum as Limb;
                carry = (sum >> LIMB_BITS) as u64;
                k += 1;
            }
        }

        // The intermediate may reach 2N, which needs one limb past m.
        let result = BigNum::from_limbs(work[m..2 * m + 1].to_vec());
        if result >= self.modulus {
            result.sub_unchecked(&self.modulus)
        } else {
            result
        }
    }

    /// Windowed Montgomery exponentiation: base^exp mod N.
    pub fn mont_exp(&self, base: &BigNum, exp: &BigNum) -> Result<BigNum, CryptoError> {
        if self.modulus.is_one() {
            return Ok(BigNum::zero());
        }
        if exp.is_zero() {
            return Ok(BigNum::one());
        }

        let exp_bits = exp.bit_len();
        let w = get_window_size(exp_bits);

        // table[i] = base^i in Montgomery form
        let base_mont = self.to_mont(base)?;
        let mut table = Vec::with_capacity(1 << w);
        table.push(self.to_mont(&BigNum::one())?);
        table.push(base_mont.clone());
        for i in 2..(1usize << w) {
            let val = self.mont_mul(&table[i - 1], &base_mont);
            table.push(val);
        }

        let mut result = table[0].clone();
        let mut i = exp_bits;
        while i > 0 {
            let window_bits = w.min(i);
            i -= window_bits;

            for _ in 0..window_bits {
                result = self.mont_sqr(&result);
            }

            let mut window_val = 0usize;
            for b in 0..window_bits {
                window_val |= (exp.get_bit(i + b) as usize) << b;
            }
            if window_val != 0 {
                result = self.mont_mul(&result, &table[window_val]);
            }
        }

        Ok(self.from_mont(&result))
    }
}

/// Compute N' such that N[0] * N' ≡ -1 (mod 2^64) by Newton iteration.
fn compute_n_prime(n0: u64) -> u64 {
    let mut x: u64 = 1;
    for _ in 0..6 {
        x = x.wrapping_mul(2u64.wrapping_sub(n0.wrapping_mul(x)));
    }
    x.wrapping_neg()
}

fn get_window_size(bits: usize) -> usize {
    match bits {
        b if b > 512 => 6,
        b if b > 256 => 5,
        b if b > 128 => 4,
        b if b > 64 => 3,
        b if b > 32 => 2,
        _ => 1,
    }
}
