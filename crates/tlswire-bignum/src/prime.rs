//! Prime number testing and generation.

use crate::bignum::BigNum;
use crate::montgomery::MontgomeryCtx;
use tlswire_types::CryptoError;

/// Primes below 256, used for trial division.
const SMALL_PRIMES: [u64; 54] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Fixed Miller-Rabin bases; together they are exact below 3.3 * 10^24.
const FIXED_WITNESSES: usize = 12;

/// Upper bound on candidates drawn per requested prime.
const MAX_ATTEMPTS_PER_BIT: usize = 100;

impl BigNum {
    /// Check if this number is probably prime.
    ///
    /// Runs trial division by the primes below 256, then Miller-Rabin with
    /// the first twelve primes as bases plus `rounds` random bases.
    pub fn is_probably_prime(&self, rounds: usize) -> Result<bool, CryptoError> {
        if self < &BigNum::from_u64(2) {
            return Ok(false);
        }

        for &p in &SMALL_PRIMES {
            if *self == BigNum::from_u64(p) {
                return Ok(true);
            }
            if self.rem_u64(p)? == 0 {
                return Ok(false);
            }
        }
        // No factor below 256 and smaller than 256^2.
        if self.bit_len() <= 16 {
            return Ok(true);
        }

        // n - 1 = 2^r * d with d odd
        let n_minus_one = self.sub_unchecked(&BigNum::one());
        let mut r = 0usize;
        while n_minus_one.get_bit(r) == 0 {
            r += 1;
        }
        let d = n_minus_one.shr(r);

        let ctx = MontgomeryCtx::new(self)?;
        let one_m = ctx.to_mont(&BigNum::one())?;
        let minus_one_m = ctx.to_mont(&n_minus_one)?;

        let mut bases: Vec<BigNum> = SMALL_PRIMES[..FIXED_WITNESSES]
            .iter()
            .map(|&p| BigNum::from_u64(p))
            .collect();
        for _ in 0..rounds {
            bases.push(BigNum::random_range(&n_minus_one)?);
        }

        'witness: for a in &bases {
            if a.is_one() {
                continue;
            }
            let mut x = ctx.to_mont(&ctx.mont_exp(a, &d)?)?;
            if x == one_m || x == minus_one_m {
                continue;
            }
            for _ in 1..r {
                x = ctx.mont_sqr(&x);
                if x == minus_one_m {
                    continue 'witness;
                }
            }
            return Ok(false);
        }

        Ok(true)
    }

    /// Generate a random prime of exactly `bits` bits.
    pub fn generate_prime(bits: usize) -> Result<BigNum, CryptoError> {
        if bits < 2 {
            return Err(CryptoError::InvalidArg);
        }
        for _ in 0..bits * MAX_ATTEMPTS_PER_BIT {
            let candidate = BigNum::random(bits, true)?;
            if candidate.is_probably_prime(2)? {
                return Ok(candidate);
            }
        }
        Err(CryptoError::BnPrimeGenFail)
    }

    /// Generate a safe prime p = 2q + 1 (q prime) of exactly `bits` bits,
    /// suitable as an SRP or Diffie-Hellman group modulus.
    pub fn generate_safe_prime(bits: usize) -> Result<BigNum, CryptoError> {
        if bits < 3 {
            return Err(CryptoError::InvalidArg);
        }
        for _ in 0..bits * MAX_ATTEMPTS_PER_BIT {
            let q = BigNum::generate_prime(bits - 1)?;
            let p = q.shl(1).add(&BigNum::one());
            if p.is_probably_prime(2)? {
                return Ok(p);
            }
        }
        Err(CryptoError::BnPrimeGenFail)
    }
}
